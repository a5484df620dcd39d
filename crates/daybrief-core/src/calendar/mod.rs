//! Calendar model, merging rules and free-slot computation.

pub mod event;
pub mod reconcile;
pub mod slots;

pub use event::{
    filter_events_by_date, find_conflicts, sort_events_by_start, Event, EventTime,
};
pub use reconcile::drop_redundant_ooo;
pub use slots::{find_free_slots, TimeSlot};
