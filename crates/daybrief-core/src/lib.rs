//! # Daybrief Core Library
//!
//! This library provides the core business logic for Daybrief, a personal
//! planning assistant. It implements a CLI-first philosophy where every
//! operation is available via a standalone binary, with the prompt-driven
//! workflows being thin orchestration over the same core library.
//!
//! ## Architecture
//!
//! - **Task model**: Eisenhower classification over tasks fetched from an
//!   external task service, with note/task separation
//! - **Calendar**: Multi-account event merging, out-of-office reconciliation
//!   and free-slot computation inside configured work hours
//! - **Briefing**: Pure assembly of a day snapshot into prompt-ready
//!   markdown sections
//! - **Journal**: Date-keyed markdown files with append-only sections
//! - **Sources**: Adapters for TickTick, gcalcli and the claude CLI
//! - **Workflows**: Briefing, weekly plan, weekly review and evening recap
//!   prompt compilation and generation
//!
//! ## Key Components
//!
//! - [`Task`]: Task model with priority, due date and quadrant helpers
//! - [`Event`]: Calendar event with offset-tolerant times
//! - [`assemble_briefing`]: Day snapshot from tasks plus events
//! - [`FileJournal`]: Markdown journal store
//! - [`Config`]: Application configuration management
//! - [`CoreError`]: Error type shared across the library

pub mod briefing;
pub mod calendar;
pub mod error;
pub mod journal;
pub mod recap;
pub mod sources;
pub mod storage;
pub mod task;
pub mod workflows;

pub use briefing::{assemble_briefing, format_briefing_sections, BriefingData, BriefingSections};
pub use calendar::{drop_redundant_ooo, find_free_slots, Event, EventTime, TimeSlot};
pub use error::{ConfigError, CoreError, RecapError, Result, SourceError};
pub use journal::{FileJournal, JournalStore};
pub use recap::{determine_recap_mode, Recap, RecapMode};
pub use sources::{
    CalendarSource, ClaudeCli, CompositeCalendar, GcalcliCalendar, LlmService, TaskSource,
    TickTickClient,
};
pub use storage::{CalendarAccount, Config, Tokens};
pub use task::{Task, TaskKind};
