//! Adapters for external task, calendar and language-model services.
//!
//! Each adapter exposes a synchronous interface and drives its own async
//! work on the ambient tokio runtime, so callers never hold an `.await`
//! point across briefing assembly.

pub mod composite;
pub mod gcal;
pub mod llm_cli;
pub mod ticktick;
pub mod traits;

pub use composite::CompositeCalendar;
pub use gcal::GcalcliCalendar;
pub use llm_cli::{find_claude_binary, ClaudeCli};
pub use ticktick::TickTickClient;
pub use traits::{CalendarSource, LlmService, TaskSource};
