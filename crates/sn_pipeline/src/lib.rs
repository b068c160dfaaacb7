pub mod cycle;
pub mod delivery;
pub mod format;
pub mod scheduler;
pub mod telegram;

pub use cycle::{CycleReport, CycleRunner, PipelineConfig};
pub use delivery::{DeliveryGate, DestinationMap, QuietWindow, QuietWindowInfo};
pub use format::{admin_notification, escape_markdown, format_article};
pub use scheduler::{
    CycleJob, CycleScheduler, JobStatus, LastCycle, SchedulerConfig, SchedulerStatus, TriggerOutcome,
};
pub use telegram::TelegramSink;

pub mod prelude {
    pub use crate::{CycleRunner, CycleScheduler, DeliveryGate, QuietWindow, TriggerOutcome};
    pub use sn_core::{Error, Result};
}
