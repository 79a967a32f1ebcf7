pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use config::Args;
pub use engine::{Dataset, ReportConfig, ReportEngine};
pub use error::{ReportError, Result};
pub use filter::{filter_by_date, Snapshot};
pub use reports::{MonthFill, WordPolicy};
pub use types::{ConnectionRecord, DateRange, Direction, InvitationRecord, Report};
