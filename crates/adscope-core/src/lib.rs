pub mod access;
pub mod app_config;
pub mod brand;
pub mod carousel;
pub mod catalog;
pub mod config;
pub mod error;
pub mod explorer;
pub mod numbers;
pub mod presenter;
pub mod report;
pub mod selection;
pub mod session;

use thiserror::Error;

pub use access::{AccessGate, AccessStage, Feedback, FeedbackContext, Severity, ValidationReply};
pub use app_config::AppConfig;
pub use brand::{Brand, Metric, RawBrand};
pub use catalog::{CatalogStatus, CatalogStore, MetricField, SortDirection, SortKey, SORT_OPTIONS};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::FlowError;
pub use explorer::Explorer;
pub use numbers::{format_compact_number, parse_compact_number};
pub use presenter::{viewer_url, CountUp, ReportView, REPORT_CONTENTS};
pub use report::{ReportState, ReportSummary};
pub use selection::{SelectionFlow, SelectionState};
pub use session::{ReportRequest, ReportSession, SelectionToken, SendRequest, Tagged};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
