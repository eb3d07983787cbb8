pub mod client;
pub mod error;
pub mod flow;
pub mod types;

pub use client::AdsClient;
pub use error::ClientError;
pub use flow::{fetch_report, load_catalog, submit_code, submit_email, Verified};
