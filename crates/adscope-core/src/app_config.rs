/// Runtime settings for the report client, read from `ADSCOPE_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL shared by the analyzer and validation endpoints.
    pub api_base_url: String,
    pub analyzer_path: String,
    pub validate_path: String,
    /// `libID` sent to the analyzer endpoint.
    pub library_id: u32,
    /// Sent as the `Origin` header; the validation service checks it.
    pub page_origin: String,
    /// `None` leaves the transport default in place.
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
    pub log_level: String,
    /// Quality tier that qualifies a brand for the featured carousel.
    pub top_tier: String,
}
