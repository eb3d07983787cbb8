//! Response envelopes of the report service.
//!
//! The analyzer endpoint wraps payloads as `{"success": bool, "data": ...}`
//! (reports add an optional `message`); the validation endpoint answers
//! `{"success": bool, "msg": ...}`. `data` is kept as raw JSON here so a
//! wrong shape is reported against the envelope rather than failing the
//! whole parse.

use adscope_core::ValidationReply;
use serde::Deserialize;

/// Envelope of the catalog (`getSamples`) and report (`getReport`) actions.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of the email/code validation endpoint.
#[derive(Debug, Deserialize)]
pub struct ValidationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
}

impl From<ValidationResponse> for ValidationReply {
    fn from(r: ValidationResponse) -> Self {
        Self {
            success: r.success,
            msg: r.msg.filter(|m| !m.trim().is_empty()),
        }
    }
}
