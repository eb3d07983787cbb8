use thiserror::Error;

/// Failures surfaced by the brand, report and access flows.
///
/// Every variant is handled at the component that issued the call and shown
/// to the user as a short message; none of them is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Transport failure or a non-2xx HTTP status.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The server explicitly rejected the submitted email or code.
    #[error("{0}")]
    ValidationRejected(String),

    /// A required input was missing, e.g. no handle or no report URL.
    #[error("{0}")]
    MissingPrecondition(String),

    /// The same action is already in flight.
    #[error("{0} request already in progress")]
    Busy(&'static str),

    /// The action is not allowed in the current state.
    #[error("{0}")]
    InvalidTransition(String),

    /// A response arrived for a selection that is no longer active and was
    /// dropped.
    #[error("response for a previous selection was discarded")]
    Stale,
}
