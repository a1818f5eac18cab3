pub mod client;
pub mod extract;
pub mod types;

pub use client::PrismClient;

/// Failure taxonomy for calls against Prism Central. The HTTP layer maps
/// `Unreachable` and `Unavailable` to 502 and `Malformed` to 500; raw detail
/// stays in the logs, never in a response body.
#[derive(Debug, thiserror::Error)]
pub enum PrismError {
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    #[error("upstream returned HTTP {status}")]
    Unavailable { status: u16 },

    #[error("upstream response malformed: {0}")]
    Malformed(String),
}

impl PrismError {
    /// Short label safe to expose in health output and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            PrismError::Unreachable(_) => "upstream unreachable",
            PrismError::Unavailable { .. } => "upstream unavailable",
            PrismError::Malformed(_) => "upstream response malformed",
        }
    }
}
