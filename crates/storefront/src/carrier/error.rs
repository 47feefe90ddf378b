use thiserror::Error;

/// Failures talking to a carrier.
#[derive(Debug, Error)]
pub enum CarrierError {
    /// The request never produced a usable response (connect, timeout, body read).
    #[error("Carrier request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The carrier answered and said no. `message` is the carrier's own text and is
    /// displayed unchanged. `status` is the HTTP status, or 422 when the refusal came
    /// inside a 2xx body.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Login or token rejected.
    #[error("Carrier authentication failed: {0}")]
    Auth(String),

    /// The body did not have the shape we expected.
    #[error("Unexpected carrier response: {0}")]
    UnexpectedResponse(String),
}

impl CarrierError {
    pub(crate) fn rejected_in_body(message: impl Into<String>) -> Self {
        CarrierError::Rejected {
            status: 422,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CarrierError::Rejected { status: 404, .. })
    }
}
