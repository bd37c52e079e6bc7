//! Error taxonomy of the gateway.

use courtside_protocol::ProtocolError;

/// Errors returned by a [`RemoteGateway`](crate::RemoteGateway) call.
///
/// The three kinds are handled differently upstream, so implementations
/// must classify carefully: only `Unauthorized` invalidates the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The credential is missing, expired, or invalid (HTTP 401).
    #[error("credential rejected by the authority")]
    Unauthorized,

    /// The authority refused the request for a domain reason (other 4xx).
    /// `reason` is the server's human-readable message.
    #[error("{reason}")]
    Rejected { status: u16, reason: String },

    /// Transport failure, timeout, 5xx, or an unreadable response.
    /// Transient: the caller may retry manually.
    #[error("authority unreachable: {0}")]
    Unreachable(String),

    /// The gateway could not be constructed from its configuration.
    #[error("invalid gateway configuration: {0}")]
    InvalidConfig(String),
}

impl GatewayError {
    /// Shorthand for a `Rejected` error with status 400.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            status: 400,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the session must be invalidated.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns `true` if a manual retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }

    /// Classifies a non-success HTTP response.
    ///
    /// `body` is inspected for the authority's `{"detail": ...}` document.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        match status {
            401 => Self::Unauthorized,
            400..=499 => Self::Rejected {
                status,
                reason: rejection_reason(status, body),
            },
            _ => Self::Unreachable(format!("authority responded with status {status}")),
        }
    }
}

/// A success response that can't be decoded is a server fault from the
/// client's point of view.
impl From<ProtocolError> for GatewayError {
    fn from(err: ProtocolError) -> Self {
        Self::Unreachable(format!("unreadable response: {err}"))
    }
}

/// Extracts the authority's reason from an error body.
///
/// `detail` is usually a string. Validation failures send a list of
/// objects instead, which is rendered as compact JSON.
fn rejection_reason(status: u16, body: &[u8]) -> String {
    let detail = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|mut v| v.get_mut("detail").map(serde_json::Value::take));

    match detail {
        Some(serde_json::Value::String(text)) => text,
        Some(serde_json::Value::Null) | None => match status_text(status) {
            Some(text) => format!("{text} ({status})"),
            None => format!("request rejected with status {status}"),
        },
        Some(other) => other.to_string(),
    }
}

/// Canonical reason phrases for the 4xx statuses the authority uses.
fn status_text(status: u16) -> Option<&'static str> {
    let text = match status {
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        410 => "Gone",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        _ => return None,
    };
    Some(text)
}
