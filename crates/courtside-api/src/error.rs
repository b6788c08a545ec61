use thiserror::Error;

use courtside_core::scope::Cancelled;

/// Every failure a gateway call or session action can surface.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout, broken body stream.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `detail` is the server's message when it sent one.
    #[error("{}", status_message(.status, .detail))]
    Status { status: u16, detail: Option<String> },

    /// The response body did not match the expected shape.
    #[error("unexpected response from {path}: {message}")]
    Decode { path: String, message: String },

    /// The action needs a logged-in user and none is present. Raised before
    /// any request is made.
    #[error("you must be logged in to {action}")]
    AuthRequired { action: String },

    /// Rejected client-side before reaching the network.
    #[error("invalid {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("token storage failed: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("request cancelled")]
    Cancelled,
}

impl From<Cancelled> for ApiError {
    fn from(_: Cancelled) -> Self {
        ApiError::Cancelled
    }
}

impl ApiError {
    pub fn auth_required(action: impl Into<String>) -> Self {
        ApiError::AuthRequired {
            action: action.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

/// Pull a human message out of an error body. FastAPI sends either
/// `{"detail": "..."}` or `{"detail": [{"msg": "..."}, ...]}` for
/// validation failures.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    match json.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}

fn status_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("request failed with status {status}"),
    }
}
