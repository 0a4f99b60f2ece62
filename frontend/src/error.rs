use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(#[from] gloo_net::Error),

    /// Non-OK status; `message` is the backend's `error` field when present.
    #[error("request failed with status {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("{0}")]
    Decode(String),

    /// A browser API (e.g. `FormData`) refused to build the request.
    #[error("{0}")]
    Browser(String),
}

impl ApiError {
    pub fn browser(value: wasm_bindgen::JsValue) -> Self {
        ApiError::Browser(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }

    /// The backend's own message when it sent one, otherwise the error text.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Banner text for this error. Backend messages are shown verbatim,
    /// transport failures are prefixed with `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Rejected { message: None, .. } => fallback.to_string(),
            other => format!("{}: {}", fallback, other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select an XML file")]
    NotXml,

    #[error("File size must be less than {}MB", .limit / (1024 * 1024))]
    TooLarge { size: u64, limit: u64 },
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("canvas `{0}` has no 2d context")]
    MissingContext(String),

    #[error("chart library error: {0}")]
    Js(String),
}

impl From<wasm_bindgen::JsValue> for ChartError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        ChartError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_wins_over_fallback() {
        let err = ApiError::Rejected {
            status: 400,
            message: Some("Invalid XML file: no smses root".to_string()),
        };
        assert_eq!(
            err.user_message("Error uploading file"),
            "Invalid XML file: no smses root"
        );
    }

    #[test]
    fn rejection_without_body_uses_fallback() {
        let err = ApiError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Error processing file"), "Error processing file");
    }

    #[test]
    fn detail_prefers_backend_message() {
        let err = ApiError::Rejected {
            status: 500,
            message: Some("disk full".to_string()),
        };
        assert_eq!(err.detail(), "disk full");

        let err = ApiError::Rejected {
            status: 503,
            message: None,
        };
        assert_eq!(err.detail(), "request failed with status 503");
    }

    #[test]
    fn decode_failure_is_prefixed() {
        let err = ApiError::Decode("expected value at line 1".to_string());
        assert_eq!(
            err.user_message("Error uploading file"),
            "Error uploading file: expected value at line 1"
        );
    }

    #[test]
    fn validation_messages() {
        assert_eq!(ValidationError::NotXml.to_string(), "Please select an XML file");
        let too_large = ValidationError::TooLarge {
            size: 16 * 1024 * 1024 + 1,
            limit: 16 * 1024 * 1024,
        };
        assert_eq!(too_large.to_string(), "File size must be less than 16MB");
    }
}
