use thiserror::Error;

pub const PERMISSION_DENIED_MESSAGE: &str =
    "Permission denied. Check if service account has access to the GA4 property.";
pub const PROPERTY_NOT_FOUND_MESSAGE: &str =
    "GA4 property not found. Verify the property_id is correct.";

/// Failure of a single report call.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The analytics backend rejected or failed the call. `code` is the
    /// numeric status the backend declared, if any.
    #[error("{message}")]
    Api { code: Option<i64>, message: String },

    /// The access token could not be obtained.
    #[error("{0}")]
    Auth(String),

    /// A returned metric could not be parsed into its record field.
    #[error("invalid {column} value {value:?} in report row")]
    MalformedValue { column: String, value: String },

    /// A row is shorter than the column layout of its query.
    #[error("report row is missing column {0}")]
    MissingColumn(String),

    #[error(transparent)]
    InvalidQuery(#[from] QueryError),
}

impl ReportError {
    pub fn api(code: Option<i64>, message: impl Into<String>) -> Self {
        ReportError::Api {
            code,
            message: message.into(),
        }
    }
}

/// Invalid report query construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("limit must be between 1 and {max}, got {got}")]
    LimitOutOfRange { got: i64, max: i64 },
    #[error("invalid property id: {0:?}")]
    InvalidProperty(String),
}

/// A backend failure translated into the status and message the HTTP
/// caller sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedError {
    pub status: u16,
    pub message: String,
}

/// Map a backend failure to a client-facing error using only its declared
/// numeric code. The message text is never inspected.
pub fn map_error(code: Option<i64>, message: &str) -> MappedError {
    match code {
        Some(403) => MappedError {
            status: 403,
            message: PERMISSION_DENIED_MESSAGE.to_string(),
        },
        Some(404) => MappedError {
            status: 404,
            message: PROPERTY_NOT_FOUND_MESSAGE.to_string(),
        },
        Some(400) => MappedError {
            status: 400,
            message: format!("Invalid request parameters: {message}"),
        },
        _ => MappedError {
            status: 500,
            message: format!("GA4 API error: {message}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_ignores_message_text() {
        let mapped = map_error(Some(403), "property not found anywhere");
        assert_eq!(mapped.status, 403);
        assert_eq!(mapped.message, PERMISSION_DENIED_MESSAGE);
    }

    #[test]
    fn not_found_uses_fixed_message() {
        let mapped = map_error(Some(404), "Requested entity was not found.");
        assert_eq!(mapped.status, 404);
        assert_eq!(mapped.message, PROPERTY_NOT_FOUND_MESSAGE);
    }

    #[test]
    fn bad_request_keeps_original_text() {
        let mapped = map_error(Some(400), "Field fooBar is not a valid dimension.");
        assert_eq!(mapped.status, 400);
        assert_eq!(
            mapped.message,
            "Invalid request parameters: Field fooBar is not a valid dimension."
        );
    }

    #[test]
    fn missing_code_is_internal() {
        let mapped = map_error(None, "connection reset");
        assert_eq!(mapped.status, 500);
        assert_eq!(mapped.message, "GA4 API error: connection reset");
    }

    #[test]
    fn text_that_looks_like_permission_error_is_not_classified() {
        let mapped = map_error(Some(503), "PERMISSION_DENIED upstream");
        assert_eq!(mapped.status, 500);
        assert_eq!(mapped.message, "GA4 API error: PERMISSION_DENIED upstream");
    }
}
