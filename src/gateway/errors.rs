use thiserror::Error;

/// Failure of a single gateway call.
///
/// The engine only needs to tell three things apart: the caller lacks a scope
/// (`PermissionDenied`), the endpoint does not exist for this portal
/// (`NotFound`), and everything else (transient or malformed).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GatewayError {
    #[error("permission denied for {endpoint}: {message}")]
    PermissionDenied { endpoint: String, message: String },
    #[error("{endpoint} is not available for this portal")]
    NotFound { endpoint: String },
    #[error("HubSpot API returned HTTP {status} for {endpoint}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },
    #[error("network failure calling {endpoint}: {message}")]
    Network { endpoint: String, message: String },
    #[error("malformed payload from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("no HubSpot access token configured (set HUBSPOT_ACCESS_TOKEN or hubspot.access_token)")]
    MissingToken,
}

impl GatewayError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, GatewayError::PermissionDenied { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound { .. })
    }

    /// Classify a non-success HTTP response.
    ///
    /// HubSpot reports missing scopes either as 401/403 or as a body whose
    /// `category`/`message` mentions scopes or permissions, so the body is
    /// inspected as well as the status code.
    pub fn from_response(endpoint: &str, status: u16, body: &str) -> Self {
        let lowered = body.to_lowercase();
        let permission_signal = lowered.contains("missing_scopes")
            || lowered.contains("scope")
            || lowered.contains("permission");

        let message = extract_message(body);

        if status == 401 || status == 403 || (status >= 400 && status < 500 && permission_signal) {
            GatewayError::PermissionDenied {
                endpoint: endpoint.to_string(),
                message,
            }
        } else if status == 404 {
            GatewayError::NotFound {
                endpoint: endpoint.to_string(),
            }
        } else {
            GatewayError::Api {
                endpoint: endpoint.to_string(),
                status,
                message,
            }
        }
    }
}

fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_is_permission_denied() {
        let err = GatewayError::from_response("/settings/v3/users", 403, "{}");
        assert!(err.is_permission_denied());
    }

    #[test]
    fn missing_scopes_body_is_permission_denied() {
        let body = r#"{"status":"error","message":"This app hasn't been granted all required scopes","category":"MISSING_SCOPES"}"#;
        let err = GatewayError::from_response("/automation/v3/workflows", 400, body);
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("required scopes"));
    }

    #[test]
    fn not_found_and_server_errors_are_distinct() {
        assert!(GatewayError::from_response("/reports/v2/reports", 404, "").is_not_found());

        let err = GatewayError::from_response("/reports/v2/reports", 502, "Bad Gateway");
        assert!(!err.is_permission_denied());
        assert!(!err.is_not_found());
        assert_eq!(
            err,
            GatewayError::Api {
                endpoint: "/reports/v2/reports".to_string(),
                status: 502,
                message: "Bad Gateway".to_string(),
            }
        );
    }
}
