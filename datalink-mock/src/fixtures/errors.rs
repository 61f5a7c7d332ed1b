use datalink_core::ApiResponse;
use serde_json::json;

/// Error envelope with the given provider code and message.
#[must_use]
pub fn error_body(code: &str, message: &str) -> String {
    json!({"error": {"code": code, "message": message}}).to_string()
}

/// Response carrying an error envelope.
#[must_use]
pub fn error_response(status: u16, code: &str, message: &str) -> ApiResponse {
    ApiResponse {
        status,
        body: error_body(code, message),
    }
}

/// 404 for an unknown dataset or table code.
#[must_use]
pub fn not_found() -> ApiResponse {
    error_response(
        404,
        "QECx02",
        "You have submitted an incorrect Quandl code. Please check your Quandl codes and try again.",
    )
}

/// 429 rate limit.
#[must_use]
pub fn limit_exceeded() -> ApiResponse {
    error_response(429, "QELx04", "You have exceeded the API speed limit.")
}
