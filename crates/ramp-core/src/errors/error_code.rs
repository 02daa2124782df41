//! RampErrorCode trait for structured error codes at process boundaries.

/// Every error enum implements this to expose a stable code string that
/// health checks and callers can match on without parsing messages.
pub trait RampErrorCode {
    /// Returns the error code string (e.g., "CONFIG_NOT_FOUND").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn display_code(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_NOT_FOUND: &str = "CONFIG_NOT_FOUND";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const GRAPH_NOT_FOUND: &str = "GRAPH_NOT_FOUND";
pub const GRAPH_INVALID: &str = "GRAPH_INVALID";
