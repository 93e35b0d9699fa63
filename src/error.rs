//! Error types.
//!
//! Two layers:
//!
//! - `EstimateError` is what the pricing core returns. It only distinguishes bad
//!   caller input from a broken internal invariant.
//! - `AppError` is what the binary reports. It carries a process exit code
//!   (2 = bad input / usage / I/O, 4 = internal failure).

use thiserror::Error;

/// Failure raised by the estimate engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    /// A required field is missing, has the wrong type, or is out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// The computed estimate failed its final sanity check.
    #[error("generation error: {0}")]
    Generation(String),
}

impl EstimateError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<EstimateError> for AppError {
    fn from(err: EstimateError) -> Self {
        let exit_code = match err {
            EstimateError::Validation(_) => 2,
            EstimateError::Generation(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_errors_map_to_exit_codes() {
        let app: AppError = EstimateError::validation("squareFootage must be > 0").into();
        assert_eq!(app.exit_code(), 2);
        assert!(app.to_string().contains("squareFootage"));

        let app: AppError = EstimateError::generation("empty estimate id").into();
        assert_eq!(app.exit_code(), 4);
    }
}
