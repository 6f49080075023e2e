use thiserror::Error;

/// Exit code for usage, configuration, and local IO problems.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for data-load and terminal failures.
pub const EXIT_DATA: u8 = 4;

#[derive(Clone, Error)]
#[error("{message}")]
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

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, message)
    }

    pub fn data(message: impl Into<String>) -> Self {
        Self::new(EXIT_DATA, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message() {
        let err = AppError::usage("Unknown sector 'x'.");
        assert_eq!(err.to_string(), "Unknown sector 'x'.");
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert_eq!(AppError::data("boom").exit_code(), EXIT_DATA);
    }
}
