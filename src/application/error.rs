use std::error::Error as StdError;

use thiserror::Error;

use crate::{application::render::RenderError, infra::error::InfraError};

/// Flattened view of an error and its source chain, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { messages }
    }

    pub fn chain(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("render failed")]
    Render(#[from] RenderError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error(self)
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_) | AppError::Render(_) => 2,
            AppError::Infra(_) | AppError::Unexpected(_) => 1,
        }
    }
}
