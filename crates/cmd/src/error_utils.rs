// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Error handling utilities to eliminate repetitive error mapping patterns

use anyhow::{Result, anyhow};

/// Extension trait for Results to provide standardized error mapping
pub trait ErrorContext<T> {
    /// Map error with a context message for common "Failed to..." patterns
    fn with_context_msg(self, msg: &str) -> Result<T>;

    /// Map error with a formatted context message
    fn with_context_fmt(self, msg: &str, args: &dyn std::fmt::Display) -> Result<T>;

    /// Common error mapping for file operations
    fn file_context(self, operation: &str, path: &str) -> Result<T>;

    /// Common error mapping for generator runs
    fn generator_context(self, operation: &str) -> Result<T>;

    /// Common error mapping for a named verifier
    fn verify_context(self, verifier: &str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_context_msg(self, msg: &str) -> Result<T> {
        self.map_err(|e| anyhow!("{}: {}", msg, e))
    }

    fn with_context_fmt(self, msg: &str, args: &dyn std::fmt::Display) -> Result<T> {
        self.map_err(|e| anyhow!("{} {}: {}", msg, args, e))
    }

    fn file_context(self, operation: &str, path: &str) -> Result<T> {
        self.with_context_fmt(&format!("Failed to {}", operation), &path)
    }

    fn generator_context(self, operation: &str) -> Result<T> {
        self.with_context_msg(&format!("Failed to {} generated cluster", operation))
    }

    fn verify_context(self, verifier: &str) -> Result<T> {
        self.with_context_msg(&format!("{} verification failed to run", verifier))
    }
}
