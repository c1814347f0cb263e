// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::fmt::{self, Display};

/// The broad category of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An image or audio file is missing, unreadable, or was rejected by the
    /// backend.
    ResourceLoad,
    /// A renderer, audio or display operation reported an error.
    BackendCall,
    /// An operation was called in a state where it isn't allowed.
    PreconditionViolation,
}

/// Error type returned by fallible [`Platform`](crate::Platform) and game
/// operations. None of these are recoverable by retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    kind: ErrorKind,
    message: String,
}

impl EngineError {
    /// Creates a new [`EngineError`].
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> EngineError {
        EngineError {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for an [`ErrorKind::ResourceLoad`] error.
    pub fn resource_load(message: impl Into<String>) -> EngineError {
        EngineError::new(ErrorKind::ResourceLoad, message)
    }

    /// Shorthand for an [`ErrorKind::BackendCall`] error.
    pub fn backend_call(message: impl Into<String>) -> EngineError {
        EngineError::new(ErrorKind::BackendCall, message)
    }

    /// Shorthand for an [`ErrorKind::PreconditionViolation`] error.
    pub fn precondition(message: impl Into<String>) -> EngineError {
        EngineError::new(ErrorKind::PreconditionViolation, message)
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::ResourceLoad => "resource load failure",
            ErrorKind::BackendCall => "backend call failure",
            ErrorKind::PreconditionViolation => "precondition violation",
        };
        write!(f, "{kind}: {}", self.message)
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::{EngineError, ErrorKind};

    #[test]
    fn display_includes_kind_and_message() {
        let err = EngineError::resource_load("texture/missing.png: no such file");
        assert_eq!(ErrorKind::ResourceLoad, err.kind());
        assert_eq!(
            "resource load failure: texture/missing.png: no such file",
            err.to_string(),
        );
    }
}
