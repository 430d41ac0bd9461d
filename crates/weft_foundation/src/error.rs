//! Error types for the Weft system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Programming-contract violations inside the engine are panics, not errors;
//! this type covers the recoverable failures of the surrounding driver.

use std::fmt;

use thiserror::Error;

/// The main error type for Weft operations.
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map(|c| format!(" {c}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a source loading error.
    #[must_use]
    pub fn source_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SourceLoad {
            path: path.into(),
            message: message.into(),
        })
    }

    /// Creates an operator failure.
    #[must_use]
    pub fn operator_failed(operator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OperatorFailed {
            operator: operator.into(),
            message: message.into(),
        })
    }

    /// Creates a semantic limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: SemanticLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A source could not be read or decoded.
    #[error("cannot load `{path}`: {message}")]
    SourceLoad {
        /// The path as requested by the caller.
        path: String,
        /// Description of the underlying failure.
        message: String,
    },

    /// An operator failed while applying a segment.
    #[error("operator `{operator}` failed: {message}")]
    OperatorFailed {
        /// Name of the failing operator.
        operator: String,
        /// Description of the failure.
        message: String,
    },

    /// Semantic limit exceeded (kill switch triggered).
    #[error("limit exceeded: {0}")]
    LimitExceeded(SemanticLimit),

    /// A module id that was never handed out.
    #[error("unknown module #{0}")]
    UnknownModule(u32),
}

/// Semantic limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticLimit {
    /// Maximum evaluation steps exceeded.
    MaxSteps {
        /// The configured limit.
        limit: usize,
        /// Additional context about which operator was about to run.
        context: Option<String>,
    },
}

impl fmt::Display for SemanticLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxSteps { limit, context } => {
                write!(f, "max evaluation steps ({limit}) exceeded")?;
                if let Some(ctx) = context {
                    write!(f, ": {ctx}")?;
                }
                Ok(())
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source name.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
    /// Stack of operators that were running.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        for frame in &self.stack {
            write!(f, "\n  in {frame}")?;
        }
        Ok(())
    }
}

/// Result type alias for Weft operations.
pub type Result<T> = std::result::Result<T, Error>;
