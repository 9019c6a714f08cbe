//! Fatal round errors and option parsing errors.

use std::fmt::Write as _;

use thiserror::Error;

/// Round-level failures. Anything here aborts the current processing round.
#[derive(Error, Debug)]
pub enum FatalError {
    /// Raised through `die`: unsupported declarations or symbols that never resolve.
    #[error("Fatal error occurred. {message}")]
    Die {
        /// Message shown to the user.
        message: String,
        /// Declaration that caused the failure.
        symbol: Option<String>,
        /// Underlying error, printed with the stack trace option.
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Failures raised while this one was already unwinding.
        suppressed: Vec<FatalError>,
    },

    /// The generator reached a state its decision tables do not cover.
    #[error(
        "Implementation error: {message}\nPlease report this issue to the KtorGen maintainers with the interface that triggered it."
    )]
    Implementation {
        /// What went wrong.
        message: String,
        /// Failures raised while this one was already unwinding.
        suppressed: Vec<FatalError>,
    },
}

impl FatalError {
    /// User-facing fatal error.
    pub fn die(message: impl Into<String>, symbol: Option<String>) -> Self {
        Self::Die {
            message: message.into(),
            symbol,
            cause: None,
            suppressed: Vec::new(),
        }
    }

    /// Generator defect.
    pub fn implementation(message: impl Into<String>) -> Self {
        Self::Implementation {
            message: message.into(),
            suppressed: Vec::new(),
        }
    }

    /// Attach the underlying error to a `Die`.
    pub fn with_cause(mut self, error: impl std::error::Error + Send + Sync + 'static) -> Self {
        if let Self::Die { cause, .. } = &mut self {
            *cause = Some(Box::new(error));
        }
        self
    }

    /// Attach a secondary failure, the original error stays the one that propagates.
    pub fn suppress(mut self, other: FatalError) -> Self {
        match &mut self {
            Self::Die { suppressed, .. } | Self::Implementation { suppressed, .. } => {
                suppressed.push(other);
            }
        }
        self
    }

    /// Secondary failures in attach order.
    pub fn suppressed(&self) -> &[FatalError] {
        match self {
            Self::Die { suppressed, .. } | Self::Implementation { suppressed, .. } => suppressed,
        }
    }

    /// Declaration that caused a `Die`.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Self::Die { symbol, .. } => symbol.as_deref(),
            Self::Implementation { .. } => None,
        }
    }

    /// Generator defect rather than bad input.
    pub fn is_implementation(&self) -> bool {
        matches!(self, Self::Implementation { .. })
    }

    /// Message, cause chain and suppressed failures, one per line.
    pub fn full_report(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            let _ = write!(out, "\nCaused by: {err}");
            source = err.source();
        }
        for other in self.suppressed() {
            let _ = write!(out, "\nSuppressed: {}", other.full_report().replace('\n', "\n    "));
        }
        out
    }
}

/// Errors while reading the flat option map.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Value could not be parsed for a recognized key.
    #[error("Invalid value '{value}' for option '{key}', expected {expected}")]
    InvalidValue {
        /// Option key.
        key: String,
        /// Rejected value.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },

    /// `-o` flag without `=`.
    #[error("Option '{0}' must be written as key=value")]
    MalformedPair(String),
}

/// Errors while loading host declarations.
#[derive(Error, Debug)]
pub enum SymbolError {
    /// IO error reading the declaration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The declaration file is not a valid symbol table.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
