use std::error::Error;
use std::fmt;

/// Failure category for the insight pipeline. Callers match on this instead
/// of inspecting a transported HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightErrorKind {
    /// No analysis snapshot exists on any candidate endpoint.
    NotFound,
    /// A dependency answered with a failure, or none answered at all.
    Upstream,
    /// The pipeline is not configured (missing API key).
    Config,
    /// The model answered, but without a usable structured payload.
    Malformed,
}

impl InsightErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Upstream => "UPSTREAM",
            Self::Config => "CONFIG",
            Self::Malformed => "MALFORMED",
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsightError {
    kind: InsightErrorKind,
    message: String,
    details: Vec<String>,
}

impl InsightError {
    pub fn new(kind: InsightErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: vec![],
        }
    }

    pub fn with_details(
        kind: InsightErrorKind,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(InsightErrorKind::NotFound, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(InsightErrorKind::Upstream, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(InsightErrorKind::Config, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(InsightErrorKind::Malformed, message)
    }

    pub fn kind(&self) -> InsightErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Per-candidate diagnostics, in the order the candidates were tried.
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// HTTP status equivalent for callers that translate errors at the edge.
    pub fn http_status(&self) -> u16 {
        match self.kind {
            InsightErrorKind::NotFound => 404,
            InsightErrorKind::Upstream => 502,
            InsightErrorKind::Config | InsightErrorKind::Malformed => 500,
        }
    }
}

impl Error for InsightError {}

impl fmt::Display for InsightError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)?;
        if !self.details.is_empty() {
            write!(f, " ({})", self.details.join(" | "))?;
        }
        Ok(())
    }
}
