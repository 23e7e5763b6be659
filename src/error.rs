//! Error types (A1): fail-fast configuration/construction errors as a
//! plain enum, and a richer `CustomError`/`Context` pair for malformed
//! input discovered while parsing FASTA, MGF-like spectra, or config
//! files.

use std::fmt;

/// Fail-fast errors raised while constructing search primitives.
/// These are programmer/configuration errors, not malformed-input
/// errors, and are never raised mid-search.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A `Tolerance` was constructed with a non-positive or
    /// non-finite width.
    ToleranceNonPositive,
    /// A tolerance string (e.g. in a config file) didn't match
    /// `"<number>ppm"` or `"<number>da"`.
    ToleranceMalformed(String),
    /// A `CompositionEnvelope` requires a minimum greater than its
    /// maximum in some category.
    EnvelopeImpossible,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToleranceNonPositive => {
                write!(f, "tolerance width must be a positive, finite number")
            }
            Self::ToleranceMalformed(s) => {
                write!(f, "tolerance '{s}' is not of the form '<number>ppm' or '<number>da'")
            }
            Self::EnvelopeImpossible => {
                write!(f, "composition envelope has a minimum greater than its maximum in some category")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Where in a parsed input a [`CustomError`] occurred.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    /// 1-based line number, when the input is line-oriented.
    pub line: Option<usize>,
    /// The offending line's text, for display alongside the message.
    pub text: Option<String>,
}

impl Context {
    pub fn line(line_index: usize, text: impl Into<String>) -> Self {
        Self { line: Some(line_index + 1), text: Some(text.into()) }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, &self.text) {
            (Some(line), Some(text)) => write!(f, "line {line}: {text}"),
            (Some(line), None) => write!(f, "line {line}"),
            (None, Some(text)) => write!(f, "{text}"),
            (None, None) => Ok(()),
        }
    }
}

/// A malformed-input error raised by the FASTA, MGF-like, and config
/// readers: a short/long description plus optional suggestions and
/// source context.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomError {
    short_description: String,
    long_description: Option<String>,
    suggestions: Vec<String>,
    context: Option<Context>,
}

impl CustomError {
    /// Start building an error with just its short, one-line description.
    pub fn error(short_description: impl Into<String>) -> Self {
        Self {
            short_description: short_description.into(),
            long_description: None,
            suggestions: Vec::new(),
            context: None,
        }
    }

    #[must_use]
    pub fn with_long_description(mut self, long_description: impl Into<String>) -> Self {
        self.long_description = Some(long_description.into());
        self
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }
}

impl fmt::Display for CustomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_description)?;
        if let Some(context) = &self.context {
            write!(f, " ({context})")?;
        }
        if let Some(long) = &self.long_description {
            write!(f, "\n{long}")?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CustomError {}
