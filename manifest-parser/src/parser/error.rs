// Manifest error types with helpful error messages
// Decode failures carry line/column info, shape failures carry the offending node path

use std::fmt;

use thiserror::Error;

/// Message reported for every decoder failure, regardless of the underlying cause
pub const DECODE_ERROR_MESSAGE: &str = "Unable to parse yaml";

/// Decode error with location and context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message (always [`DECODE_ERROR_MESSAGE`])
    pub message: String,
    /// Line number (1-indexed, 0 when unknown)
    pub line: usize,
    /// Column number (1-indexed, 0 when unknown)
    pub column: usize,
    /// Surrounding context (a few lines around the error)
    pub context: String,
    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
    /// The kind of error
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// YAML syntax error
    YamlSyntax,
    /// Well-formed YAML that cannot be represented as a manifest node tree
    /// (tags, non-scalar keys, keys colliding once stringified)
    InvalidDocument,
}

impl ParseError {
    pub fn yaml_error(line: usize, column: usize) -> Self {
        Self {
            message: DECODE_ERROR_MESSAGE.to_string(),
            line,
            column,
            context: String::new(),
            suggestion: None,
            kind: ParseErrorKind::YamlSyntax,
        }
    }

    pub fn invalid_document(suggestion: impl Into<String>) -> Self {
        Self {
            message: DECODE_ERROR_MESSAGE.to_string(),
            line: 0,
            column: 0,
            context: String::new(),
            suggestion: Some(suggestion.into()),
            kind: ParseErrorKind::InvalidDocument,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create context from source content
    pub fn with_source_context(mut self, source: &str, context_lines: usize) -> Self {
        if self.line == 0 {
            return self;
        }

        let lines: Vec<&str> = source.lines().collect();
        let start = self.line.saturating_sub(context_lines + 1);
        let end = (self.line + context_lines).min(lines.len());

        let mut context = String::new();
        for (i, line) in lines.iter().enumerate().take(end).skip(start) {
            let line_num = i + 1;
            let prefix = if line_num == self.line { ">" } else { " " };
            context.push_str(&format!("{} {:4} | {}\n", prefix, line_num, line));

            if line_num == self.line && self.column > 0 {
                let indicator = " ".repeat(self.column.saturating_sub(1)) + "^";
                context.push_str(&format!("       | {}\n", indicator));
            }
        }

        self.context = context;
        self
    }

    /// Create from serde_yaml error. The decoder's own wording is dropped,
    /// only its location survives.
    pub fn from_yaml_error(err: &serde_yaml::Error, source: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((0, 0));

        let suggestion = suggest_yaml_fix(err, source, line);

        let error = ParseError::yaml_error(line, column).with_source_context(source, 2);
        match suggestion {
            Some(suggestion) => error.with_suggestion(suggestion),
            None => error,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if self.line > 0 {
            write!(f, " (line {}:{})", self.line, self.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Suggest fixes for common YAML mistakes in manifests
fn suggest_yaml_fix(err: &serde_yaml::Error, source: &str, line: usize) -> Option<String> {
    let msg = err.to_string();
    let lines: Vec<&str> = source.lines().collect();
    let error_line = lines.get(line.saturating_sub(1)).unwrap_or(&"");

    if error_line.starts_with('\t') || msg.contains("cannot start any token") {
        return Some(
            "YAML prefers spaces over tabs for indentation. Replace tabs with spaces.".to_string(),
        );
    }

    if msg.contains("duplicate entry") {
        return Some("each key may only appear once within the same mapping".to_string());
    }

    if msg.contains("more than one document") {
        return Some("a manifest must be a single YAML document; remove extra '---' separators".to_string());
    }

    if msg.contains("mapping values are not allowed") {
        return Some("check the indentation of this line, or quote values containing ': '".to_string());
    }

    None
}

/// Result type for decoder operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Closed set of node shapes the manifest grammar rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Root,
    Box,
    BoxId,
    Services,
    Pipeline,
    Steps,
    Step,
    StepId,
    AmbiguousStep,
}

impl Violation {
    pub fn message(&self) -> &'static str {
        match self {
            Violation::Root => "root object should be an object",
            Violation::Box => "box (or service item) should be object or string",
            Violation::BoxId => "box id should be a string",
            Violation::Services => "services should be an array",
            Violation::Pipeline => "pipeline should be an object",
            Violation::Steps => "steps should be an array",
            Violation::Step => "step should be object or string",
            Violation::StepId => "step id should be a string",
            Violation::AmbiguousStep => "only a single null value is supported",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Validation error for node shapes the grammar does not support
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violation: Violation,
    pub path: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(violation: Violation, path: impl Into<String>) -> Self {
        Self {
            violation,
            path: path.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn message(&self) -> &'static str {
        self.violation.message()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.violation)?;
        if !self.path.is_empty() {
            write!(f, " (at '{}')", self.path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Coarse classification of a manifest failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Validation,
}

/// Any failure produced while parsing a manifest
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ManifestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ManifestError::Parse(_) => ErrorKind::Decode,
            ManifestError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// The fixed, user-facing message without location or path decoration
    pub fn message(&self) -> &str {
        match self {
            ManifestError::Parse(err) => &err.message,
            ManifestError::Validation(err) => err.message(),
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ManifestError::Parse(err) => err.suggestion.as_deref(),
            ManifestError::Validation(err) => err.suggestion.as_deref(),
        }
    }
}

/// Result type for manifest parsing
pub type ManifestResult<T> = Result<T, ManifestError>;
