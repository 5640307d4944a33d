// Parser module for build manifests
// Provides YAML decoding, shape validation, and shorthand normalization

pub mod boxes;
pub mod decode;
pub mod error;
pub mod keys;
pub mod manifest;
pub mod models;
pub mod pipeline;
pub mod steps;

pub use decode::decode;
pub use error::{
    ErrorKind, ManifestError, ManifestResult, ParseError, ParseErrorKind, ParseResult,
    ValidationError, ValidationResult, Violation,
};
pub use manifest::{parse, ManifestParser};
pub use models::*;
