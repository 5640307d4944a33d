// Build Manifest Parser Library
// Normalizes shorthand YAML build manifests into one canonical model

pub mod parser;

// Re-export parser types
pub use parser::{
    decode, parse, BoxSpec, ErrorKind, Manifest, ManifestError, ManifestParser, ManifestResult,
    Node, ParseError, ParseErrorKind, Pipeline, Step, ValidationError, Violation,
};
