// YAML decoder adapter
// Turns manifest text into the generic node tree consumed by the normalizer

use crate::parser::error::{ParseError, ParseResult};
use crate::parser::models::{Mapping, Node};

use serde_yaml::Value;

/// Decode YAML text into a generic [`Node`] tree.
///
/// Syntax failures are reported uniformly as "Unable to parse yaml"; only the
/// location of the failure is retained for display.
pub fn decode(content: &str) -> ParseResult<Node> {
    let value: Value =
        serde_yaml::from_str(content).map_err(|e| ParseError::from_yaml_error(&e, content))?;

    to_node(value)
}

fn to_node(value: Value) -> ParseResult<Node> {
    match value {
        Value::Null => Ok(Node::Null),
        Value::Bool(b) => Ok(Node::Bool(b)),
        Value::Number(n) => Ok(Node::Number(n)),
        Value::String(s) => Ok(Node::String(s)),
        Value::Sequence(items) => items
            .into_iter()
            .map(to_node)
            .collect::<ParseResult<Vec<_>>>()
            .map(Node::Sequence),
        Value::Mapping(entries) => {
            let mut mapping = Mapping::with_capacity(entries.len());
            for (key, value) in entries {
                let key = mapping_key(key)?;
                if mapping.contains_key(&key) {
                    return Err(ParseError::invalid_document(format!(
                        "key '{}' appears more than once in the same mapping",
                        key
                    )));
                }
                mapping.insert(key, to_node(value)?);
            }
            Ok(Node::Mapping(mapping))
        }
        Value::Tagged(tagged) => Err(ParseError::invalid_document(format!(
            "YAML tags are not supported; remove '{}'",
            tagged.tag
        ))),
    }
}

/// Scalar keys are stringified the way they are written (`60`, `true`, `null`)
fn mapping_key(key: Value) -> ParseResult<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Sequence(_) | Value::Mapping(_) => Err(ParseError::invalid_document(
            "mapping keys must be plain scalars, not lists or mappings",
        )),
        Value::Tagged(tagged) => Err(ParseError::invalid_document(format!(
            "YAML tags are not supported; remove '{}'",
            tagged.tag
        ))),
    }
}
