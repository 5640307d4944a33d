// Step normalization
//
// A step may be written as a bare string, as an indented long form
//
//   - script:
//       name: echo foo
//       code: echo foo
//
// or as a flat long form, where the properties end up as siblings of the
// step name because of their indentation:
//
//   - script:
//     name: echo foo
//     code: echo foo
//
// Both long forms normalize to `{id: script, name: echo foo, code: echo foo}`.

use crate::parser::error::{ValidationError, ValidationResult, Violation};
use crate::parser::keys::index_path;
use crate::parser::models::{Mapping, Node, Step};

/// Normalize a list of steps (`steps`, `after-steps`, or an extra step group)
pub fn normalize_step_list(node: Node, path: &str) -> ValidationResult<Vec<Step>> {
    let items = match node {
        Node::Sequence(items) => items,
        other => {
            return Err(ValidationError::new(Violation::Steps, path).with_suggestion(format!(
                "list each step on its own line starting with '- ', found {}",
                other.kind_name()
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| normalize_step(item, &index_path(path, i)))
        .collect()
}

/// Normalize a single step node
pub fn normalize_step(node: Node, path: &str) -> ValidationResult<Step> {
    match node {
        Node::String(id) => Ok(Step::new(id)),
        Node::Mapping(fields) if fields.len() == 1 => normalize_single_key(fields, path),
        Node::Mapping(fields) if fields.len() > 1 => normalize_flat(fields, path),
        other => Err(step_shape_error(&other, path)),
    }
}

/// `{script: {name: .., code: ..}}` or an already normalized `{id: script}`
fn normalize_single_key(mut fields: Mapping, path: &str) -> ValidationResult<Step> {
    match fields.pop() {
        Some((id, Node::Mapping(mut properties))) => {
            // The outer key names the step, even if the body carries its own id
            properties.shift_remove("id");
            Ok(Step { id, properties })
        }
        Some((key, Node::String(id))) if key == "id" => Ok(Step::new(id)),
        Some((key, value)) => Err(ValidationError::new(Violation::Step, path).with_suggestion(
            format!(
                "'{}' holds {}; indent the step's properties under '{}:'",
                key,
                value.kind_name(),
                key
            ),
        )),
        None => Err(step_shape_error(&Node::Mapping(Mapping::new()), path)),
    }
}

/// Sibling keys where exactly one key has no value: that key names the step
fn normalize_flat(mut fields: Mapping, path: &str) -> ValidationResult<Step> {
    let null_keys: Vec<&String> = fields
        .iter()
        .filter(|(_, value)| value.is_null())
        .map(|(key, _)| key)
        .collect();

    if let [marker] = null_keys.as_slice() {
        let id = marker.to_string();
        fields.shift_remove(&id);
        fields.shift_remove("id");
        return Ok(Step {
            id,
            properties: fields,
        });
    }

    if null_keys.len() > 1 {
        let names: Vec<&str> = null_keys.iter().map(|k| k.as_str()).collect();
        return Err(ValidationError::new(Violation::AmbiguousStep, path).with_suggestion(format!(
            "keys without a value: {}; only the step name may be left empty",
            names.join(", ")
        )));
    }

    // No key without a value: only an explicit id can name the step
    match fields.shift_remove("id") {
        Some(Node::String(id)) => Ok(Step {
            id,
            properties: fields,
        }),
        Some(other) => Err(ValidationError::new(Violation::StepId, path).with_suggestion(
            format!("'id' must name the step, found {}", other.kind_name()),
        )),
        None => Err(ValidationError::new(Violation::AmbiguousStep, path).with_suggestion(
            "write the step name on its own line ending with ':' and indent its properties below it",
        )),
    }
}

fn step_shape_error(node: &Node, path: &str) -> ValidationError {
    ValidationError::new(Violation::Step, path)
        .with_suggestion(format!("found {}", node.kind_name()))
}
