// Box and service normalization

use crate::parser::error::{ValidationError, ValidationResult, Violation};
use crate::parser::keys::index_path;
use crate::parser::models::{BoxSpec, Node};

/// Expand `box: ubuntu` into `{id: ubuntu}`; long-form mappings are kept as-is.
///
/// Used for the root box, pipeline boxes, and each service entry.
pub fn normalize_box(node: Node, path: &str) -> ValidationResult<BoxSpec> {
    match node {
        Node::String(id) => Ok(BoxSpec::new(id)),
        Node::Mapping(mut properties) => match properties.shift_remove("id") {
            Some(Node::String(id)) => Ok(BoxSpec { id, properties }),
            Some(other) => Err(ValidationError::new(Violation::BoxId, path)
                .with_suggestion(format!("'id' must name the box, found {}", other.kind_name()))),
            None => Err(ValidationError::new(Violation::BoxId, path)
                .with_suggestion("add an 'id:' key naming the box image")),
        },
        other => Err(ValidationError::new(Violation::Box, path)
            .with_suggestion(format!("found {}", other.kind_name()))),
    }
}

/// Normalize a `services` list, expanding each entry like a box
pub fn normalize_service_list(node: Node, path: &str) -> ValidationResult<Vec<BoxSpec>> {
    let Node::Sequence(items) = node else {
        return Err(ValidationError::new(Violation::Services, path)
            .with_suggestion("list each service on its own line starting with '- '"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| normalize_box(item, &index_path(path, i)))
        .collect()
}
