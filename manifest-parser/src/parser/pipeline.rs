// Pipeline normalization

use crate::parser::boxes::{normalize_box, normalize_service_list};
use crate::parser::error::{ValidationError, ValidationResult, Violation};
use crate::parser::keys::{key_path, partition, PIPELINE_KEYS};
use crate::parser::models::{Node, Pipeline};
use crate::parser::steps::normalize_step_list;

use indexmap::IndexMap;
use tracing::trace;

/// Normalize the value bound to a pipeline name.
///
/// A null value is an empty pipeline and stays `None`. Any non-reserved key
/// becomes an extra step group.
pub fn normalize_pipeline(node: Node, path: &str) -> ValidationResult<Option<Pipeline>> {
    let fields = match node {
        Node::Null => return Ok(None),
        Node::Mapping(fields) => fields,
        other => {
            return Err(ValidationError::new(Violation::Pipeline, path)
                .with_suggestion(format!(
                    "'{}' is read as a pipeline because it is not a reserved key, but it holds {}",
                    path,
                    other.kind_name()
                )))
        }
    };

    let mut split = partition(fields, &PIPELINE_KEYS);
    let mut pipeline = Pipeline::default();

    if let Some(node) = split.reserved.shift_remove("box") {
        pipeline.box_spec = Some(normalize_box(node, &key_path(path, "box"))?);
    }

    if let Some(node) = split.reserved.shift_remove("services") {
        pipeline.services = Some(normalize_service_list(node, &key_path(path, "services"))?);
    }

    if let Some(node) = split.reserved.shift_remove("steps") {
        pipeline.steps = Some(normalize_step_list(node, &key_path(path, "steps"))?);
    }

    if let Some(node) = split.reserved.shift_remove("after-steps") {
        pipeline.after_steps = Some(normalize_step_list(node, &key_path(path, "after-steps"))?);
    }

    if !split.derived.is_empty() {
        let mut groups = IndexMap::with_capacity(split.derived.len());
        for (name, node) in split.derived {
            let steps = normalize_step_list(node, &key_path(path, &name))?;
            trace!(pipeline = path, group = %name, steps = steps.len(), "collected extra steps");
            groups.insert(name, steps);
        }
        pipeline.extra_steps = Some(groups);
    }

    Ok(Some(pipeline))
}
