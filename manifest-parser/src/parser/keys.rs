// Reserved key sets and key relocation helpers

use crate::parser::models::Mapping;

/// Keys the root mapping keeps for itself; every other root key names a pipeline
pub const ROOT_KEYS: [&str; 5] = [
    "box",
    "services",
    "command-timeout",
    "source-dir",
    "no-response-timeout",
];

/// Keys a pipeline keeps for itself; every other key names an extra step group
pub const PIPELINE_KEYS: [&str; 4] = ["box", "services", "steps", "after-steps"];

/// A mapping split into the keys an entity reserves and the keys to relocate
#[derive(Debug, Default)]
pub struct Partition {
    pub reserved: Mapping,
    pub derived: Mapping,
}

/// Split `fields` by membership in `reserved`, preserving encounter order on both sides.
///
/// The mapping is consumed, so relocated keys cannot also remain in the source.
pub fn partition(fields: Mapping, reserved: &[&str]) -> Partition {
    let mut split = Partition::default();
    for (key, value) in fields {
        if reserved.contains(&key.as_str()) {
            split.reserved.insert(key, value);
        } else {
            split.derived.insert(key, value);
        }
    }
    split
}

/// Path of a mapping entry, e.g. `build.steps`
pub fn key_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Path of a sequence item, e.g. `build.steps[2]`
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}
