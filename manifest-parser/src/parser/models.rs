// Build Manifest Data Models
// The generic node tree produced by the decoder and the canonical manifest model

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered string-keyed mapping, as produced by the decoder
pub type Mapping = IndexMap<String, Node>;

/// Generic YAML node handed from the decoder to the normalizer.
///
/// Serializes untagged so passthrough values and step/box properties
/// render as plain YAML or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

impl Node {
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Human-readable shape name, used in error suggestions
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "a boolean",
            Node::Number(_) => "a number",
            Node::String(_) => "a string",
            Node::Sequence(_) => "a list",
            Node::Mapping(_) => "a mapping",
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Number(value.into())
    }
}

// =============================================================================
// Canonical model
// =============================================================================

/// Root of a normalized build manifest
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Manifest {
    /// Main execution environment
    #[serde(rename = "box", skip_serializing_if = "Option::is_none")]
    pub box_spec: Option<BoxSpec>,

    /// Auxiliary boxes started alongside the main box
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<BoxSpec>>,

    #[serde(rename = "command-timeout", skip_serializing_if = "Option::is_none")]
    pub command_timeout: Option<Node>,

    #[serde(rename = "source-dir", skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<Node>,

    #[serde(rename = "no-response-timeout", skip_serializing_if = "Option::is_none")]
    pub no_response_timeout: Option<Node>,

    /// Named pipelines in declaration order; `None` values are empty pipelines.
    /// Absent entirely when the manifest declares no pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipelines: Option<IndexMap<String, Option<Pipeline>>>,
}

impl Manifest {
    /// Look up a pipeline by name. Declared-but-empty pipelines yield `None`
    /// just like undeclared ones; use [`Manifest::has_pipeline`] to tell them apart.
    pub fn pipeline(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines.as_ref()?.get(name)?.as_ref()
    }

    pub fn has_pipeline(&self, name: &str) -> bool {
        self.pipelines
            .as_ref()
            .is_some_and(|pipelines| pipelines.contains_key(name))
    }

    pub fn pipeline_names(&self) -> impl Iterator<Item = &str> {
        self.pipelines
            .iter()
            .flat_map(|pipelines| pipelines.keys())
            .map(String::as_str)
    }
}

/// A named execution environment, e.g. a container image.
/// Also used for each entry of a `services` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSpec {
    pub id: String,

    /// Every other key of the long form, in declaration order
    #[serde(flatten)]
    pub properties: Mapping,
}

impl BoxSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: Mapping::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Node>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// One build phase: optional environment overrides plus step lists
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Pipeline {
    #[serde(rename = "box", skip_serializing_if = "Option::is_none")]
    pub box_spec: Option<BoxSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<BoxSpec>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,

    #[serde(rename = "after-steps", skip_serializing_if = "Option::is_none")]
    pub after_steps: Option<Vec<Step>>,

    /// Step lists declared under non-reserved keys, in declaration order
    #[serde(rename = "extraSteps", skip_serializing_if = "Option::is_none")]
    pub extra_steps: Option<IndexMap<String, Vec<Step>>>,
}

impl Pipeline {
    pub fn steps(&self) -> &[Step] {
        self.steps.as_deref().unwrap_or_default()
    }

    pub fn after_steps(&self) -> &[Step] {
        self.after_steps.as_deref().unwrap_or_default()
    }

    pub fn extra_group(&self, group: &str) -> Option<&[Step]> {
        self.extra_steps.as_ref()?.get(group).map(Vec::as_slice)
    }

    /// Total number of steps across all lists and extra groups
    pub fn step_count(&self) -> usize {
        let extra: usize = self
            .extra_steps
            .iter()
            .flat_map(|groups| groups.values())
            .map(Vec::len)
            .sum();
        self.steps().len() + self.after_steps().len() + extra
    }
}

/// One unit of work within a pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub id: String,

    /// Step body, e.g. `name` and `code` of a script step
    #[serde(flatten)]
    pub properties: Mapping,
}

impl Step {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: Mapping::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Node>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
