// Build manifest parser
// Decodes manifest text and normalizes the root, its boxes, and its pipelines

use crate::parser::boxes::{normalize_box, normalize_service_list};
use crate::parser::decode::decode;
use crate::parser::error::{ManifestResult, ValidationError, ValidationResult, Violation};
use crate::parser::keys::{key_path, partition, ROOT_KEYS};
use crate::parser::models::{Manifest, Node};
use crate::parser::pipeline::normalize_pipeline;

use indexmap::IndexMap;
use tracing::{debug, trace};

/// Build manifest parser
pub struct ManifestParser;

impl ManifestParser {
    /// Parse a manifest from YAML text.
    ///
    /// Empty input is not an error: it yields `Ok(None)`.
    pub fn parse(content: &str) -> ManifestResult<Option<Manifest>> {
        if content.is_empty() {
            debug!("empty manifest input");
            return Ok(None);
        }

        let root = decode(content).inspect_err(|e| {
            debug!(line = e.line, column = e.column, "manifest is not valid yaml");
        })?;

        let manifest = normalize_root(root).inspect_err(|e| {
            debug!(path = %e.path, violation = %e.violation, "manifest rejected");
        })?;

        Ok(Some(manifest))
    }

    /// Parse input that may be absent altogether
    pub fn parse_optional(content: Option<&str>) -> ManifestResult<Option<Manifest>> {
        match content {
            Some(content) => Self::parse(content),
            None => Ok(None),
        }
    }
}

/// Parse a manifest from YAML text, see [`ManifestParser::parse`]
pub fn parse(content: &str) -> ManifestResult<Option<Manifest>> {
    ManifestParser::parse(content)
}

/// Normalize a decoded root node into a [`Manifest`].
///
/// Every non-reserved root key is relocated under `pipelines`.
pub fn normalize_root(root: Node) -> ValidationResult<Manifest> {
    let fields = match root {
        Node::Mapping(fields) => fields,
        other => {
            return Err(ValidationError::new(Violation::Root, "").with_suggestion(format!(
                "a manifest is a mapping of settings and pipelines, found {}",
                other.kind_name()
            )))
        }
    };

    let mut split = partition(fields, &ROOT_KEYS);
    let mut manifest = Manifest::default();

    if let Some(node) = split.reserved.shift_remove("box") {
        manifest.box_spec = Some(normalize_box(node, "box")?);
    }

    if let Some(node) = split.reserved.shift_remove("services") {
        manifest.services = Some(normalize_service_list(node, "services")?);
    }

    // Passthrough settings, never interpreted here
    manifest.command_timeout = split.reserved.shift_remove("command-timeout");
    manifest.source_dir = split.reserved.shift_remove("source-dir");
    manifest.no_response_timeout = split.reserved.shift_remove("no-response-timeout");

    if !split.derived.is_empty() {
        let mut pipelines = IndexMap::with_capacity(split.derived.len());
        for (name, node) in split.derived {
            let pipeline = normalize_pipeline(node, &key_path("", &name))?;
            trace!(
                pipeline = %name,
                steps = pipeline.as_ref().map_or(0, |p| p.step_count()),
                "normalized pipeline"
            );
            pipelines.insert(name, pipeline);
        }
        manifest.pipelines = Some(pipelines);
    }

    debug!(
        pipelines = manifest.pipelines.as_ref().map_or(0, IndexMap::len),
        services = manifest.services.as_ref().map_or(0, Vec::len),
        "normalized manifest"
    );

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::error::{ErrorKind, ManifestError};
    use crate::parser::models::{BoxSpec, Pipeline, Step};

    fn parse_ok(yaml: &str) -> Manifest {
        ManifestParser::parse(yaml).unwrap().unwrap()
    }

    fn parse_err(yaml: &str) -> ManifestError {
        ManifestParser::parse(yaml).unwrap_err()
    }

    fn to_json(manifest: &Manifest) -> serde_json::Value {
        serde_json::to_value(manifest).unwrap()
    }

    #[test]
    fn test_empty_input_returns_none() {
        assert_eq!(ManifestParser::parse("").unwrap(), None);
        assert_eq!(ManifestParser::parse_optional(None).unwrap(), None);
        assert_eq!(ManifestParser::parse_optional(Some("")).unwrap(), None);
    }

    #[test]
    fn test_expand_box_property() {
        let manifest = parse_ok("---\nbox: ubuntu\n");
        assert_eq!(to_json(&manifest), serde_json::json!({"box": {"id": "ubuntu"}}));
    }

    #[test]
    fn test_keep_expanded_box_property() {
        let short = parse_ok("---\nbox: ubuntu\n");
        let long = parse_ok("---\nbox: \n  id: ubuntu\n");
        assert_eq!(short, long);
        assert_eq!(long.box_spec, Some(BoxSpec::new("ubuntu")));
    }

    #[test]
    fn test_expand_services_property() {
        let manifest = parse_ok("---\nservices:\n  - ubuntu");
        assert_eq!(manifest.services, Some(vec![BoxSpec::new("ubuntu")]));

        let manifest = parse_ok("---\nservices:\n  - id: ubuntu");
        assert_eq!(manifest.services, Some(vec![BoxSpec::new("ubuntu")]));
    }

    #[test]
    fn test_null_pipelines() {
        let manifest = parse_ok("---\nbuild:\ndeploy:\n");
        assert_eq!(
            to_json(&manifest),
            serde_json::json!({"pipelines": {"build": null, "deploy": null}})
        );
        assert!(manifest.has_pipeline("build"));
        assert!(manifest.pipeline("build").is_none());
    }

    #[test]
    fn test_box_in_pipelines() {
        let yaml = r#"---
build:
  box: ubuntu
deploy:
  box:
    id: ubuntu
"#;
        let manifest = parse_ok(yaml);

        for name in ["build", "deploy"] {
            assert_eq!(
                manifest.pipeline(name).unwrap().box_spec,
                Some(BoxSpec::new("ubuntu"))
            );
        }
    }

    #[test]
    fn test_services_in_pipelines() {
        let yaml = r#"---
build:
  services:
    - mysql
    - id: mongodb
deploy:
  box:
    id: ubuntu
"#;
        let manifest = parse_ok(yaml);

        assert_eq!(
            to_json(&manifest),
            serde_json::json!({
                "pipelines": {
                    "build": {"services": [{"id": "mysql"}, {"id": "mongodb"}]},
                    "deploy": {"box": {"id": "ubuntu"}}
                }
            })
        );
    }

    #[test]
    fn test_steps_in_pipelines() {
        let yaml = r#"---
build:
  steps:
    - npm-install
    - script:
      name: echo foo
      code: echo foo
    - script:
        name: echo bar
        code: echo bar
"#;
        let manifest = parse_ok(yaml);

        assert_eq!(
            to_json(&manifest),
            serde_json::json!({
                "pipelines": {
                    "build": {
                        "steps": [
                            {"id": "npm-install"},
                            {"id": "script", "name": "echo foo", "code": "echo foo"},
                            {"id": "script", "name": "echo bar", "code": "echo bar"}
                        ]
                    }
                }
            })
        );
    }

    #[test]
    fn test_reserved_keys_are_not_pipelines() {
        let yaml = r#"---
box: ubuntu
services:
  - mysql
command-timeout: 60
no-response-timeout: 60
source-dir: src
"#;
        let manifest = parse_ok(yaml);

        assert!(manifest.pipelines.is_none());
        assert_eq!(
            to_json(&manifest),
            serde_json::json!({
                "box": {"id": "ubuntu"},
                "services": [{"id": "mysql"}],
                "command-timeout": 60,
                "source-dir": "src",
                "no-response-timeout": 60
            })
        );
    }

    #[test]
    fn test_passthrough_values_are_verbatim() {
        let yaml = "command-timeout:\n  minutes: 5\nsource-dir:\nno-response-timeout: [1, 2]\n";
        let manifest = parse_ok(yaml);

        assert_eq!(
            to_json(&manifest),
            serde_json::json!({
                "command-timeout": {"minutes": 5},
                "source-dir": null,
                "no-response-timeout": [1, 2]
            })
        );
    }

    #[test]
    fn test_extra_steps_in_pipelines() {
        let yaml = r#"---
build:
  steps:
    - npm-install
    - script:
      name: echo foo
      code: echo foo
  custom-section:
    - npm-install
    - script:
        name: echo bar
        code: echo bar
"#;
        let manifest = parse_ok(yaml);
        let build = manifest.pipeline("build").unwrap();

        assert_eq!(build.steps().len(), 2);
        assert_eq!(
            build.extra_group("custom-section").unwrap(),
            &[
                Step::new("npm-install"),
                Step::new("script")
                    .with_property("name", "echo bar")
                    .with_property("code", "echo bar"),
            ]
        );
        assert_eq!(
            to_json(&manifest)["pipelines"]["build"]["extraSteps"]["custom-section"][0],
            serde_json::json!({"id": "npm-install"})
        );
    }

    #[test]
    fn test_root_key_partition() {
        let yaml = r#"
deploy:
box: ubuntu
build:
  custom: [a]
  steps: [b]
source-dir: src
test:
"#;
        let manifest = parse_ok(yaml);

        assert_eq!(
            manifest.pipeline_names().collect::<Vec<_>>(),
            vec!["deploy", "build", "test"]
        );
        assert!(manifest.box_spec.is_some());
        assert!(manifest.source_dir.is_some());

        let build = manifest.pipeline("build").unwrap();
        assert_eq!(build.steps(), &[Step::new("b")]);
        assert_eq!(
            build.extra_steps.as_ref().unwrap().keys().collect::<Vec<_>>(),
            vec!["custom"]
        );
    }

    #[test]
    fn test_pipeline_with_everything() {
        let yaml = r#"
box: node:20
services:
  - redis
build:
  box:
    id: golang
    tag: "1.22"
  steps:
    - go-build
  after-steps:
    - slack-notify
"#;
        let manifest = parse_ok(yaml);

        assert_eq!(
            manifest.pipeline("build"),
            Some(&Pipeline {
                box_spec: Some(BoxSpec::new("golang").with_property("tag", "1.22")),
                steps: Some(vec![Step::new("go-build")]),
                after_steps: Some(vec![Step::new("slack-notify")]),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_unable_to_parse_yaml() {
        let err = parse_err("build:\n  steps: [a\n");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.message(), "Unable to parse yaml");
    }

    #[test]
    fn test_root_should_be_object() {
        for yaml in ["- build", "ubuntu", "42", "~", "   ", "---\n"] {
            let err = parse_err(yaml);
            assert_eq!(err.kind(), ErrorKind::Validation, "input: {:?}", yaml);
            assert_eq!(err.message(), "root object should be an object");
        }
    }

    #[test]
    fn test_validation_messages() {
        let cases = [
            ("box: 3\n", "box (or service item) should be object or string", "box"),
            ("services: mysql\n", "services should be an array", "services"),
            ("services:\n  - [a]\n", "box (or service item) should be object or string", "services[0]"),
            ("build: [a]\n", "pipeline should be an object", "build"),
            ("build:\n  steps: a\n", "steps should be an array", "build.steps"),
            ("build:\n  after-steps: {}\n", "steps should be an array", "build.after-steps"),
            ("build:\n  steps:\n    - 1\n", "step should be object or string", "build.steps[0]"),
            (
                "build:\n  steps:\n    - a:\n      b:\n",
                "only a single null value is supported",
                "build.steps[0]",
            ),
            (
                "build:\n  steps:\n    - name: x\n      code: y\n",
                "only a single null value is supported",
                "build.steps[0]",
            ),
        ];

        for (yaml, message, path) in cases {
            let err = parse_err(yaml);
            assert_eq!(err.kind(), ErrorKind::Validation, "input: {:?}", yaml);
            assert_eq!(err.message(), message, "input: {:?}", yaml);
            match err {
                ManifestError::Validation(err) => assert_eq!(err.path, path),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_errors_follow_depth_first_order() {
        let yaml = r#"
build:
  steps: nope
services: nope
box: 3
"#;
        // box is checked before services, both before any pipeline
        let err = parse_err(yaml);
        assert_eq!(err.message(), "box (or service item) should be object or string");
    }

    #[test]
    fn test_parse_from_many_threads() {
        let handles: Vec<_> = (0..4)
            .map(|i| std::thread::spawn(move || parse(&format!("box: ubuntu\nstage-{}:\n", i))))
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let manifest = handle.join().unwrap().unwrap().unwrap();
            assert!(manifest.has_pipeline(&format!("stage-{}", i)));
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let yaml = "box: ubuntu\nbuild:\n  steps:\n    - a\n";
        assert_eq!(parse(yaml).unwrap(), parse(yaml).unwrap());
        assert_eq!(parse("x: 1\n").unwrap_err(), parse("x: 1\n").unwrap_err());
    }
}
