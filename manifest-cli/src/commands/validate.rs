use crate::input;
use crate::output;

use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;

use manifest_parser::{BoxSpec, Manifest, ManifestParser, Pipeline};

/// Validate a build manifest
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the manifest YAML file ('-' or omitted reads stdin)
    pub manifest: Option<PathBuf>,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let source = args.manifest.as_deref();

    output::status("Validating", &input::describe(source));
    let content = input::read_manifest(source)?;

    let manifest = match ManifestParser::parse(&content) {
        Ok(Some(manifest)) => manifest,
        Ok(None) => {
            output::warning("input is empty, there is no manifest to validate");
            return Ok(());
        }
        Err(e) => {
            output::manifest_error(&e);
            std::process::exit(1);
        }
    };

    for line in summarize(&manifest) {
        output::check(&line);
    }

    println!();
    output::success("Manifest is valid");

    Ok(())
}

/// One line per box, service list, and pipeline
pub fn summarize(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(spec) = &manifest.box_spec {
        lines.push(format!("Box: {}", describe_box(spec)));
    }

    if let Some(services) = &manifest.services {
        let ids: Vec<String> = services.iter().map(describe_box).collect();
        lines.push(format!("Services: {}", ids.join(", ")));
    }

    match &manifest.pipelines {
        Some(pipelines) => {
            for (name, pipeline) in pipelines {
                lines.push(match pipeline {
                    Some(pipeline) => format!("Pipeline '{}': {}", name, describe_pipeline(pipeline)),
                    None => format!("Pipeline '{}': empty", name),
                });
            }
        }
        None => lines.push("No pipelines declared".to_string()),
    }

    lines
}

fn describe_box(spec: &BoxSpec) -> String {
    if spec.properties.is_empty() {
        spec.id.clone()
    } else {
        format!("{} (+{} settings)", spec.id, spec.properties.len())
    }
}

fn describe_pipeline(pipeline: &Pipeline) -> String {
    let mut parts = vec![format!("{} steps", pipeline.steps().len())];

    if !pipeline.after_steps().is_empty() {
        parts.push(format!("{} after-steps", pipeline.after_steps().len()));
    }

    if let Some(groups) = &pipeline.extra_steps {
        let names: Vec<&str> = groups.keys().map(String::as_str).collect();
        parts.push(format!("extra groups [{}]", names.join(", ")));
    }

    if let Some(spec) = &pipeline.box_spec {
        parts.push(format!("box {}", describe_box(spec)));
    }

    parts.join(", ")
}
