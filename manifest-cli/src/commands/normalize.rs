use crate::input;
use crate::output;

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use color_eyre::Result;

use manifest_parser::{Manifest, ManifestParser};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Print the canonical form of a build manifest
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Path to the manifest YAML file ('-' or omitted reads stdin)
    pub manifest: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "yaml")]
    pub format: OutputFormat,
}

pub fn execute(args: NormalizeArgs) -> Result<()> {
    let content = input::read_manifest(args.manifest.as_deref())?;

    let manifest = match ManifestParser::parse(&content) {
        Ok(manifest) => manifest,
        Err(e) => {
            output::manifest_error(&e);
            std::process::exit(1);
        }
    };

    print!("{}", render(manifest.as_ref(), args.format)?);
    Ok(())
}

/// Serialize a normalized manifest; empty input renders as `null`
pub fn render(manifest: Option<&Manifest>, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&manifest)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&manifest)?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}
