// Manifest input loading
// Reads manifest text from a file, or from stdin when no path (or '-') is given

use std::io::Read;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

fn is_stdin(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p.as_os_str() == "-")
}

/// Human-readable name of the input source
pub fn describe(path: Option<&Path>) -> String {
    match path {
        Some(path) if !is_stdin(Some(path)) => path.display().to_string(),
        _ => "<stdin>".to_string(),
    }
}

/// Read the whole manifest text
pub fn read_manifest(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if !is_stdin(Some(path)) => {
            if !path.exists() {
                color_eyre::eyre::bail!("Manifest file not found: {}", path.display());
            }
            std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .wrap_err("failed to read manifest from stdin")?;
            Ok(content)
        }
    }
}
