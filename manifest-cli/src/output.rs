// Terminal output for the validate and normalize commands

use manifest_parser::ManifestError;

/// Right-aligned action label followed by a message
pub fn status(action: &str, message: &str) {
    eprintln!("\x1b[1;36m{:>12}\x1b[0m {}", action, message);
}

pub fn success(message: &str) {
    eprintln!("\x1b[1;32m  \u{2713}\x1b[0m {}", message);
}

pub fn check(message: &str) {
    eprintln!("\x1b[32m  \u{2713}\x1b[0m {}", message);
}

pub fn warning(message: &str) {
    eprintln!("\x1b[33m  !\x1b[0m {}", message);
}

/// Print a manifest error with its location, source excerpt, and suggestion
pub fn manifest_error(err: &ManifestError) {
    eprint!("{}", render_error(err));
}

fn render_error(err: &ManifestError) -> String {
    let mut out = format!("\x1b[1;31merror:\x1b[0m {}\n", err.message());

    let location = match err {
        ManifestError::Parse(parse) if parse.line > 0 => {
            Some(format!("line {}:{}", parse.line, parse.column))
        }
        ManifestError::Validation(validation) if !validation.path.is_empty() => {
            Some(format!("at '{}'", validation.path))
        }
        _ => None,
    };
    if let Some(location) = location {
        out.push_str(&format!("\x1b[2m  --> {}\x1b[0m\n", location));
    }

    if let ManifestError::Parse(parse) = err {
        if !parse.context.is_empty() {
            out.push('\n');
            out.push_str(&parse.context);
        }
    }

    if let Some(suggestion) = err.suggestion() {
        out.push_str(&format!("\n\x1b[36m  i\x1b[0m help: {}\n", suggestion));
    }

    out
}
