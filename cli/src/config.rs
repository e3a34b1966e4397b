use std::path::{Path, PathBuf};

use dedlee::options::CompileOptions;

/// Name of the options file picked up next to a source file.
pub const DEFAULT_CONFIG: &str = "dedlee.toml";

/// Load compile options.
///
/// An explicit `--config` path must exist. Otherwise `dedlee.toml` next to
/// the source file is used when present, and the defaults when not.
pub fn load_options(explicit: Option<&Path>, source: &Path) -> Result<CompileOptions, String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = sibling_config(source);
            if !candidate.is_file() {
                log::debug!("no {} next to {}", DEFAULT_CONFIG, source.display());
                return Ok(CompileOptions::default());
            }
            candidate
        }
    };

    let text = std::fs::read_to_string(&path)
        .map_err(|e| format!("cannot read config '{}': {}", path.display(), e))?;
    let options = parse_options(&text)
        .map_err(|e| format!("invalid config '{}': {}", path.display(), e))?;
    log::info!("loaded options from {}: {:?}", path.display(), options);
    Ok(options)
}

pub fn parse_options(text: &str) -> Result<CompileOptions, toml::de::Error> {
    toml::from_str(text)
}

fn sibling_config(source: &Path) -> PathBuf {
    source
        .parent()
        .map(|dir| dir.join(DEFAULT_CONFIG))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}
