use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub parsing: Option<ParsingSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingSection {
    /// Phrases appended to the built-in junk denylist.
    pub extra_junk_keywords: Option<Vec<String>>,
    pub min_text_chars: Option<usize>,
    pub min_alpha_ratio: Option<f64>,
    pub fallback_min_tokens: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub input: Option<String>,
    pub path: Option<String>,
    /// `json`, `csv` or `markdown`.
    pub format: Option<String>,
}

/// Platform config directory path: `<config_dir>/lattes/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lattes").join("config.toml"))
}

/// Load config by cascading CWD `.lattes.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".lattes.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        parsing: Some(ParsingSection {
            extra_junk_keywords: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.extra_junk_keywords.clone())
                .or_else(|| {
                    base.parsing
                        .as_ref()
                        .and_then(|p| p.extra_junk_keywords.clone())
                }),
            min_text_chars: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.min_text_chars)
                .or_else(|| base.parsing.as_ref().and_then(|p| p.min_text_chars)),
            min_alpha_ratio: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.min_alpha_ratio)
                .or_else(|| base.parsing.as_ref().and_then(|p| p.min_alpha_ratio)),
            fallback_min_tokens: overlay
                .parsing
                .as_ref()
                .and_then(|p| p.fallback_min_tokens)
                .or_else(|| base.parsing.as_ref().and_then(|p| p.fallback_min_tokens)),
        }),
        output: Some(OutputSection {
            input: overlay
                .output
                .as_ref()
                .and_then(|o| o.input.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.input.clone())),
            path: overlay
                .output
                .as_ref()
                .and_then(|o| o.path.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.path.clone())),
            format: overlay
                .output
                .as_ref()
                .and_then(|o| o.format.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.format.clone())),
        }),
    }
}
