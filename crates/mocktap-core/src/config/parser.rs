//! Configuration file parsing (YAML/JSON/JSONC).

use crate::config::error::ConfigError;
use crate::config::settings::MockerConfig;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Format of a config file, chosen by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    /// JSON with `//` and `/* */` comments
    Jsonc,
}

impl ConfigFormat {
    /// Format for `path`, or `None` when the extension is not recognised.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        [
            ("yaml", Self::Yaml),
            ("yml", Self::Yaml),
            ("json", Self::Json),
            ("jsonc", Self::Jsonc),
        ]
        .into_iter()
        .find_map(|(known, format)| ext.eq_ignore_ascii_case(known).then_some(format))
    }

    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, ConfigError> {
        let parsed: T = match self {
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
            Self::Jsonc => serde_json::from_str(&strip_json_comments(content))?,
        };
        Ok(parsed)
    }
}

fn format_of(path: &Path) -> Result<ConfigFormat, ConfigError> {
    ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnknownFileType(path.display().to_string()))
}

/// Strip `//` and `/* */` comments from JSONC content, leaving string literals intact.
pub fn strip_json_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                // Line comment: drop up to, but not including, the line break
                while let Some(&next) = chars.peek() {
                    if next == '\n' || next == '\r' {
                        break;
                    }
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Parse in-memory config text in the format implied by `path`.
pub fn parse_config<T: DeserializeOwned>(
    content: &str,
    path: impl AsRef<Path>,
) -> Result<T, ConfigError> {
    format_of(path.as_ref())?.parse(content)
}

/// Read and parse a [`MockerConfig`] file.
///
/// Fields missing from the file take their default values.
pub fn load_config(path: impl AsRef<Path>) -> Result<MockerConfig, ConfigError> {
    let path = path.as_ref();
    let format = format_of(path)?;

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: MockerConfig = format.parse(&content)?;
    debug!(path = %path.display(), ?format, enabled = config.enabled, "Loaded mocker config");
    Ok(config)
}
