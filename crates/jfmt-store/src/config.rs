use crate::{config_path, write_atomic};
use jfmt_core::preview::DEFAULT_PREVIEW_CHARS;
use serde_json::{Map, Value};
use std::path::Path;

/// Known config keys.
pub const PREVIEW_CHARS: &str = "preview_chars";
pub const CLIPBOARD_FALLBACK: &str = "clipboard_fallback";

/// Settings read from `<store_root>/config.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Characters shown per entry in `history list`.
    pub preview_chars: usize,
    /// Try the OSC 52 terminal sequence when the system clipboard fails.
    pub clipboard_fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
            clipboard_fallback: true,
        }
    }
}

impl Config {
    /// Load from the store root. A missing or broken file yields defaults.
    pub fn load(root: &Path) -> Self {
        let path = config_path(root);
        match read_config(&path).and_then(|map| Self::from_map(&map)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %format!("{e:#}"),
                    "using default config"
                );
                Self::default()
            }
        }
    }

    /// Build from a raw map. Unknown keys are ignored.
    pub fn from_map(map: &Map<String, Value>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(v) = map.get(PREVIEW_CHARS) {
            let n = v.as_u64().filter(|n| *n > 0).ok_or_else(|| {
                anyhow::anyhow!("{PREVIEW_CHARS} must be a positive integer, got {v}")
            })?;
            config.preview_chars = usize::try_from(n)?;
        }
        if let Some(v) = map.get(CLIPBOARD_FALLBACK) {
            config.clipboard_fallback = v.as_bool().ok_or_else(|| {
                anyhow::anyhow!("{CLIPBOARD_FALLBACK} must be true or false, got {v}")
            })?;
        }
        Ok(config)
    }
}

/// Read config as a raw map. Returns empty map if file doesn't exist.
pub fn read_config(path: &Path) -> anyhow::Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = std::fs::read_to_string(path)?;
    let val: Value = serde_json::from_str(&content)?;
    match val {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

pub fn write_config(path: &Path, config: &Map<String, Value>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&config)?;
    write_atomic(path, json.as_bytes())
}

/// Parse a string value into an appropriate JSON value (bool/number/string).
pub fn parse_value(s: &str) -> Value {
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                Value::Number(n.into())
            } else {
                Value::String(s.to_string())
            }
        }
    }
}

/// Set `key` to `raw` in the config file, rejecting values that would make
/// a known key invalid.
pub fn set_value(root: &Path, key: &str, raw: &str) -> anyhow::Result<Value> {
    let path = config_path(root);
    let mut map = read_config(&path)?;
    let value = parse_value(raw);
    map.insert(key.to_string(), value.clone());
    Config::from_map(&map)?;
    write_config(&path, &map)?;
    Ok(value)
}
