//! Flat key-value settings file

use anyhow::{Context, bail};
use flick_ai::ClientConfig;
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Environment variable consulted when no API key is stored
pub const API_KEY_ENV: &str = "FLICK_API_KEY";

/// Keys the settings store recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    ApiKey,
    BaseUrl,
    ModelName,
    ApiProvider,
    GlobalShortcut,
    HideOnBlur,
    AutoLaunch,
    WindowOpacity,
    CurrentPresetId,
    WindowBounds,
}

/// Value shape expected for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Text,
    Bool,
    Number,
    Table,
}

impl SettingKey {
    pub const ALL: [SettingKey; 10] = [
        SettingKey::ApiKey,
        SettingKey::BaseUrl,
        SettingKey::ModelName,
        SettingKey::ApiProvider,
        SettingKey::GlobalShortcut,
        SettingKey::HideOnBlur,
        SettingKey::AutoLaunch,
        SettingKey::WindowOpacity,
        SettingKey::CurrentPresetId,
        SettingKey::WindowBounds,
    ];

    /// Name as stored in the file
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::ApiKey => "apiKey",
            SettingKey::BaseUrl => "baseUrl",
            SettingKey::ModelName => "modelName",
            SettingKey::ApiProvider => "apiProvider",
            SettingKey::GlobalShortcut => "globalShortcut",
            SettingKey::HideOnBlur => "hideOnBlur",
            SettingKey::AutoLaunch => "autoLaunch",
            SettingKey::WindowOpacity => "windowOpacity",
            SettingKey::CurrentPresetId => "currentPresetId",
            SettingKey::WindowBounds => "windowBounds",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    fn kind(&self) -> ValueKind {
        match self {
            SettingKey::HideOnBlur | SettingKey::AutoLaunch => ValueKind::Bool,
            SettingKey::WindowOpacity => ValueKind::Number,
            SettingKey::WindowBounds => ValueKind::Table,
            _ => ValueKind::Text,
        }
    }

    /// Value returned when the key is not stored
    pub fn default_value(&self) -> Option<Value> {
        match self {
            SettingKey::ApiKey => Some(Value::String(String::new())),
            SettingKey::BaseUrl => Some(Value::String("https://api.deepseek.com".into())),
            SettingKey::ModelName => Some(Value::String("deepseek-chat".into())),
            SettingKey::ApiProvider => Some(Value::String("deepseek".into())),
            SettingKey::GlobalShortcut => {
                Some(Value::String("CommandOrControl+Shift+Space".into()))
            }
            SettingKey::HideOnBlur | SettingKey::AutoLaunch => Some(Value::Boolean(false)),
            SettingKey::CurrentPresetId => Some(Value::String("default".into())),
            SettingKey::WindowBounds => Some(Value::Table(Table::new())),
            SettingKey::WindowOpacity => None,
        }
    }

    /// Parse a raw command-line value into the shape this key stores
    pub fn parse_value(&self, raw: &str) -> anyhow::Result<Value> {
        Ok(match self.kind() {
            ValueKind::Text => Value::String(raw.to_string()),
            ValueKind::Bool => Value::Boolean(
                raw.parse()
                    .with_context(|| format!("{} expects true or false", self.as_str()))?,
            ),
            ValueKind::Number => match raw.parse::<i64>() {
                Ok(n) => Value::Integer(n),
                Err(_) => Value::Float(
                    raw.parse()
                        .with_context(|| format!("{} expects a number", self.as_str()))?,
                ),
            },
            ValueKind::Table => Value::Table(
                toml::from_str(raw)
                    .with_context(|| format!("{} expects an inline TOML table body", self.as_str()))?,
            ),
        })
    }
}

/// Settings persisted as a flat TOML table
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    values: Table,
}

impl SettingsStore {
    /// Get the settings directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("flick")
    }

    /// Get the settings file path
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("FLICK_SETTINGS_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("settings.toml")
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load settings from `path`; a missing or unreadable file yields an
    /// empty store that will be written on the first `set`.
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<Table>(&content) {
                    Ok(values) => values,
                    Err(e) => {
                        tracing::warn!("Failed to parse settings file {}: {}", path.display(), e);
                        Table::new()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read settings file {}: {}", path.display(), e);
                    Table::new()
                }
            }
        } else {
            Table::new()
        };

        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored value, or the key's default
    pub fn get(&self, key: SettingKey) -> Option<Value> {
        self.values
            .get(key.as_str())
            .cloned()
            .or_else(|| key.default_value())
    }

    /// Stored or default value as a string, if it is one
    pub fn get_str(&self, key: SettingKey) -> Option<String> {
        match self.get(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Store a value and persist the file
    pub fn set(&mut self, key: SettingKey, value: Value) -> anyhow::Result<()> {
        tracing::debug!("Setting {}", key.as_str());
        self.values.insert(key.as_str().to_string(), value);
        self.save()
    }

    /// `set` from a `name=value` string as given on the command line
    pub fn set_from_str(&mut self, assignment: &str) -> anyhow::Result<SettingKey> {
        let Some((name, raw)) = assignment.split_once('=') else {
            bail!("expected KEY=VALUE, got '{}'", assignment);
        };
        let Some(key) = SettingKey::parse(name.trim()) else {
            bail!(
                "unknown setting '{}' (known: {})",
                name.trim(),
                SettingKey::ALL.map(|k| k.as_str()).join(", ")
            );
        };
        let value = key.parse_value(raw.trim())?;
        self.set(key, value)?;
        Ok(key)
    }

    /// Write settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let content = toml::to_string_pretty(&self.values)?;
        fs::write(&self.path, content)
            .with_context(|| format!("writing {}", self.path.display()))
    }

    /// Create a settings file with example content if none exists
    pub fn init() -> anyhow::Result<PathBuf> {
        let path = Self::default_path();
        if path.exists() {
            return Ok(path);
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, example_settings())?;
        Ok(path)
    }

    /// Connection settings for the next request. Read fresh every time so
    /// edits apply without restarting.
    pub fn client_config(&self) -> ClientConfig {
        let stored_key = self.get_str(SettingKey::ApiKey);
        let api_key =
            flick_ai::providers::resolve_api_key(stored_key.as_deref(), API_KEY_ENV)
                .unwrap_or_default();

        ClientConfig::new(
            api_key,
            self.get_str(SettingKey::BaseUrl).unwrap_or_default(),
            self.get_str(SettingKey::ModelName).unwrap_or_default(),
        )
    }
}

/// Generate example settings content
pub fn example_settings() -> &'static str {
    r#"# flick settings
# Place at ~/.config/flick/settings.toml (Linux/Mac) or %APPDATA%\flick\settings.toml (Windows)
# Edit with: flick --set key=value

# API key (FLICK_API_KEY is used when this is empty)
apiKey = ""

# OpenAI-compatible endpoint and model
baseUrl = "https://api.deepseek.com"
modelName = "deepseek-chat"
apiProvider = "deepseek"

# Preset applied to every message (see /preset)
currentPresetId = "default"
"#
}
