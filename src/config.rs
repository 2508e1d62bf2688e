// Bot configuration.
//
// Values come from (lowest to highest priority):
// 1. built-in defaults
// 2. an optional JSON config file (`config.json`, or `BOT_CONFIG_FILE`)
// 3. environment variables (after `.env` has been loaded by main)
//
// The token is only ever read from the environment.

use crate::core::progression::{ProgressionCurve, ProgressionError};
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "config.json";
const DEFAULT_PREFIX: &str = "!";
const DEFAULT_JSON_PATH: &str = "data/levels.json";
const DEFAULT_SQLITE_PATH: &str = "data/levels.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variable! Create a .env file with your bot token.")]
    Missing(&'static str),

    #[error("{key} has an invalid value `{value}`")]
    Invalid { key: &'static str, value: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Progression(#[from] ProgressionError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Json(PathBuf),
    Sqlite(PathBuf),
    /// Not durable; progress is lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub prefix: String,
    /// Where level-up announcements go. `None` disables them.
    pub level_channel_id: Option<u64>,
    pub status_channel_id: Option<u64>,
    /// Where member welcome and goodbye embeds go. `None` disables them.
    pub welcome_channel_id: Option<u64>,
    pub storage: StorageBackend,
    pub curve: ProgressionCurve,
    pub xp_per_message: RangeInclusive<u64>,
    pub disabled_cogs: Vec<String>,
}

/// Shape of the JSON config file. Unknown keys are ignored so the file can
/// be shared with other tools.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileConfig {
    prefix: Option<String>,
    #[serde(rename = "LevelChannelID")]
    level_channel_id: Option<u64>,
    #[serde(rename = "StatusChannelID")]
    status_channel_id: Option<u64>,
    #[serde(rename = "WelcomeAndGoodByeChannel")]
    welcome_channel_id: Option<u64>,
    progression_backend: Option<String>,
    progression_path: Option<PathBuf>,
    xp_base: Option<u64>,
    xp_multiplier: Option<f64>,
    xp_min: Option<u64>,
    xp_max: Option<u64>,
    disabled_cogs: Option<Vec<String>>,
}

impl FileConfig {
    /// Read the file at `path`.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl BotConfig {
    /// Load from the process environment plus the optional config file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = match std::env::var("BOT_CONFIG_FILE") {
            // An explicitly named file has to exist.
            Ok(path) => Some(FileConfig::read(Path::new(&path))?),
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Some(FileConfig::read(Path::new(DEFAULT_CONFIG_FILE))?)
            }
            Err(_) => None,
        };

        Self::from_sources(file.unwrap_or_default(), |key| std::env::var(key).ok())
    }

    /// Merge a file config with an environment lookup. Environment wins.
    pub fn from_sources(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = env("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let prefix = env("COMMAND_PREFIX")
            .or(file.prefix)
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "COMMAND_PREFIX",
                value: prefix,
            });
        }

        let level_channel_id =
            parse_env(&env, "LEVEL_CHANNEL_ID")?.or(file.level_channel_id);
        let status_channel_id =
            parse_env(&env, "STATUS_CHANNEL_ID")?.or(file.status_channel_id);
        let welcome_channel_id =
            parse_env(&env, "WELCOME_CHANNEL_ID")?.or(file.welcome_channel_id);

        let backend = env("PROGRESSION_BACKEND")
            .or(file.progression_backend)
            .unwrap_or_else(|| "json".to_string());
        let path = env("PROGRESSION_PATH")
            .map(PathBuf::from)
            .or(file.progression_path);
        let storage = match backend.trim().to_lowercase().as_str() {
            "json" => StorageBackend::Json(path.unwrap_or_else(|| DEFAULT_JSON_PATH.into())),
            "sqlite" => StorageBackend::Sqlite(path.unwrap_or_else(|| DEFAULT_SQLITE_PATH.into())),
            "memory" => StorageBackend::Memory,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "PROGRESSION_BACKEND",
                    value: backend,
                })
            }
        };

        let base_xp = parse_env(&env, "XP_BASE")?
            .or(file.xp_base)
            .unwrap_or(crate::core::progression::progression_engine::DEFAULT_BASE_XP);
        let multiplier = parse_env(&env, "XP_MULTIPLIER")?
            .or(file.xp_multiplier)
            .unwrap_or(crate::core::progression::progression_engine::DEFAULT_MULTIPLIER);
        let curve = ProgressionCurve::new(base_xp, multiplier)?;

        let default_range = crate::core::progression::progression_service::DEFAULT_XP_PER_MESSAGE;
        let xp_min = parse_env(&env, "XP_MIN")?
            .or(file.xp_min)
            .unwrap_or(*default_range.start());
        let xp_max = parse_env(&env, "XP_MAX")?
            .or(file.xp_max)
            .unwrap_or(*default_range.end());
        if xp_min == 0 || xp_min > xp_max {
            return Err(ProgressionError::InvalidXpRange {
                min: xp_min,
                max: xp_max,
            }
            .into());
        }

        let disabled_cogs = match env("DISABLED_COGS") {
            Some(list) => list
                .split(',')
                .map(|name| name.trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .collect(),
            None => file
                .disabled_cogs
                .unwrap_or_default()
                .into_iter()
                .map(|name| name.trim().to_lowercase())
                .collect(),
        };

        Ok(Self {
            token,
            prefix,
            level_channel_id,
            status_channel_id,
            welcome_channel_id,
            storage,
            curve,
            xp_per_message: xp_min..=xp_max,
            disabled_cogs,
        })
    }
}

fn parse_env<T: std::str::FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_with_only_a_token() {
        let config =
            BotConfig::from_sources(FileConfig::default(), env_of(&[("DISCORD_TOKEN", "abc")]))
                .unwrap();

        assert_eq!(config.prefix, "!");
        assert_eq!(config.level_channel_id, None);
        assert_eq!(config.welcome_channel_id, None);
        assert_eq!(
            config.storage,
            StorageBackend::Json(PathBuf::from("data/levels.json"))
        );
        assert_eq!(config.curve, ProgressionCurve::default());
        assert_eq!(config.xp_per_message, 3..=8);
        assert!(config.disabled_cogs.is_empty());
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = BotConfig::from_sources(FileConfig::default(), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DISCORD_TOKEN")));
    }

    #[test]
    fn file_values_are_used_and_env_overrides_them() {
        let file: FileConfig = serde_json::from_str(
            r#"{
                "Prefix": "?",
                "LevelChannelID": 111,
                "StatusChannelID": 222,
                "WelcomeAndGoodByeChannel": 444,
                "ProgressionBackend": "sqlite",
                "jokes": ["ignored"]
            }"#,
        )
        .unwrap();

        let config = BotConfig::from_sources(
            file,
            env_of(&[("DISCORD_TOKEN", "abc"), ("LEVEL_CHANNEL_ID", "333")]),
        )
        .unwrap();

        assert_eq!(config.prefix, "?");
        assert_eq!(config.level_channel_id, Some(333));
        assert_eq!(config.status_channel_id, Some(222));
        assert_eq!(config.welcome_channel_id, Some(444));
        assert_eq!(
            config.storage,
            StorageBackend::Sqlite(PathBuf::from("data/levels.db"))
        );
    }

    #[test]
    fn rejects_bad_numbers_and_backends() {
        let err = BotConfig::from_sources(
            FileConfig::default(),
            env_of(&[("DISCORD_TOKEN", "abc"), ("LEVEL_CHANNEL_ID", "general")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "LEVEL_CHANNEL_ID",
                ..
            }
        ));

        let err = BotConfig::from_sources(
            FileConfig::default(),
            env_of(&[("DISCORD_TOKEN", "abc"), ("PROGRESSION_BACKEND", "redis")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_curves_that_shrink() {
        let err = BotConfig::from_sources(
            FileConfig::default(),
            env_of(&[("DISCORD_TOKEN", "abc"), ("XP_MULTIPLIER", "0.5")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Progression(ProgressionError::InvalidCurve(_))
        ));
    }

    #[test]
    fn rejects_inverted_xp_range() {
        let err = BotConfig::from_sources(
            FileConfig::default(),
            env_of(&[("DISCORD_TOKEN", "abc"), ("XP_MIN", "9"), ("XP_MAX", "2")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Progression(ProgressionError::InvalidXpRange { min: 9, max: 2 })
        ));
    }

    #[test]
    fn disabled_cogs_are_normalized() {
        let config = BotConfig::from_sources(
            FileConfig::default(),
            env_of(&[
                ("DISCORD_TOKEN", "abc"),
                ("DISABLED_COGS", " Fun, moderation ,,"),
                ("PROGRESSION_BACKEND", "memory"),
            ]),
        )
        .unwrap();
        assert_eq!(config.disabled_cogs, vec!["fun", "moderation"]);
        assert_eq!(config.storage, StorageBackend::Memory);
    }

    #[test]
    fn welcome_channel_comes_from_env() {
        let config = BotConfig::from_sources(
            FileConfig::default(),
            env_of(&[("DISCORD_TOKEN", "abc"), ("WELCOME_CHANNEL_ID", "555")]),
        )
        .unwrap();
        assert_eq!(config.welcome_channel_id, Some(555));
    }

    #[test]
    fn explicit_path_is_kept() {
        let config = BotConfig::from_sources(
            FileConfig::default(),
            env_of(&[
                ("DISCORD_TOKEN", "abc"),
                ("PROGRESSION_PATH", "/tmp/somewhere.json"),
            ]),
        )
        .unwrap();
        assert_eq!(
            config.storage,
            StorageBackend::Json(PathBuf::from("/tmp/somewhere.json"))
        );
    }
}
