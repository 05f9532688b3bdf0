use crate::core::clock::Zone;
use crate::errors::{AppError, AppResult};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    #[serde(default = "default_weekend_days")]
    pub weekend_days: Vec<String>,
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
    #[serde(default = "default_auto_stop_memo")]
    pub auto_stop_memo: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_utc_offset() -> String {
    "+00:00".to_string()
}
fn default_weekend_days() -> Vec<String> {
    vec!["Sat".to_string(), "Sun".to_string()]
}
fn default_busy_timeout() -> u64 {
    5000
}
fn default_auto_stop_memo() -> String {
    "Employee clocked out".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            utc_offset: default_utc_offset(),
            weekend_days: default_weekend_days(),
            busy_timeout_ms: default_busy_timeout(),
            auto_stop_memo: default_auto_stop_memo(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rshift")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rshift")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rshift.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rshift.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// Organization time zone used for every day-boundary computation.
    pub fn zone(&self) -> AppResult<Zone> {
        Zone::parse(&self.utc_offset)
    }

    /// Weekend days as chrono weekdays; unknown names are rejected.
    pub fn weekend(&self) -> AppResult<Vec<Weekday>> {
        self.weekend_days
            .iter()
            .map(|d| {
                d.parse::<Weekday>()
                    .map_err(|_| AppError::Config(format!("invalid weekend day '{}'", d)))
            })
            .collect()
    }

    /// Fields present in the defaults but missing from the YAML file on disk.
    pub fn missing_fields(path: &Path) -> AppResult<Vec<String>> {
        let content = fs::read_to_string(path)?;
        let on_disk: Value = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {}", path.display(), e)))?;
        let defaults = serde_yaml::to_value(Config::default())
            .map_err(|e| AppError::Config(e.to_string()))?;

        let mut missing = Vec::new();
        if let (Some(disk), Some(def)) = (on_disk.as_mapping(), defaults.as_mapping()) {
            for key in def.keys() {
                if !disk.contains_key(key)
                    && let Some(k) = key.as_str()
                {
                    missing.push(k.to_string());
                }
            }
        }
        Ok(missing)
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            if let Some(parent) = db_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}
