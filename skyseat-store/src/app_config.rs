use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// JSON file holding the submitted booking documents.
    pub bookings_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    /// Print all seats, empty ones as null, rather than only occupied seats.
    #[serde(default = "default_include_empty")]
    pub include_empty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            include_empty: default_include_empty(),
        }
    }
}

fn default_pretty() -> bool { true }
fn default_include_empty() -> bool { true }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from("config", &run_mode)
    }

    pub fn load_from(dir: &str, run_mode: &str) -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // Eg. `SKYSEAT__SOURCE__BOOKINGS_PATH=/data/bookings.json`
            .add_source(config::Environment::with_prefix("SKYSEAT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_layered_files() {
        let dir = env::temp_dir().join(format!("skyseat-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("default.toml"),
            "[source]\nbookings_path = \"data/bookings.json\"\n\n[output]\npretty = true\n",
        )
        .unwrap();
        fs::write(dir.join("staging.toml"), "[output]\npretty = false\n").unwrap();

        let config = Config::load_from(dir.to_str().unwrap(), "staging").unwrap();
        assert_eq!(config.source.bookings_path, "data/bookings.json");
        assert!(!config.output.pretty);
        assert!(config.output.include_empty);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_default_file_fails() {
        let dir = env::temp_dir().join(format!("skyseat-config-{}", uuid::Uuid::new_v4()));
        assert!(Config::load_from(dir.to_str().unwrap(), "development").is_err());
    }
}
