#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Eq, PartialEq, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    Language,
    ServerURL,
    UploadTimeout,
}

fn default_config_path() -> path::PathBuf {
    #[cfg(target_os = "macos")]
    return path::PathBuf::from(std::env::var("HOME").unwrap())
        .join(".config/pdfchat/config.toml");
    #[cfg(not(target_os = "macos"))]
    return dirs::config_dir().unwrap().join("pdfchat/config.toml");
}

/// Reuses the clap value parser for a key so the config file and the CLI
/// validate against the same list.
fn possible_values_for(cmd: &Command, key: ConfigKey) -> Vec<String> {
    let arg = cmd
        .get_arguments()
        .find(|e| return e.get_long().unwrap() == key.to_string());

    if let Some(arg) = arg {
        return arg
            .get_possible_values()
            .iter()
            .map(|e| return e.get_name().to_string())
            .collect::<Vec<String>>();
    }

    return vec![];
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let res = match key {
            ConfigKey::Language => "en".to_string(),
            ConfigKey::ServerURL => "http://127.0.0.1:5000".to_string(),
            ConfigKey::UploadTimeout => "60000".to_string(),
            ConfigKey::ConfigFile => default_config_path().to_string_lossy().to_string(),
        };

        return res;
    }

    /// Layers configuration sources: defaults, then the config file, then
    /// environment variables and flags through clap.
    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Some(arg_config_file) =
                matches.get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                let val = match doc.get(&key.to_string()) {
                    Some(val) => val,
                    None => continue,
                };

                if let Some(val_int) = val.as_integer() {
                    Config::set(key, &val_int.to_string());
                    continue;
                }

                if let Some(val_str) = val.as_str() {
                    if val_str.is_empty() {
                        continue;
                    }

                    let possible_values = possible_values_for(&cmd, key);
                    if !possible_values.is_empty()
                        && !possible_values.contains(&val_str.to_string())
                    {
                        bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                    }
                    Config::set(key, val_str);
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            server_url = Config::get(ConfigKey::ServerURL),
            language = Config::get(ConfigKey::Language),
            upload_timeout = Config::get(ConfigKey::UploadTimeout),
            "config"
        );

        return Ok(());
    }

    /// Renders the default configuration as commented TOML, taking each key's
    /// description from its CLI argument.
    pub fn serialize_default(cmd: Command) -> String {
        let entries = ConfigKey::iter()
            .filter(|key| return *key != ConfigKey::ConfigFile)
            .map(|key| {
                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long().unwrap() == key.to_string())
                    .unwrap();

                let mut description = arg
                    .get_help()
                    .unwrap()
                    .to_string()
                    .split("[default:")
                    .next()
                    .unwrap()
                    .trim()
                    .to_string();

                let possible_values = possible_values_for(&cmd, key);
                if !possible_values.is_empty() {
                    description = format!(
                        "{description} [possible values: {}]",
                        possible_values.join(", ")
                    );
                }

                let default = Config::default(key);
                let line = if default.is_empty() {
                    format!("# {key} = \"\"")
                } else if default.parse::<i64>().is_ok() {
                    format!("{key} = {default}")
                } else {
                    format!("{key} = \"{default}\"")
                };

                return format!("# {description}\n{line}");
            })
            .collect::<Vec<String>>();

        return entries.join("\n\n");
    }
}
