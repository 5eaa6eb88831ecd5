//! Server configuration from a TOML file and command line options

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

/// Default location of the configuration file
const DEFAULT_CONFIG: &str = "hypercar.toml";

/// Configuration of the HTTP server
#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Host for the HTTP server to listen on
    pub host: String,
    /// Port for the HTTP server to listen on
    pub port: u16,
    /// Number of threads answering requests at the counter
    pub counter_threads: u32,
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8000,
            counter_threads: 8,
            log_filter: String::from("info"),
        }
    }
}

impl Config {
    /// Parse a configuration file's contents
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from `path`
    ///
    /// A missing file at the default location yields the default
    /// configuration, a missing file given explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG), false),
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                Self::from_toml(&contents).wrap_err_with(|| format!("invalid config {path:?}"))
            }
            Err(e) if e.kind() == ErrorKind::NotFound && !explicit => Ok(Self::default()),
            Err(e) => Err(e).wrap_err_with(|| format!("could not read config {path:?}")),
        }
    }

    /// Apply command line options, see [`Config::apply_args()`]
    pub fn from_args() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let config_path = args
            .windows(2)
            .find(|pair| pair[0] == "-config")
            .map(|pair| PathBuf::from(&pair[1]));

        let mut config = Self::load(config_path.as_deref())?;
        config.apply_args(args)?;
        Ok(config)
    }

    /// Override values with command line options
    ///
    /// Options take one value each: `-host`, `-port`, `-counter-threads`,
    /// `-log` and `-config` (handled by [`Config::from_args()`]).
    pub fn apply_args<I: IntoIterator<Item = String>>(&mut self, args: I) -> Result<()> {
        let mut option: Option<String> = None;
        for arg in args {
            if let Some(opt) = option.take() {
                match opt.as_str() {
                    "-host" => self.host = arg,
                    "-port" => {
                        self.port = arg
                            .parse()
                            .map_err(|_| eyre!("-port takes a decimal u16"))?
                    }
                    "-counter-threads" => {
                        self.counter_threads = arg
                            .parse()
                            .map_err(|_| eyre!("-counter-threads takes a decimal u32"))?
                    }
                    "-log" => self.log_filter = arg,
                    "-config" => {}
                    _ => return Err(eyre!("unknown option {opt}")),
                }
            } else {
                option = Some(arg);
            }
        }
        if let Some(opt) = option {
            return Err(eyre!("leftover option {opt}"));
        }

        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.counter_threads == 0 {
            return Err(eyre!("counter-threads must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn file_values_and_defaults() {
        let config = Config::from_toml("port = 9000\ncounter-threads = 2\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.counter_threads, 2);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn rejects_bad_files() {
        assert!(Config::from_toml("counter-threads = 0").is_err());
        assert!(Config::from_toml("tickets = 10").is_err());
        assert!(Config::from_toml("port = \"eighty\"").is_err());
    }

    #[test]
    fn args_override_file() {
        let mut config = Config::from_toml("host = \"0.0.0.0\"\nport = 9000").unwrap();
        config
            .apply_args(args("-port 8080 -log debug -config other.toml"))
            .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn rejects_bad_args() {
        let mut config = Config::default();
        assert!(config.apply_args(args("-port high")).is_err());
        assert!(config.apply_args(args("-tickets 3")).is_err());
        assert!(config.apply_args(args("-port")).is_err());
        assert!(config.apply_args(args("-counter-threads 0")).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/hypercar.toml"))).is_err());
    }
}
