//! Run configuration and credentials.
//!
//! Everything is read through a lookup function so callers decide where values
//! come from (process env in `main`, a map in tests).

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_DRY_RUN: &str = "DRY_RUN";
pub const ENV_CONFIRM_DELETE: &str = "CONFIRM_DELETE";
pub const ENV_COOLDOWN_SECS: &str = "DELETE_COOLDOWN_SECS";
pub const ENV_PAGE_SIZE: &str = "ZCON_PAGE_SIZE";
pub const ENV_OUTPUT_DIR: &str = "JSON_OUTPUT_DIR";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "ZCON_HTTP_TIMEOUT_SECS";
pub const ENV_CONFIRM_TIMEOUT_SECS: &str = "CONFIRM_TIMEOUT_SECS";
pub const ENV_ACCESS_FILE: &str = "ZCON_ACCESS_FILE";
pub const ENV_BASE_URL: &str = "ZCON_BASE_URL";

pub const DEFAULT_ACCESS_FILE: &str = "assets/.zcon_access";
pub const DEFAULT_OUTPUT_DIR: &str = "zscc-json-output";
pub const DEFAULT_COOLDOWN_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Settings for one cleanup run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Log would-be deletes instead of calling the API.
    pub dry_run: bool,
    /// Ask the operator before each real delete.
    pub confirm_deletes: bool,
    /// Pause after each real delete.
    pub cooldown: Duration,
    pub page_size: u32,
    /// Where the raw JSON payload is written when needed.
    pub output_dir: PathBuf,
    pub http_timeout: Option<Duration>,
    pub prompt_timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            dry_run: true,
            confirm_deletes: true,
            cooldown: Duration::from_secs(DEFAULT_COOLDOWN_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            http_timeout: None,
            prompt_timeout: None,
        }
    }
}

impl RunConfig {
    /// Build from the process environment, output dir relative to `cwd`.
    pub fn from_env() -> Result<RunConfig> {
        let cwd = std::env::current_dir().map_err(|e| Error::Io {
            path: PathBuf::from("."),
            source: e,
        })?;
        Self::from_lookup(&cwd, |k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(cwd: &Path, lookup: F) -> Result<RunConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RunConfig::default();
        let dry_run = match lookup(ENV_DRY_RUN) {
            Some(v) => parse_bool(ENV_DRY_RUN, &v)?,
            None => defaults.dry_run,
        };
        let confirm_deletes = match lookup(ENV_CONFIRM_DELETE) {
            Some(v) => parse_bool(ENV_CONFIRM_DELETE, &v)?,
            None => defaults.confirm_deletes,
        };
        let cooldown = parse_secs(ENV_COOLDOWN_SECS, lookup(ENV_COOLDOWN_SECS))?
            .unwrap_or(defaults.cooldown);
        let page_size = match lookup(ENV_PAGE_SIZE) {
            Some(v) => match v.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::Config(format!(
                        "Value passed to {ENV_PAGE_SIZE} is not a positive integer: {v}"
                    )))
                }
            },
            None => defaults.page_size,
        };
        let output_dir =
            cwd.join(lookup(ENV_OUTPUT_DIR).unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()));

        Ok(RunConfig {
            dry_run,
            confirm_deletes,
            cooldown,
            page_size,
            output_dir,
            http_timeout: parse_secs(ENV_HTTP_TIMEOUT_SECS, lookup(ENV_HTTP_TIMEOUT_SECS))?,
            prompt_timeout: parse_secs(
                ENV_CONFIRM_TIMEOUT_SECS,
                lookup(ENV_CONFIRM_TIMEOUT_SECS),
            )?,
        })
    }
}

/// Parse a boolean flag: `1 t T TRUE true True` or `0 f F FALSE false False`.
pub fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(Error::Config(format!(
            "Value passed to {name} was unable to be parsed as bool: {value}"
        ))),
    }
}

fn parse_secs(name: &str, value: Option<String>) -> Result<Option<Duration>> {
    match value {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map(|s| Some(Duration::from_secs(s)))
            .map_err(|_| {
                Error::Config(format!(
                    "Value passed to {name} is not a number of seconds: {v}"
                ))
            }),
    }
}

/// ZCON API credentials.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub api_key: String,
    /// Cloud name, e.g. `zscalerthree`.
    pub cloud: String,
    /// Explicit API base URL, overrides the one derived from `cloud`.
    pub base_url: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("api_key", &"***")
            .field("cloud", &self.cloud)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Credentials> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(Error::Config(format!("missing credential {key}"))),
            }
        };
        Ok(Credentials {
            username: required("ZCON_USERNAME")?,
            password: required("ZCON_PASSWORD")?,
            api_key: required("ZCON_API_KEY")?,
            cloud: required("ZCON_CLOUD")?,
            base_url: lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()),
        })
    }

    /// API root for this cloud.
    pub fn api_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://connector.{}.net/api/v1", self.cloud),
        }
    }
}

/// Read the bundled access file (a flat JSON object of strings).
pub fn read_access_file(path: &Path) -> Result<HashMap<String, String>> {
    let json = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&json)
        .map_err(|e| Error::Config(format!("Error parsing access file {}: {e}", path.display())))
}

/// Inject the access file into the process env. A missing file is not an error,
/// credentials may already come from the env or `.env`. Variables that are
/// already set keep their value, returns how many were added.
pub fn load_access_file(path: Option<&Path>) -> Result<usize> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::var(ENV_ACCESS_FILE)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ACCESS_FILE)),
    };
    if !path.exists() {
        log::debug!("No access file at {}", path.display());
        return Ok(0);
    }
    let pairs = read_access_file(&path)?;
    let mut added = 0;
    for (k, v) in pairs.iter() {
        if std::env::var_os(k).is_some() {
            log::debug!("{k} already set, access file value ignored");
            continue;
        }
        std::env::set_var(k, v);
        added += 1;
    }
    log::info!(
        "Loaded {added} of {} values from access file {}",
        pairs.len(),
        path.display()
    );
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = RunConfig::from_lookup(Path::new("/work"), lookup_from(&[])).unwrap();
        assert!(cfg.dry_run, "dry run must default to enabled");
        assert!(cfg.confirm_deletes);
        assert_eq!(cfg.cooldown, Duration::from_secs(30));
        assert_eq!(cfg.page_size, 1000);
        assert_eq!(cfg.output_dir, PathBuf::from("/work/zscc-json-output"));
        assert_eq!(cfg.http_timeout, None);
        assert_eq!(cfg.prompt_timeout, None);
    }

    #[test]
    fn test_dry_run_false() {
        let cfg =
            RunConfig::from_lookup(Path::new("/"), lookup_from(&[("DRY_RUN", "False")])).unwrap();
        assert!(!cfg.dry_run);
    }

    #[test]
    fn test_invalid_dry_run_is_fatal() {
        let lookup = lookup_from(&[("DRY_RUN", "yes")]);
        let err = RunConfig::from_lookup(Path::new("/"), lookup).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("DRY_RUN"));
    }

    #[test]
    fn test_parse_bool_spellings() {
        for v in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_bool("X", v).unwrap(), "{v}");
        }
        for v in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_bool("X", v).unwrap(), "{v}");
        }
        assert!(parse_bool("X", "").is_err());
        assert!(parse_bool("X", "tRuE").is_err());
    }

    #[test]
    fn test_timeouts_and_cooldown() {
        let cfg = RunConfig::from_lookup(
            Path::new("/"),
            lookup_from(&[
                ("DELETE_COOLDOWN_SECS", "5"),
                ("ZCON_HTTP_TIMEOUT_SECS", "20"),
                ("CONFIRM_TIMEOUT_SECS", "60"),
                ("ZCON_PAGE_SIZE", "50"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.cooldown, Duration::from_secs(5));
        assert_eq!(cfg.http_timeout, Some(Duration::from_secs(20)));
        assert_eq!(cfg.prompt_timeout, Some(Duration::from_secs(60)));
        assert_eq!(cfg.page_size, 50);
    }

    #[test]
    fn test_bad_page_size() {
        let zero_page = lookup_from(&[("ZCON_PAGE_SIZE", "0")]);
        assert!(RunConfig::from_lookup(Path::new("/"), zero_page).is_err());
        let bad_cooldown = lookup_from(&[("DELETE_COOLDOWN_SECS", "abc")]);
        assert!(RunConfig::from_lookup(Path::new("/"), bad_cooldown).is_err());
    }

    #[test]
    fn test_credentials_missing_field() {
        let err = Credentials::from_lookup(lookup_from(&[
            ("ZCON_USERNAME", "admin@example.com"),
            ("ZCON_PASSWORD", "secret"),
            ("ZCON_CLOUD", "zscalerthree"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ZCON_API_KEY"), "{err}");
    }

    #[test]
    fn test_credentials_base_url() {
        let creds = Credentials::from_lookup(lookup_from(&[
            ("ZCON_USERNAME", "admin@example.com"),
            ("ZCON_PASSWORD", "secret"),
            ("ZCON_API_KEY", "abcdefghijkl"),
            ("ZCON_CLOUD", "zscalerthree"),
        ]))
        .unwrap();
        assert_eq!(creds.api_base_url(), "https://connector.zscalerthree.net/api/v1");
        assert!(!format!("{creds:?}").contains("secret"));

        let creds = Credentials {
            base_url: Some("http://127.0.0.1:8080/api/v1/".to_string()),
            ..creds
        };
        assert_eq!(creds.api_base_url(), "http://127.0.0.1:8080/api/v1");
    }

    #[test]
    fn test_read_access_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".zcon_access");
        std::fs::write(&path, r#"{"ZCON_USERNAME":"a","ZCON_CLOUD":"zscaler"}"#).unwrap();
        let pairs = read_access_file(&path).unwrap();
        assert_eq!(pairs.get("ZCON_CLOUD").map(String::as_str), Some("zscaler"));
    }

    #[test]
    fn test_missing_access_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let n = load_access_file(Some(dir.path().join("nope").as_path())).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn test_access_file_does_not_override_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".zcon_access");
        std::fs::write(
            &path,
            r#"{"ZSCC_TEST_ACCESS_PRESET":"from-file","ZSCC_TEST_ACCESS_NEW":"from-file"}"#,
        )
        .unwrap();
        std::env::set_var("ZSCC_TEST_ACCESS_PRESET", "from-shell");
        std::env::remove_var("ZSCC_TEST_ACCESS_NEW");

        let added = load_access_file(Some(path.as_path())).unwrap();

        assert_eq!(added, 1);
        assert_eq!(std::env::var("ZSCC_TEST_ACCESS_PRESET").unwrap(), "from-shell");
        assert_eq!(std::env::var("ZSCC_TEST_ACCESS_NEW").unwrap(), "from-file");
    }
}
