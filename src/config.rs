use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The provider's dyndns2 update endpoint. Fixed, but carried inside
/// `Config` so the updater receives it like any other setting.
pub const UPDATE_URL: &str = "https://dyn.dns.he.net/nic/update";

/// Mirrors are tried in order; the first one that yields an address wins.
const DEFAULT_LOOKUP_URLS: [&str; 3] = [
    "https://4.ifcfg.me/ip",
    "https://api.ipify.org",
    "https://ipv4.icanhazip.com",
];

const CACHE_FILE_NAME: &str = "he-ddns-last-ip";

const TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {0} is still set to a placeholder value")]
    Placeholder(&'static str),

    #[error("no usable cache directory; set HE_DDNS_CACHE_FILE, XDG_CACHE_HOME or HOME")]
    NoCacheDir,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub hostname: Box<str>,
    pub key: Box<str>,
    pub lookup_urls: Vec<Box<str>>,
    pub update_url: Box<str>,
    pub cache_file: PathBuf,
    pub timeout: Duration,
    pub user_agent: Box<str>,
}

impl Config {
    /// Reads the whole configuration from the process environment.
    /// `HE_DDNS_HOSTNAME` and `HE_DDNS_KEY` are required; the lookup
    /// mirror list and the cache file path may be overridden with
    /// `HE_DDNS_LOOKUP_URLS` (comma-separated) and `HE_DDNS_CACHE_FILE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let hostname = required_var("HE_DDNS_HOSTNAME")?;
        let key = required_var("HE_DDNS_KEY")?;

        let lookup_urls = match env::var("HE_DDNS_LOOKUP_URLS") {
            Ok(list) => {
                let urls = split_url_list(&list);
                if urls.is_empty() {
                    default_lookup_urls()
                } else {
                    urls
                }
            }
            Err(_) => default_lookup_urls(),
        };

        let cache_file = match env::var_os("HE_DDNS_CACHE_FILE") {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_cache_file().ok_or(ConfigError::NoCacheDir)?,
        };

        Ok(Self {
            hostname,
            key,
            lookup_urls,
            update_url: UPDATE_URL.into(),
            cache_file,
            timeout: Duration::from_secs(TIMEOUT_SECS),
            user_agent: default_user_agent(),
        })
    }
}

fn required_var(name: &'static str) -> Result<Box<str>, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    let value = value.trim();

    if value.is_empty() {
        Err(ConfigError::Missing(name))
    } else if is_placeholder(value) {
        Err(ConfigError::Placeholder(name))
    } else {
        Ok(value.into())
    }
}

/// The setup instructions use `< fqdn to update >`-style sentinels; a value
/// still wrapped in angle brackets was never filled in.
fn is_placeholder(value: &str) -> bool {
    value.starts_with('<')
}

fn split_url_list(list: &str) -> Vec<Box<str>> {
    list.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(Box::from)
        .collect()
}

fn default_lookup_urls() -> Vec<Box<str>> {
    DEFAULT_LOOKUP_URLS.iter().map(|&url| Box::from(url)).collect()
}

fn default_cache_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(CACHE_FILE_NAME))
}

fn cache_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CACHE_HOME") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }

    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".cache"))
}

fn default_user_agent() -> Box<str> {
    concat!("he-ddns/", env!("CARGO_PKG_VERSION")).into()
}
