//! Configuration settings for the marketplace shell.
//!
//! Configuration can be loaded from environment variables or constructed
//! programmatically (tests do the latter).

use anyhow::{Context as _, Error, anyhow};
use std::env;
use std::path::PathBuf;
use url::Url;

/// Runtime configuration for the shell.
#[derive(Clone, Debug)]
pub struct ShellConfig {
    /// Host page loaded once at startup; owns the content region.
    pub host_page: PathBuf,
    /// Base URL every fragment reference is joined onto.
    pub pages_base: Url,
    /// Optional backend API base; pages run on mock data when unset.
    pub api_base: Option<Url>,
    /// Durable session storage file.
    pub storage_path: PathBuf,
    /// Whether to emit navigation counters after each command.
    pub telemetry_enabled: bool,
}

impl ShellConfig {
    /// Construct a configuration with explicit values and telemetry off.
    pub fn new(host_page: PathBuf, pages_base: Url, storage_path: PathBuf) -> Self {
        Self {
            host_page,
            pages_base,
            api_base: None,
            storage_path,
            telemetry_enabled: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following:
    /// - `BAZAAR_HOST_PAGE`: host page path (default: `assets/index.html`)
    /// - `BAZAAR_PAGES_BASE`: fragment base URL (default:
    ///   `file://<cwd>/assets/pages/`)
    /// - `BAZAAR_API_BASE`: backend API base URL (default: unset)
    /// - `BAZAAR_STORAGE`: session storage file (default:
    ///   `.bazaar-session.json`)
    /// - `BAZAAR_TELEMETRY`: set to "1" to emit navigation counters
    ///
    /// # Errors
    ///
    /// Returns an error when a provided URL does not parse or the working
    /// directory is unavailable.
    pub fn from_env() -> Result<Self, Error> {
        let cwd = env::current_dir()?;
        let host_page = env::var("BAZAAR_HOST_PAGE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| cwd.join("assets/index.html"));
        let pages_base = match env::var("BAZAAR_PAGES_BASE") {
            Ok(raw) => {
                Url::parse(&raw).with_context(|| format!("parsing BAZAAR_PAGES_BASE {raw:?}"))?
            }
            Err(_) => Url::from_directory_path(cwd.join("assets/pages"))
                .map_err(|()| anyhow!("cannot express the pages directory as a file url"))?,
        };
        let api_base = match env::var("BAZAAR_API_BASE") {
            Ok(raw) => Some(
                Url::parse(&raw).with_context(|| format!("parsing BAZAAR_API_BASE {raw:?}"))?,
            ),
            Err(_) => None,
        };
        let storage_path = env::var("BAZAAR_STORAGE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| cwd.join(".bazaar-session.json"));
        let telemetry_enabled = env::var("BAZAAR_TELEMETRY").ok().as_deref() == Some("1");
        Ok(Self {
            host_page,
            pages_base,
            api_base,
            storage_path,
            telemetry_enabled,
        })
    }
}
