use miette::Result;
use miette::miette;
use serde::{Deserialize, Serialize};
use url::Url;

use std::future::Future;
use std::path::Path;
use std::path::PathBuf;

use crate::error::QuireError;

pub const ENDPOINT_VAR: &str = "QUIRE_ENDPOINT";
pub const CSRF_TOKEN_VAR: &str = "QUIRE_CSRF_TOKEN";
pub const SESSION_VAR: &str = "QUIRE_SESSION";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the social-posting server.
    pub endpoint: String,
    /// Token sent as `X-CSRFToken` on every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    /// Value of the `sessionid` cookie for native clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
}

impl Config {
    /// Loads the configuration from the provided loader.
    pub async fn load(loader: &impl Loader) -> Result<Self> {
        loader
            .load()
            .await
            .map_err(|e| miette!("Failed to load configuration: {e}"))
    }
    /// Saves the configuration using the provided saver.
    pub async fn save(&self, saver: &impl Saver) -> Result<()> {
        saver
            .save(self)
            .await
            .map_err(|e| miette!("Failed to save configuration: {e}"))
    }

    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `QUIRE_*` overrides from `lookup`. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(endpoint) = get(ENDPOINT_VAR) {
            self.endpoint = endpoint;
        }
        if let Some(token) = get(CSRF_TOKEN_VAR) {
            self.csrf_token = Some(token);
        }
        if let Some(session) = get(SESSION_VAR) {
            self.session_cookie = Some(session);
        }
        self
    }

    /// The endpoint as a base URL. The path always ends in `/` so API paths
    /// resolve under any prefix, e.g. `https://host/social`.
    pub fn endpoint_url(&self) -> core::result::Result<Url, QuireError> {
        let url = Url::parse(&self.endpoint)?;
        if url.cannot_be_a_base() {
            return Err(QuireError::Config(format!(
                "endpoint {} cannot be used as a base URL",
                self.endpoint
            )));
        }
        Ok(with_trailing_slash(url))
    }
}

pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl Default for Config {
    /// Creates a new default configuration.
    ///
    /// The default configuration points at a local development server.
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_owned(),
            csrf_token: None,
            session_cookie: None,
        }
    }
}

/// The trait for loading configuration data.
pub trait Loader {
    /// Loads the configuration data.
    fn load(
        &self,
    ) -> impl Future<
        Output = core::result::Result<Config, Box<dyn std::error::Error + Send + Sync + 'static>>,
    > + Send;
}

/// The trait for saving configuration data.
pub trait Saver {
    /// Saves the configuration data.
    fn save(
        &self,
        config: &Config,
    ) -> impl Future<
        Output = core::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>,
    > + Send;
}

/// An implementation of [`Loader`] and [`Saver`] that reads and writes a configuration file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a new [`FileStore`] with the given path.
    ///
    /// [`Config`] data will be serialized and deserialized using the file extension.
    /// `.json` and `.toml` are supported.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Loader for FileStore {
    async fn load(
        &self,
    ) -> core::result::Result<Config, Box<dyn std::error::Error + Send + Sync + 'static>> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&std::fs::read_to_string(&self.path)?)?),
            Some("toml") => Ok(toml::from_str(&std::fs::read_to_string(&self.path)?)?),
            _ => Err(miette!("Unsupported file format").into()),
        }
    }
}

impl Saver for FileStore {
    async fn save(
        &self,
        config: &Config,
    ) -> core::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(std::fs::write(
                &self.path,
                serde_json::to_string_pretty(config)?,
            )?),
            Some("toml") => Ok(std::fs::write(&self.path, toml::to_string_pretty(config)?)?),
            _ => Err(miette!("Unsupported file format").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("quire-config-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(|key| match key {
            ENDPOINT_VAR => Some("https://social.example".to_string()),
            CSRF_TOKEN_VAR => Some(String::new()),
            SESSION_VAR => Some("abc".to_string()),
            _ => None,
        });
        assert_eq!(config.endpoint, "https://social.example");
        assert_eq!(config.csrf_token, None);
        assert_eq!(config.session_cookie.as_deref(), Some("abc"));
    }

    #[test]
    fn test_endpoint_url() {
        assert!(Config::default().endpoint_url().is_ok());
        let prefixed = Config {
            endpoint: "https://host.example/social".to_string(),
            ..Config::default()
        };
        assert_eq!(
            prefixed.endpoint_url().unwrap().as_str(),
            "https://host.example/social/"
        );
        let bad = Config {
            endpoint: "mailto:someone@example.com".to_string(),
            ..Config::default()
        };
        assert!(matches!(bad.endpoint_url(), Err(QuireError::Config(_))));
        let garbage = Config {
            endpoint: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(garbage.endpoint_url(), Err(QuireError::Url(_))));
    }

    #[tokio::test]
    async fn test_file_store_roundtrip_toml_and_json() {
        let config = Config {
            endpoint: "https://social.example".to_string(),
            csrf_token: Some("tok".to_string()),
            session_cookie: None,
        };
        for ext in ["toml", "json"] {
            let path = scratch_path(&format!("roundtrip.{ext}"));
            let store = FileStore::new(&path);
            config.save(&store).await.unwrap();
            let loaded = Config::load(&store).await.unwrap();
            assert_eq!(loaded, config);
            let _ = std::fs::remove_file(&path);
        }
    }

    #[tokio::test]
    async fn test_file_store_rejects_unknown_extension() {
        let store = FileStore::new(scratch_path("config.yaml"));
        assert!(Config::load(&store).await.is_err());
        assert!(Config::default().save(&store).await.is_err());
    }
}
