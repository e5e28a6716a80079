use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::pipeline::language::RegistryError;
use crate::pipeline::LanguageRegistry;

/// Application-level constants
pub const APP_NAME: &str = "menu-recognizer";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LANGUAGE: &str = "de";
pub const DEFAULT_STORE_KEY: &str = "weekly-menu";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,menu_recognizer_lib=debug"
}

/// Per-user data directory, falling back to the system temp dir
/// on hosts without a home (containers).
pub fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
}

/// Where recognized menus are stored by default.
pub fn menus_dir() -> PathBuf {
    app_data_dir().join("menus")
}

/// Root of the local image source when no base URL is configured.
pub fn images_dir() -> PathBuf {
    app_data_dir().join("images")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Language '{0}' is not in the registry")]
    UnknownLanguage(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Runtime settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub language: String,
    pub store_dir: PathBuf,
    pub store_key: String,
    pub tessdata_dir: Option<PathBuf>,
    pub image_base_url: Option<String>,
    pub image_root: PathBuf,
    pub registry_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            language: DEFAULT_LANGUAGE.to_string(),
            store_dir: menus_dir(),
            store_key: DEFAULT_STORE_KEY.to_string(),
            tessdata_dir: None,
            image_base_url: None,
            image_root: images_dir(),
            registry_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        Ok(Self {
            port,
            language: get("MENU_LANGUAGE").unwrap_or(defaults.language),
            store_dir: get("MENU_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
            store_key: get("MENU_STORE_KEY").unwrap_or(defaults.store_key),
            tessdata_dir: get("MENU_TESSDATA_DIR").map(PathBuf::from),
            image_base_url: get("MENU_IMAGE_BASE_URL"),
            image_root: get("MENU_IMAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.image_root),
            registry_file: get("MENU_REGISTRY_FILE").map(PathBuf::from),
        })
    }

    /// The configured registry file, or the builtin table.
    pub fn load_registry(&self) -> Result<Arc<LanguageRegistry>, ConfigError> {
        let registry = match self.registry_file.as_deref() {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading language registry");
                LanguageRegistry::from_json_file(path)?
            }
            None => LanguageRegistry::global().clone(),
        };
        self.check_language(&registry)?;
        Ok(Arc::new(registry))
    }

    /// Reject a default language the registry cannot serve.
    pub fn check_language(&self, registry: &LanguageRegistry) -> Result<(), ConfigError> {
        registry
            .get(&self.language)
            .map(|_| ())
            .map_err(|_| ConfigError::UnknownLanguage(self.language.clone()))
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn app_data_dir_named_after_app() {
        assert!(app_data_dir().ends_with(APP_NAME));
        assert!(menus_dir().starts_with(app_data_dir()));
        assert!(images_dir().starts_with(app_data_dir()));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn defaults_when_env_empty() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.language, "de");
        assert!(config.image_base_url.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "9090"),
            ("MENU_LANGUAGE", "en"),
            ("MENU_STORE_DIR", "/var/lib/menus"),
            ("MENU_STORE_KEY", "kita@example.org"),
            ("MENU_TESSDATA_DIR", "/usr/share/tessdata"),
            ("MENU_IMAGE_BASE_URL", "https://storage.example.com"),
            ("MENU_IMAGE_ROOT", "/srv/images"),
            ("MENU_REGISTRY_FILE", "/etc/menu/languages.json"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.language, "en");
        assert_eq!(config.store_dir(), Path::new("/var/lib/menus"));
        assert_eq!(config.store_key, "kita@example.org");
        assert_eq!(config.tessdata_dir, Some(PathBuf::from("/usr/share/tessdata")));
        assert_eq!(
            config.image_base_url.as_deref(),
            Some("https://storage.example.com")
        );
        assert_eq!(config.image_root, PathBuf::from("/srv/images"));
        assert_eq!(
            config.registry_file,
            Some(PathBuf::from("/etc/menu/languages.json"))
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("MENU_LANGUAGE", "  "), ("PORT", "")])).unwrap();
        assert_eq!(config.language, "de");
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn rejects_bad_port() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "PORT", .. }));
    }

    #[test]
    fn unknown_default_language_rejected() {
        let config = AppConfig::from_lookup(lookup(&[("MENU_LANGUAGE", "fr")])).unwrap();
        assert!(matches!(
            config.load_registry(),
            Err(ConfigError::UnknownLanguage(ref l)) if l == "fr"
        ));
    }

    #[test]
    fn builtin_registry_when_no_file() {
        let registry = AppConfig::default().load_registry().unwrap();
        assert!(registry.languages().any(|l| l == "de"));
    }

    #[test]
    fn registry_file_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("languages.json");
        std::fs::write(
            &path,
            r#"[{"profile": {"id": "fr", "ocr_pack": "fra", "tokenizer": "en-rules"},
                 "weekdays": ["Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi"]}]"#,
        )
        .unwrap();

        let config = AppConfig {
            language: "fr".into(),
            registry_file: Some(path),
            ..AppConfig::default()
        };
        let registry = config.load_registry().unwrap();
        assert_eq!(registry.languages().collect::<Vec<_>>(), vec!["fr"]);
    }

    #[test]
    fn missing_registry_file_is_error() {
        let config = AppConfig {
            registry_file: Some(PathBuf::from("/nonexistent/languages.json")),
            ..AppConfig::default()
        };
        assert!(matches!(
            config.load_registry(),
            Err(ConfigError::Registry(RegistryError::Io(_)))
        ));
    }
}
