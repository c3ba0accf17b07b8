use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::announcer::Cue;
use crate::error::{Result, TomatempoError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub sound_enabled: bool,
    pub desktop_notifications: bool,
    pub cues: Vec<Cue>,
    pub show_welcome: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            desktop_notifications: false,
            cues: Cue::ALL.to_vec(),
            show_welcome: true,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "tomatempo") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("tomatempo_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(source) => {
                let err = TomatempoError::ConfigMalformed {
                    path: self.path.clone(),
                    source,
                };
                tracing::warn!(%err, "ignoring config file");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        let write_failed = |source: std::io::Error| TomatempoError::ConfigWriteFailed {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data).map_err(write_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            sound_enabled: false,
            desktop_notifications: true,
            cues: vec![Cue::End, Cue::Tomato],
            show_welcome: false,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "sound_enabled": false }"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert!(!cfg.sound_enabled);
        assert_eq!(cfg.cues, Cue::ALL.to_vec());
        assert!(cfg.show_welcome);
    }

    #[test]
    fn unwritable_path_reports_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"").unwrap();
        let store = FileConfigStore::with_path(blocker.join("config.json"));
        let err = store.save(&Config::default()).unwrap_err();
        assert!(matches!(err, TomatempoError::ConfigWriteFailed { .. }));
    }
}
