use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base directory override from `MOVIEDEX_HOME`, if set
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var_os("MOVIEDEX_HOME").map(PathBuf::from)
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("moviedex");
        let data_dir = dirs::data_dir()
            .map(|d| d.join("moviedex"))
            .unwrap_or_else(|| config_dir.join("data"));

        Ok(Self {
            log_dir: data_dir.join("logs"),
            config_dir,
            data_dir,
        })
    }

    /// Everything under a single directory: config files at the top, data and logs in subdirs
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Root of the namespaced preference store
    pub fn preferences_dir(&self) -> PathBuf {
        self.data_dir.join("preferences")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("moviedex.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.preferences_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = base_path_override() {
            return Self::from_base(base);
        }

        // Platform-specific paths (e.g., ~/.config/moviedex on Linux), falling back to the cwd
        Self::new().unwrap_or_else(|_| Self::from_base(".moviedex"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base_layout() {
        let paths = PathManager::from_base("/tmp/moviedex-test");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/moviedex-test/config.toml"));
        assert_eq!(paths.preferences_dir(), PathBuf::from("/tmp/moviedex-test/data/preferences"));
        assert_eq!(paths.log_file(), PathBuf::from("/tmp/moviedex-test/logs/moviedex.log"));
    }

    #[test]
    fn test_ensure_directories_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::from_base(dir.path().join("home"));
        paths.ensure_directories().unwrap();
        assert!(paths.preferences_dir().is_dir());
        assert!(paths.log_dir().is_dir());
    }
}
