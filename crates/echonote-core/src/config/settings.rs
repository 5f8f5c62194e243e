use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::model::OutputClass;

const DEFAULT_ROOT: &str = "Life_OS";

/// Directory layout for reports, recordings and the journal store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoConfig {
    pub root: PathBuf,
    pub inbox_dir: PathBuf,
    pub chronicle_dir: PathBuf,
    pub decisions_dir: PathBuf,
    pub recordings_dir: PathBuf,
    pub brain_dir: PathBuf,
}

impl EchoConfig {
    /// Standard layout beneath `root`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            inbox_dir: root.join("00_Inbox"),
            chronicle_dir: root.join("01_Chronicle"),
            decisions_dir: root.join("02_Decisions"),
            recordings_dir: root.join("03_Recordings"),
            brain_dir: root.join("04_Brain"),
            root,
        }
    }

    /// Read config from the process environment.
    ///
    /// `ECHONOTE_HOME` selects the root; `ECHONOTE_INBOX_DIR`, `ECHONOTE_CHRONICLE_DIR`,
    /// `ECHONOTE_DECISIONS_DIR`, `ECHONOTE_RECORDINGS_DIR` and `ECHONOTE_BRAIN_DIR`
    /// override individual directories.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Like [`EchoConfig::load`], reading variables through `lookup`.
    pub fn load_with<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let root = match lookup("ECHONOTE_HOME") {
            Some(home) if home.trim().is_empty() => {
                return Err(CoreError::Config("ECHONOTE_HOME is set but empty".into()));
            }
            Some(home) => PathBuf::from(home),
            None => PathBuf::from(DEFAULT_ROOT),
        };

        let mut config = Self::from_root(root);
        let overrides: [(&str, &mut PathBuf); 5] = [
            ("ECHONOTE_INBOX_DIR", &mut config.inbox_dir),
            ("ECHONOTE_CHRONICLE_DIR", &mut config.chronicle_dir),
            ("ECHONOTE_DECISIONS_DIR", &mut config.decisions_dir),
            ("ECHONOTE_RECORDINGS_DIR", &mut config.recordings_dir),
            ("ECHONOTE_BRAIN_DIR", &mut config.brain_dir),
        ];
        for (key, slot) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *slot = PathBuf::from(value);
            }
        }
        Ok(config)
    }

    /// Directory that reports of the given class are written to.
    pub fn output_dir(&self, class: OutputClass) -> &Path {
        match class {
            OutputClass::Inbox => &self.inbox_dir,
            OutputClass::Chronicle => &self.chronicle_dir,
            OutputClass::DecisionArchive => &self.decisions_dir,
        }
    }

    /// Create every configured directory that does not exist yet.
    pub fn ensure_dirs(&self) -> Result<(), CoreError> {
        for dir in [
            &self.inbox_dir,
            &self.chronicle_dir,
            &self.decisions_dir,
            &self.recordings_dir,
            &self.brain_dir,
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_layout() {
        let config = EchoConfig::load_with(|_| None).unwrap();
        assert_eq!(config.root, PathBuf::from("Life_OS"));
        assert_eq!(config.brain_dir, PathBuf::from("Life_OS/04_Brain"));
        assert_eq!(
            config.output_dir(OutputClass::Chronicle),
            Path::new("Life_OS/01_Chronicle")
        );
    }

    #[test]
    fn test_overrides() {
        let vars = env(&[
            ("ECHONOTE_HOME", "/data/journal"),
            ("ECHONOTE_DECISIONS_DIR", "/elsewhere/decisions"),
            ("ECHONOTE_INBOX_DIR", "  "),
        ]);
        let config = EchoConfig::load_with(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.inbox_dir, PathBuf::from("/data/journal/00_Inbox"));
        assert_eq!(
            config.output_dir(OutputClass::DecisionArchive),
            Path::new("/elsewhere/decisions")
        );
    }

    #[test]
    fn test_empty_home_rejected() {
        let vars = env(&[("ECHONOTE_HOME", "")]);
        assert!(EchoConfig::load_with(|k| vars.get(k).cloned()).is_err());
    }

    #[test]
    fn test_ensure_dirs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = EchoConfig::from_root(tmp.path().join("home"));
        config.ensure_dirs().unwrap();
        assert!(config.inbox_dir.is_dir());
        assert!(config.brain_dir.is_dir());
        assert!(config.recordings_dir.is_dir());
    }
}
