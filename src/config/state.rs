// Application state module
// Shared, read-only state handed to every connection

use std::path::PathBuf;

use super::types::Config;
use crate::error::ServeError;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical form of `config.server.root`; every served path must stay below it
    pub root: PathBuf,
}

impl AppState {
    /// Build the state, resolving the document root to its canonical path
    pub fn new(config: Config) -> Result<Self, ServeError> {
        let root = config
            .server
            .root
            .canonicalize()
            .map_err(|source| ServeError::Root {
                path: config.server.root.clone(),
                source,
            })?;

        if !root.is_dir() {
            return Err(ServeError::Root {
                path: config.server.root.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            });
        }

        Ok(Self { config, root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("site")).unwrap();

        let mut config = Config::load_from("tests/no-such-config").unwrap();
        config.server.root = dir.path().join("site").join("..").join("site");

        let state = AppState::new(config).unwrap();
        assert_eq!(state.root, dir.path().join("site").canonicalize().unwrap());
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::load_from("tests/no-such-config").unwrap();
        config.server.root = dir.path().join("missing");

        assert!(matches!(
            AppState::new(config),
            Err(ServeError::Root { .. })
        ));
    }

    #[test]
    fn test_file_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "<h1>hi</h1>").unwrap();

        let mut config = Config::load_from("tests/no-such-config").unwrap();
        config.server.root = file;

        assert!(matches!(
            AppState::new(config),
            Err(ServeError::Root { .. })
        ));
    }
}
