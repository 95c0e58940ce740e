use std::path::PathBuf;

use miette::{Context, IntoDiagnostic};

/// Settings shared by every fetch of a single invocation. Built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute path of the directory archives are unpacked into.
    pub base_directory: PathBuf,

    /// Whether progress is logged to stderr.
    pub verbose: bool,
}

impl Config {
    /// Creates the configuration. A relative `directory` is resolved against the current
    /// directory, without one the current directory itself is used.
    pub fn new(directory: Option<PathBuf>, verbose: bool) -> miette::Result<Self> {
        let current_dir = std::env::current_dir()
            .into_diagnostic()
            .context("failed to determine the current directory")?;
        let base_directory = match directory {
            Some(directory) => current_dir.join(directory),
            None => current_dir,
        };

        Ok(Self {
            base_directory,
            verbose,
        })
    }
}

#[cfg(test)]
mod test {
    use super::Config;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_to_current_directory() {
        let config = Config::new(None, false).unwrap();
        assert_eq!(config.base_directory, std::env::current_dir().unwrap());
        assert!(!config.verbose);
    }

    #[test]
    fn test_relative_directory_is_made_absolute() {
        let config = Config::new(Some(PathBuf::from("out")), true).unwrap();
        assert!(config.base_directory.is_absolute());
        assert_eq!(
            config.base_directory,
            std::env::current_dir().unwrap().join("out")
        );
    }

    #[test]
    fn test_absolute_directory_is_kept() {
        let directory = std::env::temp_dir();
        let config = Config::new(Some(directory.clone()), false).unwrap();
        assert_eq!(config.base_directory, directory);
    }
}
