use crate::error::{Result, ScancatError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default archiver executable, looked up on `PATH`
pub const DEFAULT_COMPRESSOR: &str = "7z";

/// Default 7-Zip compression level
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 7;

/// Highest compression level accepted by 7-Zip
pub const MAX_COMPRESSION_LEVEL: u8 = 9;

/// Resolved configuration of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory holding one subdirectory per study
    pub source_root: PathBuf,
    /// Directory receiving record files and archives
    pub dest_root: PathBuf,
    /// Whether to build a `.7z` archive per study
    pub create_archives: bool,
    /// Archiver executable
    pub compressor_path: PathBuf,
    /// Compression level passed as `-mx=<level>`
    pub compression_level: u8,
    /// Worker threads; 0 lets rayon decide
    pub jobs: usize,
}

/// One layer of configuration, from a TOML file or the command line
///
/// Unset fields fall through to the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub source_root: Option<PathBuf>,
    pub dest_root: Option<PathBuf>,
    pub create_archives: Option<bool>,
    pub compressor_path: Option<PathBuf>,
    pub compression_level: Option<u8>,
    pub jobs: Option<usize>,
}

impl ConfigLayer {
    /// Parses a layer from TOML text
    ///
    /// # Example
    ///
    /// ```
    /// use scancat_core::config::ConfigLayer;
    ///
    /// let layer = ConfigLayer::parse(r#"
    ///     source_root = "/data/raw"
    ///     create_archives = true
    ///     compression_level = 9
    /// "#).unwrap();
    ///
    /// assert_eq!(layer.create_archives, Some(true));
    /// assert_eq!(layer.compression_level, Some(9));
    /// assert!(layer.dest_root.is_none());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a layer from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScancatError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Overlays `higher` on top of this layer
    pub fn merge(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            source_root: higher.source_root.or(self.source_root),
            dest_root: higher.dest_root.or(self.dest_root),
            create_archives: higher.create_archives.or(self.create_archives),
            compressor_path: higher.compressor_path.or(self.compressor_path),
            compression_level: higher.compression_level.or(self.compression_level),
            jobs: higher.jobs.or(self.jobs),
        }
    }

    /// Fills defaults and checks the result
    ///
    /// # Errors
    ///
    /// Returns [`ScancatError::Config`] if a root directory is missing or the
    /// compression level is out of range
    pub fn resolve(self) -> Result<RunConfig> {
        let source_root = self
            .source_root
            .ok_or_else(|| ScancatError::Config("source root is not set".to_string()))?;
        let dest_root = self
            .dest_root
            .ok_or_else(|| ScancatError::Config("destination root is not set".to_string()))?;

        let config = RunConfig {
            source_root,
            dest_root,
            create_archives: self.create_archives.unwrap_or(false),
            compressor_path: self
                .compressor_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPRESSOR)),
            compression_level: self.compression_level.unwrap_or(DEFAULT_COMPRESSION_LEVEL),
            jobs: self.jobs.unwrap_or(0),
        };
        config.validate()?;
        Ok(config)
    }
}

impl RunConfig {
    /// Checks values that do not depend on the filesystem
    pub fn validate(&self) -> Result<()> {
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(ScancatError::Config(format!(
                "compression level {} is out of range 0..={}",
                self.compression_level, MAX_COMPRESSION_LEVEL
            )));
        }
        Ok(())
    }

    /// Checks the source root and creates the destination root if needed
    pub fn prepare_directories(&self) -> Result<()> {
        if !self.source_root.is_dir() {
            return Err(ScancatError::Config(format!(
                "{} is not a directory",
                self.source_root.display()
            )));
        }
        std::fs::create_dir_all(&self.dest_root)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn roots() -> ConfigLayer {
        ConfigLayer {
            source_root: Some(PathBuf::from("/src")),
            dest_root: Some(PathBuf::from("/dest")),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = roots().resolve().unwrap();
        assert!(!config.create_archives);
        assert_eq!(config.compressor_path, PathBuf::from("7z"));
        assert_eq!(config.compression_level, 7);
        assert_eq!(config.jobs, 0);
    }

    #[test]
    fn test_higher_layer_wins() {
        let file = ConfigLayer::parse(
            r#"
            source_root = "/file/src"
            dest_root = "/file/dest"
            compression_level = 3
            create_archives = true
            "#,
        )
        .unwrap();
        let cli = ConfigLayer {
            source_root: Some(PathBuf::from("/cli/src")),
            compression_level: Some(9),
            ..Default::default()
        };

        let config = file.merge(cli).resolve().unwrap();
        assert_eq!(config.source_root, PathBuf::from("/cli/src"));
        assert_eq!(config.dest_root, PathBuf::from("/file/dest"));
        assert_eq!(config.compression_level, 9);
        assert!(config.create_archives);
    }

    #[test]
    fn test_missing_roots_rejected() {
        let result = ConfigLayer::default().resolve();
        assert!(matches!(result, Err(ScancatError::Config(_))));
    }

    #[test]
    fn test_level_out_of_range() {
        let layer = ConfigLayer {
            compression_level: Some(12),
            ..roots()
        };
        assert!(matches!(layer.resolve(), Err(ScancatError::Config(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ConfigLayer::parse("compresion_level = 3").is_err());
    }

    #[test]
    fn test_prepare_directories() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig {
            source_root: temp_dir.path().to_path_buf(),
            dest_root: temp_dir.path().join("out/nested"),
            create_archives: false,
            compressor_path: PathBuf::from("7z"),
            compression_level: 7,
            jobs: 0,
        };
        config.prepare_directories().unwrap();
        assert!(config.dest_root.is_dir());

        let missing = RunConfig {
            source_root: temp_dir.path().join("absent"),
            ..config
        };
        assert!(missing.prepare_directories().is_err());
    }
}
