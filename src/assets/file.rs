//! File-backed asset manager.
//!
//! Definitions are JSON or RON files under a root directory. Relative paths
//! passed to [`AssetManager::load_asset_definition`] resolve against that
//! root; absolute paths are used as-is.

use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use super::{
    parse_definition, AssetDefinition, AssetError, AssetInstance, AssetManager, AssetRegistry,
    InstanceOverrides, SharedAssetInstance,
};
use crate::config::AssetConfig;
use crate::logging::TimingSpan;

#[derive(Debug)]
pub struct FileAssetManager {
    root: PathBuf,
    extensions: Vec<String>,
    registry: AssetRegistry,
}

impl FileAssetManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(&AssetConfig {
            root: root.into(),
            ..AssetConfig::default()
        })
    }

    pub fn from_config(config: &AssetConfig) -> Self {
        Self {
            root: config.root.clone(),
            extensions: config
                .definition_extensions
                .iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
            registry: AssetRegistry::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn is_definition_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    /// Load every definition file under the root, recursively.
    ///
    /// Files that fail to read or parse are logged and skipped. Returns the
    /// number of definitions loaded.
    pub fn load_all(&mut self) -> Result<usize, AssetError> {
        if !self.root.is_dir() {
            return Err(AssetError::SourceNotFound(self.root.clone()));
        }
        let _span = TimingSpan::new("load_all_asset_definitions");

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_file() && self.is_definition_file(entry.path()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Skipping unreadable asset directory entry"),
            }
        }

        let mut loaded = 0;
        for path in files {
            match self.load_asset_definition(&path) {
                Ok(_) => loaded += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping asset definition"),
            }
        }

        info!(root = %self.root.display(), loaded, "Asset definitions loaded");
        Ok(loaded)
    }
}

impl AssetManager for FileAssetManager {
    fn load_asset_definition(&mut self, path: &Path) -> Result<AssetDefinition, AssetError> {
        let resolved = self.resolve(path);
        if !resolved.is_file() {
            return Err(AssetError::SourceNotFound(resolved));
        }
        let contents = std::fs::read_to_string(&resolved).map_err(|source| AssetError::Io {
            path: resolved.clone(),
            source,
        })?;
        let definition = parse_definition(&resolved, &contents)?;
        self.registry.register_definition(definition.clone())?;
        Ok(definition)
    }

    fn create_asset_instance(
        &mut self,
        definition_id: &str,
        overrides: InstanceOverrides,
    ) -> Result<SharedAssetInstance, AssetError> {
        self.registry.create_instance(definition_id, overrides)
    }

    fn get_asset_definition(&self, definition_id: &str) -> Option<&AssetDefinition> {
        self.registry.definition(definition_id)
    }

    fn get_asset_instance(&self, instance_id: &str) -> Option<SharedAssetInstance> {
        self.registry.instance(instance_id)
    }

    fn update_asset_instance(&mut self, instance: AssetInstance) -> bool {
        self.registry.update_instance(instance)
    }

    fn remove_asset_instance(&mut self, instance_id: &str) -> bool {
        self.registry.remove_instance(instance_id)
    }

    fn register_asset_definition(&mut self, definition: AssetDefinition) -> Result<(), AssetError> {
        self.registry.register_definition(definition)
    }

    fn definition_count(&self) -> usize {
        self.registry.definition_count()
    }

    fn instance_count(&self) -> usize {
        self.registry.instance_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let manager = FileAssetManager::new("/data/assets");
        assert_eq!(
            manager.resolve(Path::new("tiles/wall.json")),
            PathBuf::from("/data/assets/tiles/wall.json")
        );
        assert_eq!(
            manager.resolve(Path::new("/other/wall.json")),
            PathBuf::from("/other/wall.json")
        );
    }

    #[test]
    fn test_definition_file_filter() {
        let manager = FileAssetManager::new("assets");
        assert!(manager.is_definition_file(Path::new("a/wall.json")));
        assert!(manager.is_definition_file(Path::new("a/wall.RON")));
        assert!(!manager.is_definition_file(Path::new("a/wall.png")));
        assert!(!manager.is_definition_file(Path::new("a/README")));
    }

    #[test]
    fn test_load_all_missing_root() {
        let mut manager = FileAssetManager::new("/definitely/not/here");
        assert!(matches!(
            manager.load_all(),
            Err(AssetError::SourceNotFound(_))
        ));
    }
}
