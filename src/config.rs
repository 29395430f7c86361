//! Configuration file support.
//!
//! Loads optional `.tangram/config.toml` from the project root.

use serde::Deserialize;
use std::path::Path;

/// Directories skipped by the scanner when no override is given.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    ".next",
    "out",
    "coverage",
    "target",
    ".tangram",
];

/// Source extensions considered by the scanner.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct TangramConfig {
    pub scan: ScanConfig,
    pub graph: GraphConfig,
}

/// Scanner-specific configuration
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extra directory names to ignore on top of the built-in list.
    pub ignore_dirs: Vec<String>,
    /// Alias prefixes resolved against the project source root.
    /// Example: `["@/"]` maps `@/lib/x` to `src/lib/x`.
    pub alias_prefixes: Vec<String>,
    /// Directory the alias prefixes point at (default `src`).
    pub alias_root: Option<String>,
}

/// Graph-analysis configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Weighted in+out degree above which a node is flagged as a god object.
    pub god_object_threshold: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            god_object_threshold: 15,
        }
    }
}

impl TangramConfig {
    /// Load config from `.tangram/config.toml` in the given root directory.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(".tangram").join("config.toml");
        Self::load_from_path(&config_path)
    }

    /// Load config from a specific path.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Built-in plus configured ignore directory names.
    pub fn ignore_dirs(&self) -> Vec<String> {
        let mut dirs: Vec<String> = DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect();
        for extra in &self.scan.ignore_dirs {
            if !dirs.contains(extra) {
                dirs.push(extra.clone());
            }
        }
        dirs
    }

    /// Alias prefixes, defaulting to the `@/` convention.
    pub fn alias_prefixes(&self) -> Vec<String> {
        if self.scan.alias_prefixes.is_empty() {
            vec!["@/".to_string()]
        } else {
            self.scan.alias_prefixes.clone()
        }
    }

    pub fn alias_root(&self) -> &str {
        self.scan.alias_root.as_deref().unwrap_or("src")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_builtin_ignores() {
        let config = TangramConfig::default();
        let dirs = config.ignore_dirs();
        assert!(dirs.contains(&"node_modules".to_string()));
        assert!(dirs.contains(&".git".to_string()));
        assert_eq!(config.graph.god_object_threshold, 15);
        assert_eq!(config.alias_prefixes(), vec!["@/".to_string()]);
        assert_eq!(config.alias_root(), "src");
    }

    #[test]
    fn load_missing_file_falls_back_to_default() {
        let temp = TempDir::new().expect("temp dir");
        let config = TangramConfig::load(temp.path());
        assert!(config.scan.ignore_dirs.is_empty());
    }

    #[test]
    fn load_valid_config() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(".tangram");
        std::fs::create_dir_all(&dir).expect("create .tangram");

        let config_path = dir.join("config.toml");
        let mut file = std::fs::File::create(&config_path).expect("create config");
        writeln!(
            file,
            r#"
[scan]
ignore_dirs = ["vendor", "storybook-static"]
alias_prefixes = ["~/"]
alias_root = "app"

[graph]
god_object_threshold = 20
"#
        )
        .expect("write config");

        let config = TangramConfig::load(temp.path());
        assert!(config.ignore_dirs().contains(&"vendor".to_string()));
        assert!(config.ignore_dirs().contains(&"node_modules".to_string()));
        assert_eq!(config.alias_prefixes(), vec!["~/".to_string()]);
        assert_eq!(config.alias_root(), "app");
        assert_eq!(config.graph.god_object_threshold, 20);
    }

    #[test]
    fn invalid_toml_falls_back_to_default() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(".tangram");
        std::fs::create_dir_all(&dir).expect("create .tangram");
        std::fs::write(dir.join("config.toml"), "scan = [not toml").expect("write");

        let config = TangramConfig::load(temp.path());
        assert_eq!(config.graph.god_object_threshold, 15);
    }
}
