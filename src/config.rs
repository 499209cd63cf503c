//! Configuration for libris.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (LIBRIS_HOME, LIBRIS_EXPORT_DIR)
//! 2. Config file (.libris/config.yaml)
//! 3. Defaults (~/.libris)
//!
//! Config file discovery:
//! - Searches current directory and parents for .libris/config.yaml
//! - Paths in config file are relative to the .libris/ directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::Document;
use crate::library::{LendingPolicy, PREMIUM_ANNOTATION};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub lending: Option<LendingPolicy>,
    #[serde(default)]
    pub indexer: Option<IndexerConfig>,
    #[serde(default)]
    pub display: Option<DisplayConfig>,
    /// Documents loaded into the catalog at startup
    #[serde(default)]
    pub documents: Option<Vec<DocumentSeed>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .libris/)
    pub home: Option<String>,
    /// Snapshot export directory (relative to .libris/)
    pub exports: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    /// Best-effort wait for the indexer; unset means wait indefinitely
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub premium_label: Option<String>,
}

/// A document entry from the config file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentSeed {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub category: String,
    pub isbn: Option<String>,
    pub issue: Option<u32>,
}

impl DocumentSeed {
    /// Build the document this entry describes
    pub fn build(&self) -> crate::library::Result<Document> {
        let mut builder = Document::builder()
            .title(&self.title)
            .author(&self.author)
            .year(self.year)
            .category(&self.category);

        if let Some(isbn) = &self.isbn {
            builder = builder.isbn(isbn);
        } else if let Some(issue) = self.issue {
            builder = builder.issue(issue);
        }

        builder.build()
    }
}

/// The catalog a fresh install starts with
pub fn default_documents() -> Vec<DocumentSeed> {
    vec![
        DocumentSeed {
            title: "Java Guide".to_string(),
            author: "Oracle".to_string(),
            year: 2020,
            category: "Programming".to_string(),
            isbn: Some("123".to_string()),
            issue: None,
        },
        DocumentSeed {
            title: "Clean Code".to_string(),
            author: "Martin".to_string(),
            year: 2008,
            category: "Programming".to_string(),
            isbn: Some("456".to_string()),
            issue: None,
        },
    ]
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to libris home
    pub home: PathBuf,
    /// Absolute path to the export directory
    pub exports: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Fees and loan periods
    pub lending: LendingPolicy,
    /// Indexer wait limit
    pub indexer_timeout: Option<Duration>,
    /// Annotation used for premium descriptions
    pub premium_label: String,
    /// Startup documents
    pub documents: Vec<DocumentSeed>,
}

impl ResolvedConfig {
    /// Build every configured document, in order
    pub fn build_documents(&self) -> Result<Vec<Document>> {
        self.documents
            .iter()
            .map(|seed| {
                seed.build()
                    .with_context(|| format!("Invalid document in config: {:?}", seed.title))
            })
            .collect()
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".libris").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    load_config_from(find_config_file())
}

fn load_config_from(config_file: Option<PathBuf>) -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".libris");

    let file = config_file
        .as_deref()
        .map(load_config_file)
        .transpose()?;

    // Relative paths in the file resolve against .libris/
    let libris_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(Path::new("."));

    let paths = file.as_ref().map(|f| f.paths.clone()).unwrap_or_default();

    let home = if let Ok(env_home) = std::env::var("LIBRIS_HOME") {
        PathBuf::from(env_home)
    } else if let Some(ref home_path) = paths.home {
        resolve_path(libris_dir, home_path)
    } else {
        default_home
    };

    let exports = if let Ok(env_exports) = std::env::var("LIBRIS_EXPORT_DIR") {
        PathBuf::from(env_exports)
    } else if let Some(ref exports_path) = paths.exports {
        resolve_path(libris_dir, exports_path)
    } else {
        home.join("exports")
    };

    let (lending, indexer_timeout, premium_label, documents) = match file {
        Some(file) => (
            file.lending.unwrap_or_default(),
            file.indexer
                .and_then(|i| i.timeout_ms)
                .map(Duration::from_millis),
            file.display
                .and_then(|d| d.premium_label)
                .unwrap_or_else(|| PREMIUM_ANNOTATION.to_string()),
            file.documents.unwrap_or_else(default_documents),
        ),
        None => (
            LendingPolicy::default(),
            None,
            PREMIUM_ANNOTATION.to_string(),
            default_documents(),
        ),
    };

    Ok(ResolvedConfig {
        home,
        exports,
        config_file,
        lending,
        indexer_timeout,
        premium_label,
        documents,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Get the directory snapshots are exported to
pub fn exports_dir() -> Result<PathBuf> {
    Ok(config()?.exports.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let libris_dir = temp.path().join(".libris");
        std::fs::create_dir_all(&libris_dir).unwrap();

        let config_path = libris_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", contents).unwrap();
        (temp, config_path)
    }

    #[test]
    fn test_config_file_parsing() {
        let (_temp, config_path) = write_config(
            r#"
version: "1.0"
paths:
  home: ./
  exports: ../exports
lending:
  late_fee_per_day: 1.0
indexer:
  timeout_ms: 250
display:
  premium_label: "[Gold]"
documents:
  - title: Rust Monthly
    author: Editors
    year: 2024
    category: Magazines
    issue: 7
"#,
        );

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.home, Some("./".to_string()));
        assert_eq!(config.paths.exports, Some("../exports".to_string()));

        let lending = config.lending.unwrap();
        assert_eq!(lending.late_fee_per_day, 1.0);
        // Unset fields fall back to defaults
        assert_eq!(lending.student_loan_days, 14);

        assert_eq!(config.indexer.unwrap().timeout_ms, Some(250));
        assert_eq!(config.display.unwrap().premium_label, Some("[Gold]".to_string()));

        let documents = config.documents.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].issue, Some(7));
    }

    #[test]
    fn test_resolved_config_from_file() {
        let (_temp, config_path) = write_config(
            r#"
version: "1.0"
indexer:
  timeout_ms: 250
"#,
        );

        let config = load_config_from(Some(config_path.clone())).unwrap();
        assert_eq!(config.config_file, Some(config_path));
        assert_eq!(config.indexer_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.premium_label, PREMIUM_ANNOTATION);
        assert_eq!(config.lending, LendingPolicy::default());
        assert_eq!(config.documents, default_documents());
    }

    #[test]
    fn test_export_dir_env_override() {
        let temp = TempDir::new().unwrap();
        let exports = temp.path().join("snapshots");

        std::env::set_var("LIBRIS_EXPORT_DIR", &exports);
        let config = load_config_from(None);
        std::env::remove_var("LIBRIS_EXPORT_DIR");

        assert_eq!(config.unwrap().exports, exports);
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load_config_from(None).unwrap();
        assert!(config.config_file.is_none());
        assert!(config.indexer_timeout.is_none());
        assert_eq!(config.documents.len(), 2);
    }

    #[test]
    fn test_build_documents_reports_invalid_seed() {
        let mut config = load_config_from(None).unwrap();
        assert_eq!(config.build_documents().unwrap().len(), 2);

        config.documents.push(DocumentSeed {
            title: "Untitled".to_string(),
            author: String::new(),
            year: 0,
            category: String::new(),
            isbn: None,
            issue: None,
        });
        assert!(config.build_documents().is_err());
    }

    #[test]
    fn test_seed_kinds() {
        let seeds = default_documents();
        let doc = seeds[0].build().unwrap();
        assert_eq!(doc.isbn(), Some("123"));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
