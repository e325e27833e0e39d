use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub diagram: DiagramConfig,
    pub archive: ArchiveConfig,
    pub analysis: AnalysisConfig,
    pub renderer: RendererConfig,
}

/// Diagram output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Diagram name, used in `@startuml` and as the output file stem
    pub name: String,
    pub output_directory: PathBuf,
}

/// Archive extraction limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub work_directory: PathBuf,
    pub max_total_bytes: u64,
    pub max_entry_bytes: u64,
    /// Zero disables the ratio check
    pub max_compression_ratio: f64,
}

/// Source analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Glob patterns, relative to the source root, of files to skip
    pub exclude: Vec<String>,
    /// Emit speculative `<<likely-inject>>` edges for controller/service classes
    pub likely_inject: bool,
    /// Emit edges to placeholder and library targets (lambdas, streams, functional interfaces)
    pub concept_edges: bool,
}

/// External renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub enabled: bool,
    pub java: String,
    pub jar_path: Option<PathBuf>,
    pub environment_variable: String,
    pub default_jar_path: PathBuf,
    pub format_flag: String,
    pub timeout_secs: u64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            name: "diagrama".to_string(),
            output_directory: PathBuf::from("uml_output"),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            work_directory: PathBuf::from("uploads/unzipped"),
            max_total_bytes: 1024 * 1024 * 1024,
            max_entry_bytes: 100 * 1024 * 1024,
            max_compression_ratio: 100.0,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exclude: vec![],
            likely_inject: true,
            concept_edges: true,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            java: "java".to_string(),
            jar_path: None,
            environment_variable: "PLANTUML_JAR".to_string(),
            default_jar_path: PathBuf::from("/opt/plantuml/plantuml.jar"),
            format_flag: "-tsvg".to_string(),
            timeout_secs: 120,
        }
    }
}

impl DiagramConfig {
    /// File name of the diagram description
    pub fn puml_file_name(&self) -> String {
        format!("{}.puml", self.name)
    }

    /// File name of the rendered image
    pub fn svg_file_name(&self) -> String {
        format!("{}.svg", self.name)
    }

    /// URL path under which the rendered image is published
    pub fn diagram_url(&self) -> String {
        format!(
            "/{}/{}",
            self.output_directory.to_string_lossy().trim_matches('/'),
            self.svg_file_name()
        )
    }
}

impl RendererConfig {
    /// Resolve the renderer jar: explicit value, then environment variable, then default
    pub fn resolved_jar_path(&self) -> PathBuf {
        self.resolve_jar_with(|name| std::env::var(name).ok())
    }

    fn resolve_jar_with(&self, lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(path) = &self.jar_path {
            if !path.as_os_str().is_empty() {
                return path.clone();
            }
        }

        if let Some(value) = lookup(&self.environment_variable) {
            if !value.trim().is_empty() {
                return PathBuf::from(value.trim());
            }
        }

        self.default_jar_path.clone()
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("Ignoring config {}: {}", path.display(), e);
                }
                Config::default()
            }
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        output: Option<PathBuf>,
        name: Option<String>,
        exclude: Vec<String>,
        no_render: bool,
        no_heuristics: bool,
    ) {
        if let Some(out) = output {
            self.diagram.output_directory = out;
        }

        if let Some(name) = name {
            self.diagram.name = name;
        }

        if !exclude.is_empty() {
            self.analysis.exclude.extend(exclude);
        }

        if no_render {
            self.renderer.enabled = false;
        }

        if no_heuristics {
            self.analysis.likely_inject = false;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let name = self.diagram.name.trim();
        if name.is_empty() {
            return Err(Error::config_validation("diagram name must not be empty"));
        }

        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(Error::config_validation(
                "diagram name must not contain path separators",
            ));
        }

        if self.archive.max_total_bytes == 0 || self.archive.max_entry_bytes == 0 {
            return Err(Error::config_validation("archive limits must be at least 1 byte"));
        }

        if self.archive.max_entry_bytes > self.archive.max_total_bytes {
            return Err(Error::config_validation(
                "max_entry_bytes cannot exceed max_total_bytes",
            ));
        }

        if self.archive.max_compression_ratio < 0.0 {
            return Err(Error::config_validation(
                "max_compression_ratio cannot be negative",
            ));
        }

        if self.renderer.timeout_secs == 0 {
            return Err(Error::config_validation("renderer timeout must be at least 1s"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.diagram.name, "diagrama");
        assert_eq!(config.archive.max_total_bytes, 1 << 30);
        assert_eq!(config.archive.max_entry_bytes, 100 << 20);
        assert!(config.analysis.likely_inject);
        assert!(config.renderer.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[diagram]
name = "shop"
output_directory = "out"

[archive]
max_entry_bytes = 1024

[analysis]
likely_inject = false

[renderer]
timeout_secs = 5
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.diagram.name, "shop");
        assert_eq!(config.diagram.output_directory, PathBuf::from("out"));
        assert_eq!(config.archive.max_entry_bytes, 1024);
        assert_eq!(config.archive.max_total_bytes, 1 << 30);
        assert!(!config.analysis.likely_inject);
        assert_eq!(config.renderer.timeout_secs, 5);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/classmap.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/classmap.toml"));
        assert_eq!(config.diagram.name, "diagrama");
    }

    #[test]
    fn test_validation_empty_name() {
        let mut config = Config::default();
        config.diagram.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_name_with_separator() {
        let mut config = Config::default();
        config.diagram.name = "../escape".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_entry_limit_above_total() {
        let mut config = Config::default();
        config.archive.max_entry_bytes = config.archive.max_total_bytes + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut config = Config::default();
        config.renderer.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_cli() {
        let mut config = Config::default();
        config.merge_cli(
            Some(PathBuf::from("/custom/output")),
            Some("shop".to_string()),
            vec!["test/**".to_string()],
            true,
            true,
        );
        assert_eq!(config.diagram.output_directory, PathBuf::from("/custom/output"));
        assert_eq!(config.diagram.name, "shop");
        assert_eq!(config.analysis.exclude, vec!["test/**".to_string()]);
        assert!(!config.renderer.enabled);
        assert!(!config.analysis.likely_inject);
    }

    #[test]
    fn test_file_names_and_url() {
        let diagram = DiagramConfig::default();
        assert_eq!(diagram.puml_file_name(), "diagrama.puml");
        assert_eq!(diagram.svg_file_name(), "diagrama.svg");
        assert_eq!(diagram.diagram_url(), "/uml_output/diagrama.svg");
    }

    #[test]
    fn test_jar_resolution_explicit_wins() {
        let renderer = RendererConfig {
            jar_path: Some(PathBuf::from("/explicit/plantuml.jar")),
            ..RendererConfig::default()
        };
        let resolved = renderer.resolve_jar_with(|_| Some("/env/plantuml.jar".to_string()));
        assert_eq!(resolved, PathBuf::from("/explicit/plantuml.jar"));
    }

    #[test]
    fn test_jar_resolution_env_then_default() {
        let renderer = RendererConfig::default();
        let from_env = renderer.resolve_jar_with(|name| {
            assert_eq!(name, "PLANTUML_JAR");
            Some("/env/plantuml.jar".to_string())
        });
        assert_eq!(from_env, PathBuf::from("/env/plantuml.jar"));

        let fallback = renderer.resolve_jar_with(|_| Some("   ".to_string()));
        assert_eq!(fallback, PathBuf::from("/opt/plantuml/plantuml.jar"));
    }
}
