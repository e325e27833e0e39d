// Analysis module: from a source tree to classes and relationships

pub mod annotations;
pub mod classes;
pub mod context;
pub mod dependencies;
pub mod relationships;
pub mod resolve;
pub mod walker;

pub use classes::{extract_classes, ClassBlock};
pub use context::AnalysisContext;
pub use dependencies::DependencyReport;
pub use relationships::{EdgeKind, Relationship, RelationshipEngine, Target};
pub use resolve::{ProjectIndex, TypeResolver};
pub use walker::SourceWalker;

use crate::archive::{ArchiveGuard, Extraction};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{PlantUmlEmitter, Renderer};
use crate::parser::{CompilationUnit, JavaParser};
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub name: String,
    pub classes: usize,
    pub relationships: usize,
    pub processed_files: usize,
    /// `path: message` for every file that failed to parse
    pub parse_errors: Vec<String>,
    pub patterns: Vec<String>,
    pub annotation_stats: BTreeMap<String, usize>,
    pub injections: IndexMap<String, Vec<String>>,
    pub dependencies: DependencyReport,
    pub diagram: PathBuf,
    /// Rendered image, when the renderer ran
    pub image: Option<PathBuf>,
    pub diagram_url: Option<String>,
    pub extraction: Option<Extraction>,
}

impl RunReport {
    fn new(name: &str, ctx: &AnalysisContext, diagram: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            classes: ctx.class_count(),
            relationships: ctx.relationship_count(),
            processed_files: ctx.processed_count(),
            parse_errors: ctx
                .parse_errors()
                .into_iter()
                .map(|(path, message)| format!("{}: {}", path.display(), message))
                .collect(),
            patterns: ctx.patterns(),
            annotation_stats: ctx.annotation_stats(),
            injections: ctx.injections(),
            dependencies: ctx.dependencies(),
            diagram,
            image: None,
            diagram_url: None,
            extraction: None,
        }
    }
}

/// Main analyzer that orchestrates the pipeline
pub struct Analyzer {
    config: Config,
    verbose: bool,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            verbose: false,
        })
    }

    /// Show a progress bar while parsing
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze every Java file under `root` into a fresh context.
    ///
    /// Files are parsed in parallel; classes and relationships are then
    /// collected in walk order so repeated runs produce the same diagram.
    pub fn generate_diagram(&self, root: &Path) -> Result<AnalysisContext> {
        if !root.exists() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(Error::invalid_input(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let root = root.canonicalize()?;

        let ctx = AnalysisContext::new(&root);
        let walker = SourceWalker::new(&root, &self.config.analysis.exclude)?;
        let mut index = ProjectIndex::build(&walker);

        let mut files = Vec::new();
        for path in walker.files() {
            match path.canonicalize() {
                Ok(canonical) => {
                    if ctx.mark_processed(&canonical) {
                        files.push(canonical);
                    }
                }
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }
        tracing::info!("Found {} Java files under {}", files.len(), root.display());

        let parsed = self.parse_all(&files);

        let mut units = Vec::with_capacity(parsed.len());
        for (path, result) in parsed {
            match result {
                Ok(unit) => {
                    index.declare(&unit);
                    units.push(unit);
                }
                Err(e @ Error::Parser(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    ctx.record_parse_error(&path, e.to_string());
                }
            }
        }

        // Every declaration is indexed before the first edge is admitted
        let engine = RelationshipEngine::new(&index, &self.config.analysis);
        for unit in &units {
            self.collect_unit(unit, &engine, &ctx);
        }

        tracing::info!(
            "Analysis complete: {} files, {} classes, {} relationships, {} parse errors",
            ctx.processed_count(),
            ctx.class_count(),
            ctx.relationship_count(),
            ctx.parse_errors().len()
        );
        let stats = ctx.annotation_stats();
        if !stats.is_empty() {
            tracing::info!("Annotation statistics: {:?}", stats);
        }
        let dependencies = ctx.dependencies();
        for (category, imports) in &dependencies.categories {
            tracing::info!("{}: {} imports", category, imports.len());
        }

        Ok(ctx)
    }

    fn parse_all(&self, files: &[PathBuf]) -> Vec<(PathBuf, Result<CompilationUnit>)> {
        let progress = if self.verbose {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .map(|style| style.progress_chars("#>-"))
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(pb)
        } else {
            None
        };

        let parsed = files
            .par_iter()
            .map_init(JavaParser::new, |parser, path| {
                let result = match parser {
                    Ok(parser) => parser.parse_file(path),
                    Err(e) => Err(Error::parser(e.to_string())),
                };
                if let Some(ref pb) = progress {
                    let msg = path
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .to_string();
                    pb.set_message(msg);
                    pb.inc(1);
                }
                (path.clone(), result)
            })
            .collect();

        if let Some(pb) = progress {
            pb.finish_with_message("parsed");
        }
        parsed
    }

    fn collect_unit(
        &self,
        unit: &CompilationUnit,
        engine: &RelationshipEngine,
        ctx: &AnalysisContext,
    ) {
        for block in extract_classes(unit) {
            ctx.add_class(block);
        }

        engine.analyze_unit(unit, ctx);

        ctx.merge_annotation_stats(&annotations::annotation_statistics(unit));

        let patterns = annotations::detect_patterns(unit);
        if !patterns.is_empty() {
            tracing::info!("{}: {}", unit.path.display(), patterns.join(", "));
            ctx.add_patterns(patterns);
        }

        ctx.add_injections(annotations::extract_injections(unit));
        ctx.merge_dependencies(&DependencyReport::analyze(unit));
    }

    /// Write `<name>.puml` into `out_dir`, returning its path
    pub fn write_diagram(&self, ctx: &AnalysisContext, out_dir: &Path) -> Result<PathBuf> {
        let path = out_dir.join(self.config.diagram.puml_file_name());
        PlantUmlEmitter::new(&self.config.diagram.name).write(ctx, &path)?;
        Ok(path)
    }

    /// Analyze an extracted tree, write the diagram and render it when enabled
    pub fn process_directory(&self, root: &Path) -> Result<RunReport> {
        let ctx = self.generate_diagram(root)?;
        let diagram = self.write_diagram(&ctx, &self.config.diagram.output_directory)?;
        let mut report = RunReport::new(&self.config.diagram.name, &ctx, diagram);

        if self.config.renderer.enabled {
            Renderer::from_config(&self.config.renderer).render(&report.diagram)?;
            report.image = Some(Renderer::output_path(&report.diagram));
            report.diagram_url = Some(self.config.diagram.diagram_url());
        }

        Ok(report)
    }

    /// Extract `archive` into the work directory, then run the whole pipeline.
    ///
    /// The work directory is cleared first so only this archive is analyzed.
    pub fn process_archive(&self, archive: &Path) -> Result<RunReport> {
        let work = &self.config.archive.work_directory;
        if work.exists() {
            tracing::debug!("Clearing work directory {}", work.display());
            fs::remove_dir_all(work)?;
        }

        let guard = ArchiveGuard::new(self.config.archive.clone());
        let extraction = guard.extract(archive, work)?;

        let mut report = self.process_directory(&extraction.root)?;
        report.extraction = Some(extraction);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.diagram.output_directory = dir.join("out");
        config.archive.work_directory = dir.join("work");
        config.renderer.enabled = false;
        config
    }

    fn create_project(dir: &Path) -> PathBuf {
        let src = dir.join("src");
        fs::create_dir_all(src.join("model")).unwrap();
        fs::write(
            src.join("model/User.java"),
            "package model;\npublic class User { private String name; }\n",
        )
        .unwrap();
        fs::write(
            src.join("UserService.java"),
            r#"
import model.User;
import org.springframework.stereotype.Service;

@Service
public class UserService {
    private User owner;
    public User find(String name) { return new User(); }
}
"#,
        )
        .unwrap();
        src
    }

    #[test]
    fn test_generate_diagram() {
        let dir = TempDir::new().unwrap();
        let src = create_project(dir.path());
        let analyzer = Analyzer::new(test_config(dir.path())).unwrap();

        let ctx = analyzer.generate_diagram(&src).unwrap();
        assert_eq!(ctx.processed_count(), 2);
        assert_eq!(ctx.class_names(), vec!["UserService", "User"]);
        assert!(ctx
            .relationships()
            .iter()
            .any(|r| r.to_string() == "UserService --> User"));
        assert_eq!(ctx.annotation_stats().get("Service"), Some(&1));
        assert!(ctx.parse_errors().is_empty());
    }

    #[test]
    fn test_nested_and_secondary_classes() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            src.join("Tree.java"),
            "class Tree { static class Node { Tree owner; } }\nclass Helper { Tree t; }\n",
        )
        .unwrap();
        let analyzer = Analyzer::new(test_config(dir.path())).unwrap();

        let ctx = analyzer.generate_diagram(&src).unwrap();
        assert_eq!(ctx.class_names(), vec!["Tree", "Node", "Helper"]);
        let edges: Vec<String> = ctx.relationships().iter().map(|r| r.to_string()).collect();
        assert!(edges.contains(&"Tree *-- Node : <<nested>>".to_string()));
        assert!(edges.contains(&"Node --> Tree".to_string()));
        assert!(edges.contains(&"Helper --> Tree".to_string()));
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let analyzer = Analyzer::new(test_config(dir.path())).unwrap();
        let result = analyzer.generate_diagram(&dir.path().join("missing"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_root_is_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("A.java");
        fs::write(&file, "class A {}").unwrap();
        let analyzer = Analyzer::new(test_config(dir.path())).unwrap();
        assert!(matches!(
            analyzer.generate_diagram(&file),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_error_recorded_and_skipped() {
        let dir = TempDir::new().unwrap();
        let src = create_project(dir.path());
        fs::write(src.join("Broken.java"), "public class Broken { void f( }").unwrap();
        let analyzer = Analyzer::new(test_config(dir.path())).unwrap();

        let ctx = analyzer.generate_diagram(&src).unwrap();
        assert_eq!(ctx.parse_errors().len(), 1);
        assert!(ctx.parse_errors()[0].0.ends_with("Broken.java"));
        assert!(!ctx.class_names().contains(&"Broken".to_string()));
        assert_eq!(ctx.class_count(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.diagram.name = String::new();
        assert!(Analyzer::new(config).is_err());
    }

    #[test]
    fn test_process_directory_writes_diagram() {
        let dir = TempDir::new().unwrap();
        let src = create_project(dir.path());
        let analyzer = Analyzer::new(test_config(dir.path())).unwrap();

        let report = analyzer.process_directory(&src).unwrap();
        assert_eq!(report.diagram, dir.path().join("out/diagrama.puml"));
        assert_eq!(report.classes, 2);
        assert_eq!(report.processed_files, 2);
        assert!(report.image.is_none());
        assert!(report.patterns.is_empty());

        let text = fs::read_to_string(&report.diagram).unwrap();
        assert!(text.starts_with("@startuml diagrama\n"));
        assert!(text.contains("class UserService <<Service>> {"));
    }

    #[test]
    fn test_process_archive() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("upload.zip");
        {
            let mut zip = ZipWriter::new(fs::File::create(&archive).unwrap());
            let options: FileOptions<()> = FileOptions::default();
            zip.start_file("shop/Order.java", options).unwrap();
            zip.write_all(b"public class Order { private Item item; }").unwrap();
            zip.start_file("shop/Item.java", options).unwrap();
            zip.write_all(b"public class Item {}").unwrap();
            zip.finish().unwrap();
        }

        let config = test_config(dir.path());
        fs::create_dir_all(&config.archive.work_directory).unwrap();
        fs::write(config.archive.work_directory.join("Stale.java"), "class Stale {}").unwrap();

        let report = Analyzer::new(config).unwrap().process_archive(&archive).unwrap();
        assert_eq!(report.processed_files, 2);
        assert_eq!(report.extraction.as_ref().map(|e| e.files), Some(2));

        let text = fs::read_to_string(&report.diagram).unwrap();
        assert!(text.contains("Order --> Item"));
        assert!(!text.contains("Stale"));
    }
}
