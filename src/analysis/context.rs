// Per-run accumulation state shared by every stage of the pipeline

use crate::analysis::classes::ClassBlock;
use crate::analysis::dependencies::DependencyReport;
use crate::analysis::relationships::Relationship;
use indexmap::{IndexMap, IndexSet};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Everything one diagram-generation run collects.
///
/// Collections are append-only and safe to share across worker threads.
/// Relationship insertion is a single check-and-insert, so an edge derived
/// twice is kept once at its first position.
#[derive(Debug)]
pub struct AnalysisContext {
    base_path: PathBuf,
    classes: Mutex<Vec<ClassBlock>>,
    relationships: Mutex<IndexSet<Relationship>>,
    processed_files: Mutex<HashSet<PathBuf>>,
    parse_errors: Mutex<Vec<(PathBuf, String)>>,
    annotation_stats: Mutex<BTreeMap<String, usize>>,
    patterns: Mutex<IndexSet<String>>,
    injections: Mutex<IndexMap<String, Vec<String>>>,
    dependencies: Mutex<DependencyReport>,
}

impl AnalysisContext {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            classes: Mutex::new(Vec::new()),
            relationships: Mutex::new(IndexSet::new()),
            processed_files: Mutex::new(HashSet::new()),
            parse_errors: Mutex::new(Vec::new()),
            annotation_stats: Mutex::new(BTreeMap::new()),
            patterns: Mutex::new(IndexSet::new()),
            injections: Mutex::new(IndexMap::new()),
            dependencies: Mutex::new(DependencyReport::default()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Claim a file for processing; false if it was already claimed
    pub fn mark_processed(&self, canonical: &Path) -> bool {
        self.processed_files.lock().insert(canonical.to_path_buf())
    }

    pub fn processed_count(&self) -> usize {
        self.processed_files.lock().len()
    }

    pub fn add_class(&self, block: ClassBlock) {
        self.classes.lock().push(block);
    }

    pub fn classes(&self) -> Vec<ClassBlock> {
        self.classes.lock().clone()
    }

    pub fn class_count(&self) -> usize {
        self.classes.lock().len()
    }

    /// Names of all classes added so far, first occurrence order
    pub fn class_names(&self) -> Vec<String> {
        let classes = self.classes.lock();
        let names: IndexSet<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// Insert an edge; false if an identical edge is already present
    pub fn add_relationship(&self, relationship: Relationship) -> bool {
        self.relationships.lock().insert(relationship)
    }

    pub fn relationships(&self) -> Vec<Relationship> {
        self.relationships.lock().iter().cloned().collect()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.lock().len()
    }

    pub fn record_parse_error(&self, path: &Path, message: impl Into<String>) {
        self.parse_errors
            .lock()
            .push((path.to_path_buf(), message.into()));
    }

    pub fn parse_errors(&self) -> Vec<(PathBuf, String)> {
        self.parse_errors.lock().clone()
    }

    pub fn merge_annotation_stats(&self, stats: &BTreeMap<String, usize>) {
        let mut totals = self.annotation_stats.lock();
        for (name, count) in stats {
            *totals.entry(name.clone()).or_insert(0) += count;
        }
    }

    pub fn annotation_stats(&self) -> BTreeMap<String, usize> {
        self.annotation_stats.lock().clone()
    }

    pub fn add_patterns(&self, found: impl IntoIterator<Item = String>) {
        self.patterns.lock().extend(found);
    }

    pub fn patterns(&self) -> Vec<String> {
        self.patterns.lock().iter().cloned().collect()
    }

    pub fn add_injections(&self, found: IndexMap<String, Vec<String>>) {
        let mut injections = self.injections.lock();
        for (class, deps) in found {
            injections.entry(class).or_default().extend(deps);
        }
    }

    pub fn injections(&self) -> IndexMap<String, Vec<String>> {
        self.injections.lock().clone()
    }

    pub fn merge_dependencies(&self, report: &DependencyReport) {
        self.dependencies.lock().merge(report);
    }

    pub fn dependencies(&self) -> DependencyReport {
        self.dependencies.lock().clone()
    }
}
