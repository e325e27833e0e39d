// PlantUML class diagram generation
//
// Serializes the classes and relationships collected in an analysis context.

use crate::analysis::AnalysisContext;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Fixed styling emitted after the header
pub const STYLE_DIRECTIVES: [&str; 3] = [
    "!theme mono",
    "skinparam linetype ortho",
    "skinparam monochrome true",
];

/// Diagram generator writing `.puml` class diagrams
pub struct PlantUmlEmitter {
    name: String,
}

impl PlantUmlEmitter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Full diagram text: header, styling, classes, relationships, footer
    pub fn render(&self, ctx: &AnalysisContext) -> String {
        let mut lines = Vec::new();
        lines.push(format!("@startuml {}", self.name));
        lines.extend(STYLE_DIRECTIVES.iter().map(|d| d.to_string()));

        for block in ctx.classes() {
            lines.push(block.to_string());
        }

        for relationship in ctx.relationships() {
            lines.push(relationship.to_string());
        }

        lines.push("@enduml".to_string());

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Write the diagram to `path`, replacing any existing file
    pub fn write(&self, ctx: &AnalysisContext, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| with_path(e, parent))?;
            }
        }

        fs::write(path, self.render(ctx)).map_err(|e| with_path(e, path))?;

        tracing::info!(
            "Wrote diagram {} ({} classes, {} relationships)",
            path.display(),
            ctx.class_count(),
            ctx.relationship_count()
        );
        Ok(())
    }
}

fn with_path(e: std::io::Error, path: &Path) -> Error {
    Error::Io(std::io::Error::new(
        e.kind(),
        format!("{}: {}", path.display(), e),
    ))
}
