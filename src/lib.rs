//! Classmap - Generate UML class diagrams from Java sources
//!
//! Extracts an uploaded source archive, analyzes every Java file in it and
//! writes a PlantUML class diagram, optionally rendered to SVG by an
//! external renderer.

pub mod analysis;
pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;

// Re-export main types
pub use analysis::{AnalysisContext, Analyzer, RunReport};
pub use archive::{ArchiveGuard, Extraction};
pub use config::Config;
pub use error::{Error, Result};
pub use output::{PlantUmlEmitter, Renderer};
