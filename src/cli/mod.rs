//! CLI module for classmap

mod args;

pub use args::{Args, Command, RunOptions};

use crate::analysis::{Analyzer, RunReport};
use crate::config::Config;
use crate::error::Result;
use std::process::ExitCode;

impl Args {
    /// Whether the selected command asked for verbose output
    pub fn verbose(&self) -> bool {
        match &self.command {
            Command::Generate { options, .. } | Command::Analyze { options, .. } => options.verbose,
            Command::Version => false,
        }
    }
}

/// Run the CLI application
pub fn run(args: Args) -> ExitCode {
    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Generate { archive, options } => {
            let analyzer = build_analyzer(&options)?;
            if options.verbose {
                println!("Extracting: {}", archive.display());
            }
            let report = analyzer.process_archive(&archive)?;
            print_report(&report, options.report)
        }

        Command::Analyze { path, options } => {
            let analyzer = build_analyzer(&options)?;
            if options.verbose {
                println!("Analyzing: {}", path.display());
            }
            let report = analyzer.process_directory(&path)?;
            print_report(&report, options.report)
        }

        Command::Version => {
            println!("classmap {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn build_analyzer(options: &RunOptions) -> Result<Analyzer> {
    let mut cfg = Config::load_or_default(&options.config);

    // CLI takes precedence
    cfg.merge_cli(
        options.output.clone(),
        options.name.clone(),
        options.exclude.clone(),
        options.no_render,
        options.no_heuristics,
    );

    if options.verbose {
        println!("Diagram: {}", cfg.diagram.name);
        println!("Output: {}", cfg.diagram.output_directory.display());
        println!("Render: {}", cfg.renderer.enabled);
        if !cfg.analysis.exclude.is_empty() {
            println!("Exclude: {:?}", cfg.analysis.exclude);
        }
    }

    Ok(Analyzer::new(cfg)?.with_verbose(options.verbose))
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "Analysis complete: {} files, {} classes, {} relationships",
        report.processed_files, report.classes, report.relationships
    );

    if !report.parse_errors.is_empty() {
        println!("\nParse errors ({}):", report.parse_errors.len());
        for err in report.parse_errors.iter().take(5) {
            println!("  {}", err);
        }
        if report.parse_errors.len() > 5 {
            println!("  ... and {} more", report.parse_errors.len() - 5);
        }
    }

    if !report.patterns.is_empty() {
        println!("Patterns: {}", report.patterns.join(", "));
    }

    println!("Diagram written to {}", report.diagram.display());
    if let Some(image) = &report.image {
        println!("Image written to {}", image.display());
    }
    Ok(())
}
