//! Meddler CLI: validate an export, run the conversion, print a summary.

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use meddler_core::ImageMode;
use meddler_engine::{run_conversion, validate_export, DirExportSource, ExportSource};

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    engine_logging::initialize_terminal(if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    let config = cli::build_config(&args)?;

    let export_root = resolve_input(&args.input)
        .with_context(|| format!("resolve export root: {}", args.input.display()))?;
    let source = DirExportSource::new(&export_root);

    let validation = validate_export(&source);
    if !validation.valid {
        anyhow::bail!("{}", validation.message);
    }

    println!();
    println!(
        "  Valid Medium export found: {}",
        validation.author_name.as_deref().unwrap_or("Unknown author")
    );
    if let Some(warning) = &validation.warning {
        println!("  warning: {warning}");
    }
    println!(
        "  Posts: {} published, {} drafts",
        validation.published_count, validation.draft_count
    );
    println!(
        "  Format: {:?} front matter, target {:?}",
        config.format, config.target
    );
    println!("  Output: {}", config.output.display());
    if args.dry_run {
        println!("  Dry run mode: no files will be written.");
    }
    println!();

    let report = run_conversion(&source, &config, args.dry_run).context("conversion failed")?;

    println!("  Export complete.");
    println!(
        "  Posts converted: {} published, {} drafts",
        report.summary.posts_converted, report.summary.drafts_converted
    );
    if report.summary.responses_skipped > 0 {
        println!("  Responses skipped: {}", report.summary.responses_skipped);
    }
    if report.summary.responses_included > 0 {
        println!("  Responses included: {}", report.summary.responses_included);
    }
    if config.images.mode != ImageMode::Reference {
        println!(
            "  Images: {} downloaded, {} failed",
            report.summary.images_downloaded, report.summary.images_failed
        );
    }
    if report.summary.supplementary_files > 0 {
        println!(
            "  Supplementary files: {}",
            report.summary.supplementary_files
        );
    }
    if !report.errors.is_empty() {
        println!(
            "  Errors: {} (see meddler-report.json)",
            report.errors.len()
        );
    }
    if !args.dry_run {
        println!("\n  Output: {}", config.output.display());
    }
    println!();

    Ok(())
}

/// Resolves the export root: the given directory if it holds README.html,
/// else a single child directory that does (exports unpack into a
/// hash-named folder). Archives must be extracted first.
fn resolve_input(input: &Path) -> anyhow::Result<PathBuf> {
    if !input.exists() {
        anyhow::bail!("path does not exist");
    }
    if input.is_file() {
        if input.extension().is_some_and(|ext| ext == "zip") {
            anyhow::bail!("archive inputs are not supported; extract the .zip first");
        }
        anyhow::bail!("path is not a directory");
    }

    let probe = DirExportSource::new(input);
    if probe.exists("README.html") {
        return Ok(input.to_path_buf());
    }

    for entry in std::fs::read_dir(input)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let sub = entry.path();
            if sub.join("README.html").exists() {
                return Ok(sub);
            }
        }
    }

    Ok(input.to_path_buf())
}
