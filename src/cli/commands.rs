//! Command implementations for the eRezept extractor CLI
//!
//! This module contains command execution, document discovery, output
//! writing and the colored run summary. Command functions return whether
//! every processed item succeeded; the binary maps that to the exit code.

use crate::app::models::{ExtractionOutcome, SpecificationReport};
use crate::app::services::extraction_facade::{DocumentSource, ExtractionFacade, SpecificationSource};
use crate::cli::args::{Args, Commands, ExtractArgs, OutputFormat, ProfilesArgs, SpecArgs};
use crate::config::ExtractorConfig;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

/// One outcome as written to the JSON output, tagged with its document
#[derive(Debug, Serialize)]
pub struct DocumentOutcome<'a> {
    pub document: String,
    #[serde(flatten)]
    pub outcome: &'a ExtractionOutcome,
}

/// Main command runner
///
/// Returns `Ok(true)` when every document or table processed successfully.
pub fn run(args: Args) -> Result<bool> {
    setup_logging(&args);

    info!("Starting eRezept extractor");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let facade = ExtractionFacade::new(config);

    match &args.command {
        Some(Commands::Extract(extract)) => run_extract(&facade, extract, args.show_summary()),
        Some(Commands::ValidateSpec(spec)) => run_validate_spec(&facade, spec),
        Some(Commands::Profiles(profiles)) => run_profiles(&facade, profiles),
        None => Ok(true),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("erezept_extractor={}", log_level)));

    let initialized = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if initialized.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Load configuration from the optional TOML file, falling back to defaults
fn load_configuration(args: &Args) -> Result<ExtractorConfig> {
    let config = match &args.config_file {
        Some(path) => ExtractorConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ExtractorConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Run the extract command
fn run_extract(facade: &ExtractionFacade, args: &ExtractArgs, show_summary: bool) -> Result<bool> {
    let start_time = Instant::now();
    args.validate()?;

    let documents = collect_documents(&args.inputs)?;
    info!("Found {} documents to process", documents.len());

    let sources: Vec<DocumentSource> = documents
        .iter()
        .map(|path| DocumentSource::Path(path.clone()))
        .collect();
    let outcomes = facade.run_batch(&sources, &SpecificationSource::Path(args.spec.clone()));

    let results: Vec<(PathBuf, ExtractionOutcome)> = documents.into_iter().zip(outcomes).collect();

    match &args.output_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_outcomes(&mut writer, &results, args.pretty)?;
            writer.flush()?;
            info!("Wrote {} outcomes to {}", results.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_outcomes(&mut writer, &results, args.pretty)?;
        }
    }

    if show_summary {
        print_extraction_summary(&results, start_time);
    }

    Ok(results.iter().all(|(_, outcome)| outcome.success))
}

/// Expand inputs into a sorted, de-duplicated list of XML documents
///
/// Files are taken as given; directories are walked recursively for files
/// with an `xml` extension (case-insensitive).
pub fn collect_documents(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to read directory {}", input.display()))?;
                if entry.file_type().is_file() && is_xml_file(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            debug!("Found {} XML files in {}", found.len(), input.display());
            documents.extend(found);
        } else {
            documents.push(input.clone());
        }
    }

    let mut seen = std::collections::HashSet::new();
    documents.retain(|path| seen.insert(path.clone()));
    Ok(documents)
}

fn is_xml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

/// Write outcomes as JSON, one document per line (or per block when pretty)
pub fn write_outcomes<W: Write>(
    writer: &mut W,
    results: &[(PathBuf, ExtractionOutcome)],
    pretty: bool,
) -> Result<()> {
    for (path, outcome) in results {
        let tagged = DocumentOutcome {
            document: path.display().to_string(),
            outcome,
        };
        let json = if pretty {
            serde_json::to_string_pretty(&tagged)?
        } else {
            serde_json::to_string(&tagged)?
        };
        writeln!(writer, "{}", json)?;
    }
    Ok(())
}

fn print_extraction_summary(results: &[(PathBuf, ExtractionOutcome)], start_time: Instant) {
    let failed: Vec<&(PathBuf, ExtractionOutcome)> =
        results.iter().filter(|(_, outcome)| !outcome.success).collect();
    let warnings: usize = results.iter().map(|(_, o)| o.warnings().len()).sum();
    let issues: usize = results
        .iter()
        .map(|(_, o)| o.value_validation.issues.len())
        .sum();

    eprintln!("\n{}", "Extraction Summary".bright_green().bold());
    eprintln!(
        "  Documents:         {}",
        results.len().to_string().bright_white().bold()
    );
    eprintln!(
        "  Successful:        {}",
        (results.len() - failed.len()).to_string().bright_white().bold()
    );
    if !failed.is_empty() {
        eprintln!(
            "  Failed:            {}",
            failed.len().to_string().bright_red().bold()
        );
    }
    eprintln!("  Warnings:          {}", warnings);
    eprintln!("  Validation issues: {}", issues);
    eprintln!(
        "  Time:              {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    for (path, outcome) in failed {
        eprintln!("  {} {}", "✗".bright_red(), path.display());
        for error in outcome.errors() {
            eprintln!("      {}", error.dimmed());
        }
    }
}

/// Run the validate-spec command
fn run_validate_spec(facade: &ExtractionFacade, args: &SpecArgs) -> Result<bool> {
    let report = facade.validate_specifications(&SpecificationSource::Path(args.spec.clone()));

    match args.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => print_specification_report(&args.spec, &report),
    }

    Ok(report.success)
}

fn print_specification_report(path: &Path, report: &SpecificationReport) {
    println!(
        "{} {}",
        "Specification Report:".bright_green().bold(),
        path.display()
    );
    println!(
        "  Specifications: {}",
        report.total_specifications.to_string().bright_white().bold()
    );
    println!("  Complex:        {}", report.complex_specifications);
    println!("  Profiles:       {}", report.profile_groups.len());

    if report.validation_issues.is_empty() {
        println!("  {} No issues found", "✓".bright_green());
    } else {
        println!(
            "  Issues:         {}",
            report.validation_issues.len().to_string().bright_red().bold()
        );
        for issue in &report.validation_issues {
            println!("    {} {}", "•".yellow(), issue);
        }
    }
}

/// Run the profiles command
fn run_profiles(facade: &ExtractionFacade, args: &ProfilesArgs) -> Result<bool> {
    let source = SpecificationSource::Path(args.spec.clone());

    let listing: BTreeMap<String, Vec<String>> = if args.complex_only {
        let mut listing: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for spec in facade.complex_specifications(&source)? {
            for profile in spec.profiles() {
                listing
                    .entry(profile.to_string())
                    .or_default()
                    .push(spec.attribute.clone());
            }
        }
        listing
    } else {
        facade
            .specifications_by_profile(&source)?
            .into_iter()
            .map(|(profile, specs)| {
                let attributes = specs.into_iter().map(|s| s.attribute).collect();
                (profile, attributes)
            })
            .collect()
    };

    match args.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
        OutputFormat::Human => {
            println!("{}", "FHIR profiles:".bright_green().bold());
            for (profile, attributes) in &listing {
                println!("  {}", profile.bright_white().bold());
                println!("      {}", attributes.join(", "));
            }
        }
    }

    Ok(true)
}
