//! Drawing Metadata Batch Extractor
//!
//! Extracts title-block metadata from every layout dump in a directory and
//! writes one JSON report.
//!
//! Usage:
//!   cargo run --bin extract_drawings
//!   cargo run --bin extract_drawings -- layout_dumps --output results.json
//!   cargo run --bin extract_drawings -- dumps --config config.json --reference reference.json
//!   cargo run --bin extract_drawings -- --verbose

use drawing_oxide::config::ExtractionConfig;
use drawing_oxide::pipeline::{DocumentOutcome, DrawingPipeline};
use drawing_oxide::provider::JsonLayoutProvider;
use drawing_oxide::report::BatchSummary;
use drawing_oxide::validation::{Corroboration, ReferenceStore};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

struct ExtractorConfig {
    dump_dir: PathBuf,
    config_file: Option<PathBuf>,
    reference_file: Option<PathBuf>,
    output_file: PathBuf,
    verbose: bool,
}

impl ExtractorConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut dump_dir = PathBuf::from("layout_dumps");
        let mut config_file = None;
        let mut reference_file = None;
        let mut output_file = PathBuf::from("drawing_results.json");
        let mut verbose = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => {
                    i += 1;
                    if i < args.len() {
                        config_file = Some(PathBuf::from(&args[i]));
                    }
                },
                "--reference" => {
                    i += 1;
                    if i < args.len() {
                        reference_file = Some(PathBuf::from(&args[i]));
                    }
                },
                "--output" => {
                    i += 1;
                    if i < args.len() {
                        output_file = PathBuf::from(&args[i]);
                    }
                },
                "--verbose" | "-v" => {
                    verbose = true;
                },
                other if !other.starts_with('-') => {
                    dump_dir = PathBuf::from(other);
                },
                _ => {},
            }
            i += 1;
        }

        Self {
            dump_dir,
            config_file,
            reference_file,
            output_file,
            verbose,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentReport {
    file: String,
    #[serde(flatten)]
    outcome: DocumentOutcome,
    corroboration: Option<Corroboration>,
    elapsed_ms: u128,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchReport {
    generated_at: String,
    dump_dir: String,
    summary: BatchSummary,
    documents: Vec<DocumentReport>,
}

fn discover_dumps(dir: &Path) -> Vec<PathBuf> {
    let mut dumps = Vec::new();

    if !dir.exists() {
        eprintln!("Error: Directory {} does not exist", dir.display());
        return dumps;
    }

    match fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) == Some("json") {
                    dumps.push(path);
                }
            }
        },
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir.display(), e);
        },
    }

    dumps.sort();
    dumps
}

fn process_dump(pipeline: &DrawingPipeline, references: &ReferenceStore, path: &Path) -> DocumentReport {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let start = Instant::now();

    let outcome = match JsonLayoutProvider::open(path) {
        Ok(provider) => pipeline.extract(&provider),
        Err(e) => DrawingPipeline::failed_outcome(&file, &e),
    };
    let corroboration = references.corroborate(&outcome.diagnostics.source, &outcome.result);

    DocumentReport {
        file,
        outcome,
        corroboration,
        elapsed_ms: start.elapsed().as_millis(),
    }
}

fn print_document(report: &DocumentReport, verbose: bool) {
    let result = &report.outcome.result;
    if result.is_success() {
        println!("✓ ({} ms)", report.elapsed_ms);
    } else {
        println!("✗ {}", result.status);
    }

    if verbose {
        println!("        Title:           {}", result.title);
        println!("        Drawing number:  {}", result.drawing_number);
        println!("        Revision:        {} / {}", result.current_revision, result.latest_revision);
        println!("        Latest:          {} {}", result.latest_date, result.latest_reason);
        println!("        Phase:           {}", result.table_phase);
        if let Some(ref corroboration) = report.corroboration {
            for check in corroboration.discrepancies() {
                println!("        Reference:       {:?}", check);
            }
        }
    }
}

fn write_report(report: &BatchReport, path: &Path) -> drawing_oxide::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

fn main() {
    env_logger::init();

    let config = ExtractorConfig::from_args();

    let extraction_config = match config.config_file {
        Some(ref path) => match ExtractionConfig::from_json_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path.display(), e);
                std::process::exit(1);
            },
        },
        None => ExtractionConfig::default(),
    };

    let references = match config.reference_file {
        Some(ref path) => match ReferenceStore::from_json_file(path) {
            Ok(store) => {
                println!("Loaded {} reference records", store.len());
                store
            },
            Err(e) => {
                eprintln!("Error loading reference {}: {}", path.display(), e);
                std::process::exit(1);
            },
        },
        None => ReferenceStore::new(),
    };

    println!("Drawing Metadata Extractor");
    println!("Dump directory: {}", config.dump_dir.display());

    let dumps = discover_dumps(&config.dump_dir);
    if dumps.is_empty() {
        eprintln!("\nNo layout dumps found in {}", config.dump_dir.display());
        std::process::exit(1);
    }

    println!("Found {} layout dumps\n", dumps.len());

    let pipeline = DrawingPipeline::with_config(extraction_config);
    let mut documents = Vec::with_capacity(dumps.len());

    for (i, path) in dumps.iter().enumerate() {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        print!("[{}/{}] {} ... ", i + 1, dumps.len(), name);
        let _ = std::io::stdout().flush();

        let report = process_dump(&pipeline, &references, path);
        print_document(&report, config.verbose);
        documents.push(report);
    }

    let results: Vec<_> = documents.iter().map(|d| d.outcome.result.clone()).collect();
    let summary = BatchSummary::from_results(&results);

    println!("\n{}", "=".repeat(60));
    println!("DRAWING EXTRACTION SUMMARY");
    println!("{}", "=".repeat(60));
    print!("{}", summary);
    println!("{}", "=".repeat(60));

    let report = BatchReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        dump_dir: config.dump_dir.display().to_string(),
        summary,
        documents,
    };

    match write_report(&report, &config.output_file) {
        Ok(()) => println!("\n✓ Report saved to: {}", config.output_file.display()),
        Err(e) => {
            eprintln!("\n✗ Failed to write report: {}", e);
            std::process::exit(1);
        },
    }
}
