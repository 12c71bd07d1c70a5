// Specification extraction from equipment listings

use clap::{Parser, ValueEnum};
use log::info;
use std::io::Read;
use std::path::PathBuf;
use techspec::{CorrectionDictionary, ExtractionConfig, SpecError, SpecExtractor, SpecificationMapping};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Report,
}

/// Extract technical specifications from listing text
#[derive(Parser, Debug)]
#[command(name = "techspec", version)]
struct Args {
    /// Text file to read; stdin when omitted
    #[arg(value_name = "PATH")]
    input: Option<PathBuf>,

    /// Correction dictionary (JSON) replacing the built-in one
    #[arg(short, long, value_name = "PATH")]
    dictionary: Option<PathBuf>,

    /// Extraction thresholds (JSON)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn print_detailed_report(mapping: &SpecificationMapping) {
    println!("\n===============================================");
    println!("      TECHNICAL SPECIFICATION REPORT");
    println!("===============================================\n");

    if mapping.is_empty() {
        println!("No specifications found.");
        return;
    }

    for (category, specs) in mapping {
        println!("{}:", category.to_uppercase());
        for (key, value) in specs {
            println!("  {}: {}", key, value);
        }
        println!();
    }

    let total: usize = mapping.values().map(|specs| specs.len()).sum();
    println!(
        "Specifications found: {} in {} categories",
        total,
        mapping.len()
    );
}

fn read_input(input: Option<&PathBuf>) -> Result<String, SpecError> {
    match input {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn run(args: &Args) -> Result<(), SpecError> {
    let dictionary = match &args.dictionary {
        Some(path) => CorrectionDictionary::from_file(path)?,
        None => CorrectionDictionary::builtin(),
    };
    let config = match &args.config {
        Some(path) => ExtractionConfig::from_file(path)?,
        None => ExtractionConfig::default(),
    };
    let extractor = SpecExtractor::with_config(dictionary, config)?;

    let text = read_input(args.input.as_ref())?;
    info!("Read {} characters of input", text.chars().count());
    let mapping = extractor.extract(&text);

    match args.format {
        OutputFormat::Json if args.pretty => println!("{}", serde_json::to_string_pretty(&mapping)?),
        OutputFormat::Json => println!("{}", serde_json::to_string(&mapping)?),
        OutputFormat::Report => print_detailed_report(&mapping),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("Error extracting specifications: {}", err);
        std::process::exit(1);
    }
}
