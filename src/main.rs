use clap::Parser;
use erezept_extractor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("eRezept Extractor - AVD attribute extraction from FHIR-XML");
    println!("==========================================================");
    println!();
    println!("Extract AVD billing attributes from German eRezept FHIR-XML bundles,");
    println!("driven by an AVD specification table in CSV format.");
    println!();
    println!("USAGE:");
    println!("    erezept-extractor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    extract         Extract attributes from documents (prints JSON)");
    println!("    validate-spec   Check a specification table and print a report");
    println!("    profiles        List FHIR profiles referenced by a specification table");
    println!("    help            Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>  Configuration file (TOML)");
    println!("    -v, --verbose        Increase logging verbosity");
    println!("    -q, --quiet          Only show errors");
    println!("    -h, --help           Show help information");
    println!("    -V, --version        Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Extract one bundle:");
    println!("    erezept-extractor extract --spec avd.csv bundle.xml --pretty");
    println!();
    println!("    # Extract every bundle below a directory into a file:");
    println!("    erezept-extractor extract --spec avd.csv bundles/ -o outcomes.jsonl");
    println!();
    println!("    # Check the specification table:");
    println!("    erezept-extractor validate-spec --spec avd.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    erezept-extractor <COMMAND> --help");
}
