use clap::Parser;
use cu_acreage::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    if let Err(error) = commands::shared::setup_logging(&args) {
        eprintln!("Failed to initialize logging: {}", error);
        process::exit(1);
    }

    match commands::run(&args) {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("cu-acreage - Crop pattern and irrigation practice file tool");
    println!("===========================================================");
    println!();
    println!("Reads crop pattern (.cds) and irrigation practice (.ipy) time series");
    println!("files in any of their layouts, checks them, converts between layouts");
    println!("and reconciles irrigation acreage.");
    println!();
    println!("USAGE:");
    println!("    cu-acreage <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    detect      Print the layout, period and header form of files");
    println!("    check       Read files and report consistency problems");
    println!("    convert     Rewrite a file in another layout");
    println!("    reconcile   Make irrigation acreage totals match their parts");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    cu-acreage detect data/basin.cds data/basin.ipy");
    println!("    cu-acreage check --dir data");
    println!("    cu-acreage convert basin.cds basin_v10.cds --to 10 --start 1950 --end 2005");
    println!("    cu-acreage reconcile basin.ipy basin_fixed.ipy --gw-only 0100501,0100502");
    println!();
    println!("For detailed help on any command, use:");
    println!("    cu-acreage <COMMAND> --help");
}
