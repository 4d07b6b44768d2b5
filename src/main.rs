mod config;
mod corpus;
mod crosswalk;
mod datasets;
mod db;
mod error;
mod extractor;
mod glossary;
mod injector;
mod parser;
mod render;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use config::Settings;

#[derive(Parser)]
#[command(
    name = "resdac_docs",
    about = "Build RIF variable documentation from downloaded ResDAC pages"
)]
struct Cli {
    /// Repository root holding data/ and docs/ (default: .., or RESDAC_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every stage: tables, extract, glossary (default)
    Run,
    /// Rewrite the variable tables in each dataset page
    Tables,
    /// Parse variable pages into the variable table
    Extract,
    /// Render variables.md from the stored variable table
    Glossary,
    /// Summarise the stored variable table
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.root)?;
    info!("Corpus root: {}", settings.root().display());

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let rows = injector::run(&settings)?;
            let records = extractor::run(&settings)?;
            let sections = glossary::run(&settings)?;
            println!(
                "Wrote {} dataset table rows, extracted {} variables, rendered {} glossary sections.",
                rows,
                records.len(),
                sections
            );
            Ok(())
        }
        Commands::Tables => {
            let rows = injector::run(&settings)?;
            println!("Wrote {} table rows across {} dataset pages.", rows, datasets::DATASET_PAGES.len());
            Ok(())
        }
        Commands::Extract => {
            let records = extractor::run(&settings)?;
            println!("Extracted {} variables to {}", records.len(), settings.db_path().display());
            Ok(())
        }
        Commands::Glossary => {
            let sections = glossary::run(&settings)?;
            println!("Wrote {} sections to {}", sections, settings.glossary_markdown().display());
            Ok(())
        }
        Commands::Stats => print_stats(&settings),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn print_stats(settings: &Settings) -> anyhow::Result<()> {
    let conn = db::open_existing(&settings.db_path())?;
    let s = db::get_stats(&conn)?;
    if s.total == 0 {
        println!("No variables stored. Run 'extract' first.");
        return Ok(());
    }
    println!("Variables:   {}", s.total);
    println!("Long name:   {}", s.with_long_name);
    println!("Derivation:  {}", s.with_derivation);
    println!("Limitation:  {}", s.with_limitation);
    println!("Value codes: {}", s.with_values);

    let records = db::fetch_variables(&conn)?;
    println!("\n--- Contained in ---");
    for page in datasets::DATASET_PAGES {
        let n = records
            .iter()
            .filter(|r| r.in_files.iter().any(|f| f == page.title))
            .count();
        println!("  {:<32} {:>5}", page.title, n);
    }
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
