use bmi_core::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod chart;

#[derive(Parser)]
#[command(name = "bmi")]
#[command(about = "Body Mass Index tracker with history, export and trend charts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate BMI and save it to the history
    Add {
        /// Name the entry is recorded under
        #[arg(long)]
        name: String,

        /// Weight in kilograms
        #[arg(long, allow_hyphen_values = true)]
        weight: String,

        /// Height in metres
        #[arg(long, allow_hyphen_values = true)]
        height: String,
    },

    /// List stored entries, oldest first
    History {
        /// Only entries recorded under exactly this name
        #[arg(long)]
        name: Option<String>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the details of one entry
    Show {
        /// Entry id
        id: i64,
    },

    /// Export the whole history to CSV
    Export {
        /// Destination file (defaults to the configured export file in the data directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Plot one user's BMI over time
    Trend {
        /// Name to plot
        #[arg(long)]
        name: String,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    bmi_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Commands::Add {
            name,
            weight,
            height,
        } => cmd_add(&config, &name, &weight, &height),
        Commands::History { name, json } => cmd_history(&config, name.as_deref(), json),
        Commands::Show { id } => cmd_show(&config, id),
        Commands::Export { output } => cmd_export(&config, output),
        Commands::Trend { name } => cmd_trend(&config, &name),
    }
}

/// Open the history for reading. `None` means nothing has been recorded yet.
fn open_for_read(db_path: &Path) -> Result<Option<EntryStore>> {
    if !db_path.exists() {
        tracing::debug!("No history database at {:?}", db_path);
        return Ok(None);
    }
    Ok(Some(EntryStore::open_existing(db_path)?))
}

fn cmd_add(config: &Config, name: &str, weight: &str, height: &str) -> Result<()> {
    // Nothing is opened or created for rejected input
    let measurement = validate(name, weight, height)?;

    std::fs::create_dir_all(&config.data.data_dir)?;
    let mut store = EntryStore::open(config.data.database_path())?;
    let entry = store.create_from(&measurement)?;
    store.close()?;

    println!("✓ Entry saved for {} (#{})", entry.name, entry.id);
    println!("  BMI: {}", format_2dp(entry.bmi));
    println!("  Category: {}", entry.category);
    Ok(())
}

fn cmd_history(config: &Config, name: Option<&str>, json: bool) -> Result<()> {
    let entries = match open_for_read(&config.data.database_path())? {
        Some(store) => match name {
            Some(name) => store.list_for(name)?,
            None => store.list_all()?,
        },
        None => Vec::new(),
    };

    if json {
        let out = serde_json::to_string_pretty(&entries)
            .map_err(|e| Error::Other(format!("Failed to serialize history: {}", e)))?;
        println!("{}", out);
        return Ok(());
    }

    if entries.is_empty() {
        match name {
            Some(name) => println!("No entries found for {}", name),
            None => println!("No history recorded yet."),
        }
        return Ok(());
    }

    for entry in &entries {
        println!("#{:<4} {}", entry.id, entry);
    }
    Ok(())
}

fn cmd_show(config: &Config, id: i64) -> Result<()> {
    let entry = match open_for_read(&config.data.database_path())? {
        Some(store) => store.get(id)?,
        None => None,
    };
    let entry = entry.ok_or_else(|| Error::Other(format!("No entry with id {}", id)))?;

    println!("Entry #{}", entry.id);
    println!("  Name:     {}", entry.name);
    println!("  Weight:   {} kg", format_2dp(entry.weight_kg));
    println!("  Height:   {} m", format_2dp(entry.height_m));
    println!("  BMI:      {}", format_2dp(entry.bmi));
    println!("  Category: {}", entry.category);
    println!("  Recorded: {}", entry.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    Ok(())
}

fn cmd_export(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let entries = match open_for_read(&config.data.database_path())? {
        Some(store) => store.list_all()?,
        None => Vec::new(),
    };

    if entries.is_empty() {
        println!("No history to export");
        return Ok(());
    }

    let destination =
        output.unwrap_or_else(|| config.data.data_dir.join(&config.export.default_file));
    let count = export(&entries, &destination)?;

    println!("✓ Exported {} entries", count);
    println!("  CSV: {}", destination.display());
    Ok(())
}

fn cmd_trend(config: &Config, name: &str) -> Result<()> {
    let points = match open_for_read(&config.data.database_path())? {
        Some(store) => store.trend_for(name)?,
        None => Vec::new(),
    };

    if points.is_empty() {
        println!("No entries found for {}", name);
        return Ok(());
    }

    println!("BMI Trend - {}", name);
    println!();
    print!(
        "{}",
        chart::render(&points, config.chart.width, config.chart.height)
    );
    Ok(())
}
