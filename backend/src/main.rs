//! Pubtable CLI - enrich publication metadata CSV files
//!
//! ```bash
//! pubtable serve                     # Start HTTP server (port 8000)
//! pubtable enrich papers.csv         # Write processed2_papers.csv
//! pubtable parse papers.csv          # Dump the loaded table as JSON
//! pubtable sample                    # Write data/sample_data.csv
//! pubtable journals                  # List known journal codes
//! ```

use clap::{Parser, Subcommand};
use pubtable::{
    journals_description, parse_file_auto, process_bytes, processed_file_name, write_sample,
    AppConfig,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pubtable")]
#[command(about = "Enrich publication metadata from DOIs and sort it into citation order", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich a CSV file and write the result
    Enrich {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: processed2_<input> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a CSV file and output JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the sample CSV
    Sample {
        /// Destination path
        #[arg(default_value = pubtable::sample::DEFAULT_SAMPLE_PATH)]
        path: PathBuf,
    },

    /// Show the journal code table
    Journals,

    /// Start HTTP server
    Serve {
        /// Address to bind (overrides PUBTABLE_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PUBTABLE_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory for uploads (overrides PUBTABLE_TEMP_DIR)
        #[arg(long)]
        temp_dir: Option<PathBuf>,

        /// Root for `file_path` parameters (overrides PUBTABLE_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Enrich { input, output } => cmd_enrich(&input, output.as_deref()),
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
        Commands::Sample { path } => cmd_sample(&path),
        Commands::Journals => cmd_journals(),
        Commands::Serve {
            host,
            port,
            temp_dir,
            data_dir,
        } => cmd_serve(host, port, temp_dir, data_dir).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_enrich(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let bytes = fs::read(input)?;
    let result = process_bytes(&bytes)?;

    match output {
        Some(p) => {
            fs::write(p, &result.csv)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            let p = default_output_path(input);
            fs::write(&p, &result.csv)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
    }

    eprintln!("\n✨ Done! {} rows", result.summary.rows);
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output.csv");
    input.with_file_name(processed_file_name(name))
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_file_auto(input)?;
    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.delimiter));
    eprintln!("   Columns: {}", result.headers().join(", "));
    eprintln!("✅ Parsed {} records", result.table.len());

    let json = serde_json::to_string_pretty(&result.table.to_json())?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_sample(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    write_sample(path)?;
    eprintln!("✅ CSV file created at {}", path.display());
    Ok(())
}

fn cmd_journals() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", journals_description());
    Ok(())
}

async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    temp_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(dir) = temp_dir {
        config.temp_dir = dir;
    }
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }

    pubtable::server::start_server(config).await
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
