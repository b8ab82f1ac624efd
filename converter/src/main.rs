//! Matrixify CLI - Convert vendor product sheets to Matrixify import sheets
//!
//! # Main Command
//!
//! ```bash
//! matrixify convert                       # Defaults from ./read-from to ./write-to
//! matrixify convert --source in.csv --output out.xlsx --report run.json
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! matrixify parse products.xlsx           # Dump source rows as JSON
//! matrixify columns template.xlsx         # Show the resolved output columns
//! matrixify handle "Blue Mug" Large       # Preview a handle
//! matrixify validate matrixify_ready.xlsx # Validate a written output sheet
//! ```

use clap::{Parser, Subcommand};
use matrixify::config::{
    DEFAULT_OUTPUT, DEFAULT_SOURCE, DEFAULT_TEMPLATE, ENV_OUTPUT, ENV_SOURCE, ENV_TEMPLATE,
};
use matrixify::logs::LOGGER;
use matrixify::{
    convert_files, format_delimiter, generate_handle, parse_sheet_file, read_headers,
    validate_sheet, ConvertOptions, TargetLayout,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "matrixify")]
#[command(about = "Convert vendor product sheets to Matrixify bulk-import sheets", long_about = None)]
struct Cli {
    /// Silence progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full conversion: vendor sheet + template → Matrixify sheet
    Convert {
        /// Vendor product sheet (.xlsx, .xls, .ods, .csv, ...)
        #[arg(short, long, env = ENV_SOURCE, default_value = DEFAULT_SOURCE)]
        source: PathBuf,

        /// Matrixify template sheet (header row only)
        #[arg(short, long, env = ENV_TEMPLATE, default_value = DEFAULT_TEMPLATE)]
        template: PathBuf,

        /// Output sheet (.xlsx or .csv)
        #[arg(short, long, env = ENV_OUTPUT, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// JSON file overriding source column names
        #[arg(short, long)]
        columns: Option<PathBuf>,

        /// Write a JSON run report
        #[arg(long)]
        report: Option<PathBuf>,

        /// Skip output row validation
        #[arg(long)]
        no_validate: bool,
    },

    /// Parse a source sheet and output its rows as JSON
    Parse {
        /// Input sheet
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the output columns resolved from a template
    Columns {
        /// Matrixify template sheet
        template: PathBuf,
    },

    /// Preview the handle for a title and optional variant label
    Handle {
        title: String,
        variant: Option<String>,
    },

    /// Validate an already written Matrixify sheet
    Validate {
        /// Output sheet to check
        input: PathBuf,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);

    let result = match cli.command {
        Commands::Convert {
            source,
            template,
            output,
            columns,
            report,
            no_validate,
        } => cmd_convert(ConvertOptions {
            source,
            template,
            output,
            columns,
            report,
            skip_validation: no_validate,
        }),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Columns { template } => cmd_columns(&template),

        Commands::Handle { title, variant } => {
            println!("{}", generate_handle(&title, variant.as_deref().unwrap_or("")));
            Ok(())
        }

        Commands::Validate { input } => cmd_validate(&input),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(options: ConvertOptions) -> Result<(), Box<dyn std::error::Error>> {
    convert_files(&options)?;
    if !LOGGER.is_quiet() {
        eprintln!("\n✨ Done!");
    }
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing: {}", input.display());

    let result = parse_sheet_file(input)?;

    if let Some(ref encoding) = result.encoding {
        eprintln!("   Encoding: {}", encoding);
    }
    if let Some(delimiter) = result.delimiter {
        eprintln!("   Delimiter: '{}'", format_delimiter(delimiter));
    }
    eprintln!("   Columns: {}", result.table.headers.join(", "));
    eprintln!("✅ Parsed {} rows", result.table.rows.len());

    let rows: Vec<Value> = result.table.rows.iter().map(|r| r.to_json()).collect();
    let json = serde_json::to_string_pretty(&rows)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_columns(template: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let headers = read_headers(template)?;
    let layout = TargetLayout::from_template(&headers);

    eprintln!(
        "📋 {} template columns, {} in output:",
        headers.len(),
        layout.len()
    );
    for (i, column) in layout.columns().iter().enumerate() {
        let marker = if headers.contains(column) { "" } else { "  (added)" };
        println!("{:>3}  {}{}", i + 1, column, marker);
    }
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let parsed = parse_sheet_file(input)?;
    let stats = validate_sheet(&parsed.table);

    for (index, errors) in stats.errors.iter().take(5) {
        eprintln!("\n❌ Row {} invalid:", index + 1);
        for err in errors.iter().take(3) {
            eprintln!("   - {}", err);
        }
    }

    eprintln!("\n📊 Results: {} valid, {} invalid", stats.valid, stats.invalid);

    if stats.invalid > 0 {
        std::process::exit(1);
    }

    Ok(())
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
