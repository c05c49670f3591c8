//! Traffic CLI - run the traffic transformations on CSV files
//!
//! ```bash
//! traffic car-matrix dataset-1.csv -o matrix.csv   # Pivot car values
//! traffic type-count dataset-1.csv                 # low / medium / high counts
//! traffic bus-indexes dataset-1.csv                # Rows with bus > 2x mean
//! traffic filter-routes dataset-1.csv              # Routes with mean truck > 7
//! traffic multiply-matrix matrix.csv               # Rescale a matrix CSV
//! traffic time-check dataset-2.csv                 # Weekly coverage flags
//! traffic run-all dataset-1.csv dataset-2.csv      # Everything, one JSON report
//! traffic default-config                           # Print default thresholds
//! ```
//!
//! Log verbosity comes from `TRAFFIC_LOG` (also read from `.env`).

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use traffic::{
    generate_car_matrix, load_matrix, load_table, logs, run_all_files, LabeledMatrix,
    TransformConfig,
};

#[derive(Parser)]
#[command(name = "traffic")]
#[command(about = "Transform vehicle-traffic CSV records", long_about = None)]
struct Cli {
    /// JSON file overriding the default thresholds
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the car matrix (CSV output)
    CarMatrix {
        /// Traffic CSV with id_1, id_2, car
        input: PathBuf,

        /// Also rescale the matrix before writing it
        #[arg(long)]
        rescale: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Count car values per type
    TypeCount {
        /// Traffic CSV with a car column
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List indexes of rows whose bus value is an outlier
    BusIndexes {
        /// Traffic CSV with a bus column
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List routes whose mean truck value exceeds the threshold
    FilterRoutes {
        /// Traffic CSV with route and truck columns
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rescale every cell of a matrix CSV
    MultiplyMatrix {
        /// Matrix CSV (first column = row labels)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Flag (id, id_2) pairs that do not cover a full week
    TimeCheck {
        /// Interval CSV with id, id_2, startDay, startTime, endDay, endTime
        input: PathBuf,

        /// Output per-pair details instead of flags
        #[arg(long)]
        details: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run every transformation and write one JSON report
    RunAll {
        /// Traffic CSV (id_1, id_2, route, car, bus, truck)
        traffic: PathBuf,

        /// Interval CSV (id, id_2, startDay, startTime, endDay, endTime)
        intervals: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the default configuration as JSON
    DefaultConfig,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.quiet {
        logs::init(LevelFilter::WARN);
    } else {
        logs::init_from_env();
    }

    let result = load_config(cli.config.as_deref()).and_then(|config| run(cli.command, &config));

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn load_config(path: Option<&Path>) -> Result<TransformConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            eprintln!("⚙️  Config: {}", p.display());
            Ok(TransformConfig::from_file(p)?)
        }
        None => Ok(TransformConfig::default()),
    }
}

fn run(command: Commands, config: &TransformConfig) -> CliResult {
    match command {
        Commands::CarMatrix { input, rescale, output } => {
            cmd_car_matrix(&input, rescale, config, output.as_deref())
        }

        Commands::TypeCount { input, output } => {
            let table = read_table(&input)?;
            write_json(&config.car_buckets.count(&table)?, output.as_deref())
        }

        Commands::BusIndexes { input, output } => {
            let table = read_table(&input)?;
            let indexes = config.outliers.find(&table)?;
            eprintln!("🚌 {} outlier rows", indexes.len());
            write_json(&indexes, output.as_deref())
        }

        Commands::FilterRoutes { input, output } => {
            let table = read_table(&input)?;
            let routes = config.routes.apply(&table)?;
            eprintln!("🚚 {} routes", routes.len());
            write_json(&routes, output.as_deref())
        }

        Commands::MultiplyMatrix { input, output } => {
            eprintln!("📄 Matrix: {}", input.display());
            let matrix = load_matrix(&input)?;
            let (rows, cols) = matrix.shape();
            eprintln!("   {}x{} cells", rows, cols);
            write_matrix(&config.rescale.apply(&matrix), output.as_deref())
        }

        Commands::TimeCheck { input, details, output } => {
            let table = read_table(&input)?;
            if details {
                write_json(&config.coverage.check(&table)?, output.as_deref())
            } else {
                write_json(&config.coverage.flags(&table)?, output.as_deref())
            }
        }

        Commands::RunAll { traffic, intervals, output } => {
            let report = run_all_files(&traffic, &intervals, config)?;
            write_json(&report, output.as_deref())?;
            eprintln!("\n✨ Done!");
            Ok(())
        }

        Commands::DefaultConfig => {
            println!("{}", TransformConfig::default().to_json()?);
            Ok(())
        }
    }
}

fn cmd_car_matrix(
    input: &Path,
    rescale: bool,
    config: &TransformConfig,
    output: Option<&Path>,
) -> CliResult {
    let table = read_table(input)?;
    let matrix = generate_car_matrix(&table)?;
    let (rows, cols) = matrix.shape();
    eprintln!("🧮 {}x{} car matrix", rows, cols);

    if rescale {
        write_matrix(&config.rescale.apply(&matrix), output)
    } else {
        write_matrix(&matrix, output)
    }
}

fn read_table(input: &Path) -> Result<traffic::Table, Box<dyn std::error::Error>> {
    eprintln!("📄 Reading: {}", input.display());
    let parsed = load_table(input)?;
    eprintln!("   Encoding: {}", parsed.encoding);
    eprintln!(
        "   Delimiter: '{}'",
        traffic::transform::pipeline::format_delimiter(parsed.delimiter)
    );
    eprintln!("   Columns: {}", parsed.table.headers().join(", "));
    eprintln!("   Rows: {}", parsed.table.len());
    Ok(parsed.table)
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> CliResult {
    let json = serde_json::to_string_pretty(value)?;
    write_output(&json, output)
}

fn write_matrix(matrix: &LabeledMatrix, output: Option<&Path>) -> CliResult {
    let csv = matrix.to_csv_string()?;
    write_output(csv.trim_end(), output)
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult {
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
