use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use xlsx2json::{DateFormat, ExporterBuilder, RhaiEvaluator};

#[derive(Parser, Debug)]
#[command(name = "xlsx2json")]
#[command(version, about = "Export the rows of a spreadsheet as JSON objects")]
struct Args {
    /// Workbook to read (xlsx, xlsm, xlsb, xls or ods)
    input: PathBuf,

    /// Sheet index, starting at 0
    #[arg(short, long, default_value_t = 0)]
    sheet: usize,

    /// Script file defining the transform function
    #[arg(short, long, value_name = "FILE")]
    js: Option<PathBuf>,

    /// Name of the transform function applied to every row
    #[arg(short, long, value_name = "NAME", requires = "js")]
    callback: Option<String>,

    /// Print the sheet names, one per line
    #[arg(short = 'N', long)]
    sheet_names: bool,

    /// Print the number of sheets
    #[arg(short = 'C', long, conflicts_with = "sheet_names")]
    count: bool,

    /// strftime format for date cells (default: ISO 8601)
    #[arg(long, value_name = "FMT")]
    date_format: Option<String>,

    /// Operation budget for a single transform call
    #[arg(long, value_name = "N")]
    max_operations: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xlsx2json=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xlsx2json=warn"))
    };

    // stdoutはJSON出力専用
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);
    tracing::debug!("CLI args: {:?}", args);

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xlsx2json: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ExporterBuilder::new().with_sheet_index(args.sheet);
    if let Some(ref callback) = args.callback {
        builder = builder.with_transform(callback.as_str());
    }
    if let Some(ref format) = args.date_format {
        builder = builder.with_date_format(DateFormat::Custom(format.clone()));
    }
    let exporter = builder.build()?;

    if args.sheet_names || args.count {
        let names = exporter.sheet_names(&args.input)?;
        if args.count {
            println!("{}", names.len());
        } else {
            for name in names {
                println!("{}", name);
            }
        }
        return Ok(());
    }

    let mut evaluator = match args.js {
        Some(ref path) => {
            let script = std::fs::read_to_string(path)
                .map_err(|e| format!("Can't read {}: {}", path.display(), e))?;
            RhaiEvaluator::new(&script)?
        }
        None => RhaiEvaluator::empty(),
    };
    if let Some(operations) = args.max_operations {
        evaluator = evaluator.with_max_operations(operations);
    }

    let objects = exporter.export(&mut evaluator, &args.input)?;
    println!("[{}]", objects.join(","));
    Ok(())
}
