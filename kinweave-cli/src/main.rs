use clap::Parser;
use kinweave::logging::{log_level_to_level, parse_log_level};
use kinweave_cli::commands::Commands;
use kinweave_cli::context::KinweaveCliContext;
use kinweave_cli::handlers;
use kinweave_cli::output::{output_error, output_error_json};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "kinweave-cli")]
#[command(about = "Inspect relationship kinds, inverses and conflicts", long_about = None)]
#[command(version = kinweave::VERSION)]
struct Cli {
    /// Configuration file (replaces the default file search)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Relationship definitions file (TOML, YAML or JSON)
    #[arg(long, short, global = true)]
    definitions: Option<PathBuf>,

    /// Output format (table, json) - use json for tool integration
    #[arg(long, short, default_value = "table", global = true)]
    output: String,

    /// Log level (trace, debug, info, warn, error); overrides --verbose and --quiet
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Verbose output (debug level logging)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Quiet mode (only errors are logged)
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli_args = Cli::parse();

    // Priority: env var > cli arg > default
    let output_format = std::env::var("KINWEAVE_OUTPUT").unwrap_or_else(|_| cli_args.output.clone());

    let log_level = match cli_args.log_level.as_deref().map(parse_log_level) {
        Some(Ok(level)) => log_level_to_level(level),
        Some(Err(e)) => {
            output_error(&e.to_string(), &output_format);
            std::process::exit(2);
        }
        None if cli_args.quiet => Level::ERROR,
        None if cli_args.verbose => Level::DEBUG,
        None => Level::WARN,
    };

    // Logs go to stderr so stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .try_init();

    if matches!(cli_args.command, Commands::Version) {
        println!("kinweave CLI v{}", kinweave::VERSION);
        return;
    }

    let context = match KinweaveCliContext::new(cli_args.config, cli_args.definitions) {
        Ok(context) => context,
        Err(e) => {
            output_error_json(&e, &output_format);
            std::process::exit(1);
        }
    };
    let catalog = context.engine.catalog();

    let result = match cli_args.command {
        Commands::Version => Ok(()),
        Commands::Allowed => {
            handlers::handle_allowed(catalog, &output_format);
            Ok(())
        }
        Commands::Inverses => {
            handlers::handle_inverses(catalog, &output_format);
            Ok(())
        }
        Commands::Conflicts(args) => {
            handlers::handle_conflicts(catalog, &args.a, &args.b, &output_format);
            Ok(())
        }
        Commands::Report => {
            handlers::handle_report(catalog, &output_format);
            Ok(())
        }
        Commands::Check(args) => handlers::handle_check(catalog, &args.kind, &output_format),
    };

    if let Err(e) = result {
        output_error_json(&e, &output_format);
        std::process::exit(1);
    }
}
