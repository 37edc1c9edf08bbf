use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod format;

/// imagetag - Container Image Tag Lister
///
/// Lists the tags of an image in a Docker Registry v2 compatible registry,
/// newest version first.
#[derive(Parser, Debug)]
#[command(name = "imagetag")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    color: String,

    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the tags of an image
    Tags {
        /// Image name (repository), e.g. library/alpine
        image: String,
        /// Registry URL (defaults to the configured registry)
        #[arg(short, long, env = "IMAGETAG_REGISTRY_URL")]
        registry: Option<String>,
        /// Only keep tags matching this regular expression in full
        #[arg(long)]
        filter: Option<String>,
        /// List the oldest version first
        #[arg(long)]
        reverse: bool,
        /// Username for registry authentication
        #[arg(short, long, env = "IMAGETAG_USERNAME")]
        username: Option<String>,
        /// Password for registry authentication
        #[arg(
            short,
            long,
            env = "IMAGETAG_PASSWORD",
            hide_env_values = true,
            conflicts_with = "password_stdin"
        )]
        password: Option<String>,
        /// Read the password from stdin
        #[arg(long)]
        password_stdin: bool,
        /// Output format: pretty, json, yaml
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Show only tag names
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show the authentication scheme a registry asks for
    Challenge {
        /// Registry URL (defaults to the configured registry)
        #[arg(short, long, env = "IMAGETAG_REGISTRY_URL")]
        registry: Option<String>,
        /// Output format: pretty, json, yaml
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Display version information
    Version,
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Completion and version need no configuration
    match &cli.command {
        Commands::Version => {
            commands::version::print_version();
            return;
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            return;
        }
        _ => {}
    }

    // Build context with precedence: defaults > config file > env vars > CLI flags
    let color = format::ColorChoice::from(cli.color.as_str());
    let ctx = match context::AppContext::build(color, cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Tags {
            image,
            registry,
            filter,
            reverse,
            username,
            password,
            password_stdin,
            format,
            quiet,
        } => {
            let opts = commands::tags::TagsOptions {
                registry,
                filter,
                reverse,
                username,
                password,
                password_stdin,
                format: format::OutputFormat::from(format.as_str()),
                quiet,
                ..commands::tags::TagsOptions::new(image)
            };
            commands::tags::handle_tags(&ctx, &opts);
        }
        Commands::Challenge { registry, format } => {
            let fmt = format::OutputFormat::from(format.as_str());
            commands::challenge::handle_challenge(&ctx, registry.as_deref(), fmt);
        }
        Commands::Version | Commands::Completion { .. } => {}
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
