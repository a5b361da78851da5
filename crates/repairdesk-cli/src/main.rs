use clap::{CommandFactory, Parser, Subcommand};
use repairdesk_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "repairdesk-cli", version, about = "RepairDesk appointment slots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Weekly business hours
    Hours {
        #[command(subcommand)]
        action: commands::hours::HoursAction,
    },
    /// Holidays and special opening hours
    Exception {
        #[command(subcommand)]
        action: commands::exception::ExceptionAction,
    },
    /// Slot generation and inventory
    Slots {
        #[command(subcommand)]
        action: commands::slots::SlotsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Log to stderr so that stdout stays parseable. `RUST_LOG` wins over the
/// configured level.
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();

    // Read once, before logging exists; a load failure is reported below.
    let loaded = Config::load();
    init_tracing(loaded.as_ref().map_or("info", |c| c.logging.level.as_str()));
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("falling back to default config: {e}");
        Config::default()
    });

    let result = match cli.command {
        Commands::Hours { action } => commands::hours::run(action, &config),
        Commands::Exception { action } => commands::exception::run(action, &config),
        Commands::Slots { action } => commands::slots::run(action, &config),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "repairdesk-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
