use clap::Parser;
use context_coach::cli::commands::{cmd_check, cmd_replay};
use context_coach::cli::config::{Cli, Commands, build_engine_settings, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.app_config.as_deref());

    match cli.command {
        Commands::Check { config: path } => {
            let clean = cmd_check(&path, cli.verbose)?;
            if !clean {
                std::process::exit(1);
            }
        }
        Commands::Replay {
            config: path,
            scenario,
            language,
            trace,
        } => {
            // Resolve settings: CLI > app config > defaults
            let settings = build_engine_settings(&config, language.as_deref(), trace.as_deref());
            cmd_replay(&path, &scenario, &settings, cli.verbose)?;
        }
    }

    Ok(())
}

fn log_filter(verbose: u8) -> tracing_subscriber::EnvFilter {
    let level = if let Ok(v) = std::env::var("RUST_LOG") {
        v
    } else if let Ok(v) = std::env::var("COACH_LOG_LEVEL") {
        v
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
        .to_string()
    };

    tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
}
