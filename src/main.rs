use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ragsum::cli::{self, Args, Command, SettingsAction};
use ragsum::{AppConfig, RagsumError};

const EXIT_FAILURE: i32 = 1;
const EXIT_INVALID_INPUT: i32 = 2;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "ragsum=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        let code = match e.downcast_ref::<RagsumError>() {
            Some(err) if err.is_user_error() => EXIT_INVALID_INPUT,
            _ => EXIT_FAILURE,
        };
        std::process::exit(code);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = AppConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Run(run_args) => cli::run_summarize(run_args, &config).await,
        Command::Settings { action } => match action {
            SettingsAction::Show { name, json } => {
                cli::run_settings_show(&name, json, &config).await
            }
            SettingsAction::Reset { name } => cli::run_settings_reset(&name, &config).await,
            SettingsAction::List => cli::run_settings_list(&config).await,
        },
    }
}
