//! Instagram Archiver - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use instagram_archiver::{
    api::InstagramClient,
    cli::Args,
    config::{validate_config, Config},
    download::{archive_profile, FetchOutcome},
    error::{exit_codes, Result},
    output::{
        create_spinner, print_banner, print_config_summary, print_error, print_info, print_success,
        print_summary, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            print_error(&format!("{}", e));
            return ExitCode::from(exit_codes::CONFIG_ERROR as u8);
        }
    };

    match run(&config).await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            if e.is_config() {
                ExitCode::from(exit_codes::CONFIG_ERROR as u8)
            } else {
                ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8)
            }
        }
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config = Config::load(&args.config_path())?;
    validate_config(&config)?;
    Ok(config)
}

async fn run(config: &Config) -> Result<()> {
    print_config_summary(
        &config.username,
        config.timeout,
        &config.save_directory().display().to_string(),
    );

    print_info("Connecting to Instagram...");
    let client = InstagramClient::new(&config.user_agent)?;

    let spinner = create_spinner(&format!("Fetching {}", config.username));
    let report = archive_profile(&client, config, &spinner).await;
    spinner.finish_and_clear();
    let report = report?;

    match &report.outcome {
        FetchOutcome::Completed => {}
        FetchOutcome::TimedOut(limit) => print_warning(&format!(
            "Operation timed out after {} seconds. Saving partial data.",
            limit.as_secs()
        )),
        FetchOutcome::Failed(e) => print_error(&format!("An error occurred: {}", e)),
    }

    if let Ok(persisted) = &report.persisted {
        print_success(&format!(
            "Cleanup completed. Data saved in {}",
            persisted.profile_dir.display()
        ));
    }
    print_summary(&report.aggregate);

    report.persisted.map(|_| ())
}
