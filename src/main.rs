//! VoiceRecord CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_record::cli::{
    app::{load_merged_config, run_session, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{init_logging, Cli, Commands, SessionOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
    trim_cmd::{run_trim, TrimOptions},
};
use voice_record::domain::config::AppConfig;
use voice_record::domain::recording::{Countdown, Duration};
use voice_record::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);
    let mut presenter = Presenter::new();

    // Build CLI config from args
    let cli_config = AppConfig {
        countdown: cli.countdown,
        trim: cli.trim.clone(),
        output_dir: cli.output_dir.clone(),
    };

    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Some(Commands::Trim {
            input,
            output,
            trim,
        }) => {
            let config = load_merged_config(AppConfig {
                trim: trim.or(cli_config.trim),
                ..cli_config
            })
            .await;
            let trim = match parse_trim(&config, &presenter) {
                Ok(trim) => trim,
                Err(code) => return code,
            };

            let options = TrimOptions {
                input,
                output,
                trim,
            };
            match run_trim(options, &mut presenter).await {
                Ok(path) => {
                    presenter.output(&path.to_string_lossy());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
        None => {
            let config = load_merged_config(cli_config).await;
            let trim = match parse_trim(&config, &presenter) {
                Ok(trim) => trim,
                Err(code) => return code,
            };
            let countdown = match config.countdown {
                Some(n) => match Countdown::new(n.into()) {
                    Some(countdown) => countdown,
                    None => {
                        presenter.error("Invalid countdown: must be at least 1 second");
                        return ExitCode::from(EXIT_USAGE_ERROR);
                    }
                },
                None => Countdown::default(),
            };

            let options = SessionOptions {
                countdown,
                trim,
                output_dir: config.output_dir_or_default(),
                synthetic: cli.synthetic,
            };
            run_session(options).await
        }
    }
}

/// Parse the merged trim length, mapping failure to a usage error
fn parse_trim(config: &AppConfig, presenter: &Presenter) -> Result<Duration, ExitCode> {
    match config.trim.as_ref() {
        Some(s) => s.parse::<Duration>().map_err(|e| {
            presenter.error(&format!("Invalid trim: {}", e));
            ExitCode::from(EXIT_USAGE_ERROR)
        }),
        None => Ok(Duration::default_trim()),
    }
}
