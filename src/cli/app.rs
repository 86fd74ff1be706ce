//! Interactive recorder session

use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, error};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::ports::{ConfigStore, MediaRecorder};
use crate::application::{RecorderController, TrimPipeline};
use crate::domain::config::AppConfig;
use crate::domain::recording::Duration;
use crate::infrastructure::{
    CpalRecorder, FileObjectStore, RodioPlayer, SymphoniaDecoder, SyntheticRecorder,
    SyntheticSignal, WavEncoder, XdgConfigStore,
};

use super::args::SessionOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Synthetic input: 10 seconds of A4 at 44.1 kHz mono
const SYNTHETIC_RATE: u32 = 44_100;
const SYNTHETIC_LENGTH: Duration = Duration::from_secs(10);
const SYNTHETIC_TONE_HZ: f32 = 440.0;

type Controller<R> = RecorderController<R, SymphoniaDecoder, WavEncoder, FileObjectStore, RodioPlayer>;

/// One line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    CountdownRecord,
    Record,
    Stop,
    Play,
    Download,
    Delete,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" | "countdown" => Ok(Self::CountdownRecord),
            "r" | "record" => Ok(Self::Record),
            "s" | "stop" => Ok(Self::Stop),
            "p" | "play" => Ok(Self::Play),
            "w" | "download" | "save" => Ok(Self::Download),
            "d" | "delete" => Ok(Self::Delete),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("Unknown command '{}' (h for help)", other)),
        }
    }
}

/// Run the interactive recorder until quit, end of input or a signal
pub async fn run_session(options: SessionOptions) -> ExitCode {
    let presenter = Presenter::new();

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let store = Arc::new(FileObjectStore::new());
    debug!("Object store at {}", store.dir().display());

    if options.synthetic {
        let recorder = SyntheticRecorder::new(SYNTHETIC_RATE, 1, SYNTHETIC_LENGTH)
            .with_signal(SyntheticSignal::Tone(SYNTHETIC_TONE_HZ));
        drive(build_controller(recorder, store, &options), &options, &presenter, &shutdown).await
    } else {
        let recorder = CpalRecorder::new();
        drive(build_controller(recorder, store, &options), &options, &presenter, &shutdown).await
    }
}

fn build_controller<R: MediaRecorder + 'static>(
    recorder: R,
    store: Arc<FileObjectStore>,
    options: &SessionOptions,
) -> Controller<R> {
    let pipeline = TrimPipeline::new(SymphoniaDecoder::new(), WavEncoder::new(), options.trim);
    RecorderController::new(recorder, pipeline, store, RodioPlayer::new())
}

async fn drive<R: MediaRecorder + 'static>(
    controller: Controller<R>,
    options: &SessionOptions,
    presenter: &Presenter,
    shutdown: &ShutdownSignal,
) -> ExitCode {
    let mut updates = controller.subscribe();
    let renderer = tokio::spawn(async move {
        let presenter = Presenter::new();
        while updates.changed().await.is_ok() {
            let view = updates.borrow_and_update().render();
            presenter.render(&view);
        }
    });

    presenter.info(&format!(
        "Recordings are trimmed to {}; countdown is {}s",
        controller.max_duration(),
        options.countdown
    ));
    presenter.session_help();
    presenter.render(&controller.snapshot().await.render());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.wait() => break,
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(message) => {
                presenter.warn(&message);
                continue;
            }
        };

        match command {
            SessionCommand::CountdownRecord => {
                controller
                    .start_countdown(i64::from(options.countdown.ticks()))
                    .await
            }
            SessionCommand::Record => controller.start_recording().await,
            SessionCommand::Stop => controller.stop_recording().await,
            SessionCommand::Play => {
                let controller = controller.clone();
                tokio::spawn(async move {
                    if let Err(e) = controller.play_artifact().await {
                        Presenter::new().error(&e.to_string());
                    }
                });
            }
            SessionCommand::Download => match controller.save_artifact(&options.output_dir).await
            {
                Ok(path) => presenter.success(&format!("Saved {}", path.display())),
                Err(e) => presenter.error(&e.to_string()),
            },
            SessionCommand::Delete => controller.delete_recording().await,
            SessionCommand::Help => presenter.session_help(),
            SessionCommand::Quit => break,
        }
    }

    controller.shutdown().await;
    renderer.abort();
    ExitCode::from(EXIT_SUCCESS)
}

/// Load and merge configuration: defaults < file < cli
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load_or_empty().await;

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_commands() {
        assert_eq!("c".parse(), Ok(SessionCommand::CountdownRecord));
        assert_eq!("record".parse(), Ok(SessionCommand::Record));
        assert_eq!(" S ".parse(), Ok(SessionCommand::Stop));
        assert_eq!("save".parse(), Ok(SessionCommand::Download));
        assert_eq!("?".parse(), Ok(SessionCommand::Help));
        assert_eq!("exit".parse(), Ok(SessionCommand::Quit));
    }

    #[test]
    fn rejects_unknown_commands() {
        let err = "x".parse::<SessionCommand>().unwrap_err();
        assert!(err.contains("Unknown command 'x'"));
    }
}
