//! Offline trim command: run the capture pipeline over a file on disk

use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::application::{PipelineError, TrimPipeline};
use crate::domain::audio::{AudioData, AudioMimeType};
use crate::domain::recording::Duration;
use crate::infrastructure::{SymphoniaDecoder, WavEncoder};

use super::presenter::Presenter;

/// Errors from the trim command
#[derive(Debug, Error)]
pub enum TrimCommandError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Parsed trim command options
#[derive(Debug, Clone)]
pub struct TrimOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub trim: Duration,
}

/// Where the trimmed file goes when no output is given.
///
/// `<stem>.wav` beside the input, or `<stem>-trimmed.wav` if that is the input itself.
pub fn default_output_path(input: &Path) -> PathBuf {
    let candidate = input.with_extension("wav");
    if candidate != input {
        return candidate;
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recording".to_string());
    input.with_file_name(format!("{}-trimmed.wav", stem))
}

/// Trim `options.input` and write the WAV result, returning its path
pub async fn run_trim(
    options: TrimOptions,
    presenter: &mut Presenter,
) -> Result<PathBuf, TrimCommandError> {
    let bytes = tokio::fs::read(&options.input)
        .await
        .map_err(|source| TrimCommandError::Read {
            path: options.input.clone(),
            source,
        })?;

    let mime_type = options
        .input
        .extension()
        .and_then(|ext| AudioMimeType::from_extension(&ext.to_string_lossy()))
        .unwrap_or_default();
    let capture = AudioData::new(bytes, mime_type);
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&options.input));

    presenter.start_spinner(&format!("Trimming to {}...", options.trim));
    let pipeline = TrimPipeline::new(SymphoniaDecoder::new(), WavEncoder::new(), options.trim);
    let outcome = match pipeline.process(&capture).await {
        Ok(outcome) => outcome,
        Err(e) => {
            presenter.spinner_fail("Trim failed");
            return Err(e.into());
        }
    };

    if let Err(source) = tokio::fs::write(&output, outcome.audio.data()).await {
        presenter.spinner_fail("Trim failed");
        return Err(TrimCommandError::Write {
            path: output,
            source,
        });
    }

    presenter.spinner_success(&format!(
        "Trimmed {:.2}s to {:.2}s ({})",
        outcome.original_duration.as_secs_f64(),
        outcome.trimmed.duration_secs(),
        outcome.audio.human_readable_size()
    ));
    info!("Wrote {}", output.display());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::SampleBuffer;

    #[test]
    fn default_output_replaces_extension() {
        assert_eq!(
            default_output_path(Path::new("/tmp/take.flac")),
            PathBuf::from("/tmp/take.wav")
        );
    }

    #[test]
    fn default_output_never_overwrites_input() {
        assert_eq!(
            default_output_path(Path::new("/tmp/take.wav")),
            PathBuf::from("/tmp/take-trimmed.wav")
        );
    }

    #[tokio::test]
    async fn trims_wav_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("long.wav");
        let buffer = SampleBuffer::silence(8_000, 1, 8_000 * 7).unwrap();
        std::fs::write(&input, WavEncoder::encode_blocking(&buffer).unwrap()).unwrap();

        let mut presenter = Presenter::new();
        let output = run_trim(
            TrimOptions {
                input: input.clone(),
                output: None,
                trim: Duration::from_secs(5),
            },
            &mut presenter,
        )
        .await
        .unwrap();

        assert_eq!(output, dir.path().join("long-trimmed.wav"));
        let reader = hound::WavReader::open(&output).unwrap();
        assert_eq!(reader.duration(), 8_000 * 5);
    }

    #[tokio::test]
    async fn missing_input_is_a_read_error() {
        let mut presenter = Presenter::new();
        let result = run_trim(
            TrimOptions {
                input: PathBuf::from("/nonexistent/take.flac"),
                output: None,
                trim: Duration::default_trim(),
            },
            &mut presenter,
        )
        .await;
        assert!(matches!(result, Err(TrimCommandError::Read { .. })));
    }
}
