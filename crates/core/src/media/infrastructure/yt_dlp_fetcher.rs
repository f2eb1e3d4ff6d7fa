use std::path::{Path, PathBuf};
use std::process::Command;

use crate::media::domain::media_fetcher::{candidate_path, MediaFetcher};
use crate::shared::service_error::ServiceError;

const TOOL: &str = "yt-dlp";

/// Media fetcher that shells out to the `yt-dlp` executable.
///
/// Downloads the best available audio stream and asks the tool's ffmpeg
/// post-processor for an MP3. Playlists are never expanded.
#[derive(Debug)]
pub struct YtDlpFetcher {
    program: PathBuf,
}

impl YtDlpFetcher {
    pub fn new() -> Self {
        Self::with_program(TOOL)
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn arguments(source_url: &str, output_stem: &Path) -> Vec<String> {
        let template = format!("{}.%(ext)s", output_stem.display());
        [
            "--format",
            "bestaudio/best",
            "--no-playlist",
            "--extract-audio",
            "--audio-format",
            "mp3",
            "--audio-quality",
            "128K",
            "--quiet",
            "--no-warnings",
            "--source-address",
            "0.0.0.0",
            "--output",
            template.as_str(),
            "--",
            source_url,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaFetcher for YtDlpFetcher {
    fn fetch(&self, source_url: &str, output_stem: &Path) -> Result<PathBuf, ServiceError> {
        log::info!("Fetching audio for {source_url}");
        let output = Command::new(&self.program)
            .args(Self::arguments(source_url, output_stem))
            .output()
            .map_err(|e| ServiceError::Process {
                tool: TOOL,
                message: format!("could not launch {}: {e}", self.program.display()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ServiceError::Process {
                tool: TOOL,
                message: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        Ok(candidate_path(output_stem, "mp3"))
    }
}
