use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::media::domain::audio_storage::AudioStorage;
use crate::media::domain::media_fetcher::{candidate_path, MediaFetcher};
use crate::pipeline::artifact_scope::ArtifactScope;
use crate::pipeline::pipeline_error::{IngestError, IngestStage};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::script::domain::dialogue_segmenter::DialogueSegmenter;
use crate::script::domain::scene_package::{AudioDescriptor, ScenePackage, SourceDescriptor};
use crate::script::domain::timeline_reconciler::TimelineReconciler;
use crate::shared::constants::{AUDIO_CANDIDATE_EXTENSIONS, MAX_SOURCE_DURATION_SECS};
use crate::shared::service_error::ServiceError;
use crate::transcription::domain::transcriber::Transcriber;

const SOURCE_STEM: &str = "source";

/// Turns a media source into a ScenePackage:
/// fetch → transcribe → refine → persist audio → assemble.
///
/// Stages run strictly in order; the first failure aborts the run and is
/// reported tagged with its stage. Everything fetched lives in a per-run
/// `ArtifactScope`, so no file outlives the call whatever the outcome.
pub struct IngestSceneUseCase {
    fetcher: Box<dyn MediaFetcher>,
    transcriber: Box<dyn Transcriber>,
    segmenter: Box<dyn DialogueSegmenter>,
    storage: Box<dyn AudioStorage>,
    work_root: Option<PathBuf>,
}

impl IngestSceneUseCase {
    pub fn new(
        fetcher: Box<dyn MediaFetcher>,
        transcriber: Box<dyn Transcriber>,
        segmenter: Box<dyn DialogueSegmenter>,
        storage: Box<dyn AudioStorage>,
    ) -> Self {
        Self {
            fetcher,
            transcriber,
            segmenter,
            storage,
            work_root: None,
        }
    }

    /// Create per-run working directories under `root` instead of the system
    /// temporary directory.
    pub fn with_work_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.work_root = Some(root.into());
        self
    }

    pub fn execute(
        &self,
        source_url: &str,
        logger: &mut dyn PipelineLogger,
    ) -> Result<ScenePackage, IngestError> {
        let source_url = source_url.trim();
        if source_url.is_empty() {
            return Err(IngestError::Validation("source url is required".to_string()));
        }

        let mut scope = match &self.work_root {
            Some(root) => ArtifactScope::new_in(root),
            None => ArtifactScope::new(),
        }
        .map_err(IngestError::Workspace)?;

        let audio_path = timed(logger, IngestStage::Fetch, || {
            self.fetch(source_url, &mut scope)
        })?;

        let transcript = timed(logger, IngestStage::Transcribe, || {
            let transcript = self
                .transcriber
                .transcribe(&audio_path)
                .map_err(IngestError::at(IngestStage::Transcribe))?;
            if transcript.exceeds(MAX_SOURCE_DURATION_SECS) {
                return Err(IngestError::Validation(format!(
                    "source is {:.1}s long; the limit is {MAX_SOURCE_DURATION_SECS:.0}s",
                    transcript.duration
                )));
            }
            Ok(transcript)
        })?;
        logger.info(&format!(
            "Transcribed {:.1}s of audio into {} segments",
            transcript.duration,
            transcript.segments.len()
        ));

        let raw_segments = timed(logger, IngestStage::Refine, || {
            let segments = self
                .segmenter
                .refine(&transcript.segments)
                .map_err(IngestError::at(IngestStage::Refine))?;
            if segments.is_empty() {
                return Err(IngestError::at(IngestStage::Refine)(
                    ServiceError::EmptyOutput("dialogue segmenter"),
                ));
            }
            Ok(segments)
        })?;

        let storage_path = timed(logger, IngestStage::PersistAudio, || {
            self.storage
                .upload(&audio_path)
                .map_err(IngestError::at(IngestStage::PersistAudio))
        })?;

        let package = timed(logger, IngestStage::Assemble, || {
            let script = TimelineReconciler::reconcile(&raw_segments);
            Ok(ScenePackage::new(
                SourceDescriptor::from_url(source_url),
                AudioDescriptor::stored(storage_path, transcript.duration),
                script,
            ))
        })?;
        logger.info(&format!(
            "Scene {} assembled with {} lines",
            package.scene_id,
            package.script.len()
        ));

        Ok(package)
    }

    fn fetch(&self, source_url: &str, scope: &mut ArtifactScope) -> Result<PathBuf, IngestError> {
        let stem = scope.path().join(SOURCE_STEM);
        // The tool may settle on any of these; claim them all before it runs.
        for ext in AUDIO_CANDIDATE_EXTENSIONS {
            scope.track(candidate_path(&stem, ext));
        }

        let expected = self
            .fetcher
            .fetch(source_url, &stem)
            .map_err(IngestError::at(IngestStage::Fetch))?;
        scope.track(expected.clone());

        locate_audio(&expected, &stem).ok_or_else(|| {
            IngestError::at(IngestStage::Fetch)(ServiceError::Process {
                tool: "media fetcher",
                message: "audio file not created".to_string(),
            })
        })
    }
}

/// The expected file if present, else the first recognized candidate that
/// exists, in priority order.
fn locate_audio(expected: &Path, stem: &Path) -> Option<PathBuf> {
    if expected.is_file() {
        return Some(expected.to_path_buf());
    }
    AUDIO_CANDIDATE_EXTENSIONS
        .iter()
        .map(|ext| candidate_path(stem, ext))
        .find(|path| path.is_file())
}

fn timed<T>(
    logger: &mut dyn PipelineLogger,
    stage: IngestStage,
    run: impl FnOnce() -> Result<T, IngestError>,
) -> Result<T, IngestError> {
    logger.stage_started(stage.name());
    let started = Instant::now();
    let result = run();
    logger.stage_finished(
        stage.name(),
        started.elapsed().as_secs_f64() * 1000.0,
        result.is_ok(),
    );
    result
}
