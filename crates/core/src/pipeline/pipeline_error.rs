use thiserror::Error;

use crate::shared::rate_limiter::RateLimitError;
use crate::shared::service_error::ServiceError;

/// The sequential phases of an ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Fetch,
    Transcribe,
    Refine,
    PersistAudio,
    Assemble,
}

impl IngestStage {
    pub const ALL: &[IngestStage] = &[
        IngestStage::Fetch,
        IngestStage::Transcribe,
        IngestStage::Refine,
        IngestStage::PersistAudio,
        IngestStage::Assemble,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IngestStage::Fetch => "fetch",
            IngestStage::Transcribe => "transcribe",
            IngestStage::Refine => "refine",
            IngestStage::PersistAudio => "persist-audio",
            IngestStage::Assemble => "assemble",
        }
    }
}

impl std::fmt::Display for IngestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("rate limited during {stage} stage: {source}")]
    RateLimited {
        stage: IngestStage,
        #[source]
        source: RateLimitError,
    },
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: IngestStage,
        #[source]
        source: ServiceError,
    },
    #[error("could not prepare working directory: {0}")]
    Workspace(#[source] std::io::Error),
}

impl IngestError {
    /// Tag a collaborator failure with the stage it happened in, keeping rate
    /// limiting distinguishable from genuine failures.
    pub fn at(stage: IngestStage) -> impl FnOnce(ServiceError) -> Self {
        move |source| match source {
            ServiceError::RateLimited(source) => Self::RateLimited { stage, source },
            source => Self::Stage { stage, source },
        }
    }

    /// The stage the run stopped in, if the failure is stage-bound.
    pub fn stage(&self) -> Option<IngestStage> {
        match self {
            Self::RateLimited { stage, .. } | Self::Stage { stage, .. } => Some(*stage),
            Self::Validation(_) | Self::Workspace(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum EvaluateError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    RateLimited(RateLimitError),
    #[error("transcription failed: {0}")]
    Transcription(#[source] ServiceError),
    #[error("could not prepare working directory: {0}")]
    Workspace(#[source] std::io::Error),
}

impl From<ServiceError> for EvaluateError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::RateLimited(source) => Self::RateLimited(source),
            other => Self::Transcription(other),
        }
    }
}
