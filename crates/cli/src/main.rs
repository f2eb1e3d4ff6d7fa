use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use kaiwa_core::evaluation::domain::feedback_generator::FeedbackGenerator;
use kaiwa_core::evaluation::infrastructure::openai_feedback_generator::OpenAiFeedbackGenerator;
use kaiwa_core::media::domain::audio_storage::AudioStorage;
use kaiwa_core::media::infrastructure::local_dir_storage::LocalDirStorage;
use kaiwa_core::media::infrastructure::supabase_storage::SupabaseStorage;
use kaiwa_core::media::infrastructure::yt_dlp_fetcher::YtDlpFetcher;
use kaiwa_core::pipeline::evaluate_line_use_case::{EvaluateLineUseCase, EvaluationRequest};
use kaiwa_core::pipeline::ingest_scene_use_case::IngestSceneUseCase;
use kaiwa_core::pipeline::pipeline_logger::{PipelineLogger, StdoutPipelineLogger};
use kaiwa_core::script::domain::dialogue_segmenter::DialogueSegmenter;
use kaiwa_core::script::infrastructure::mock_dialogue_segmenter::MockDialogueSegmenter;
use kaiwa_core::script::infrastructure::openai_dialogue_segmenter::OpenAiDialogueSegmenter;
use kaiwa_core::shared::constants::{
    DEFAULT_MAX_DAILY_CALLS, DEFAULT_MAX_PER_MINUTE, OPENAI_BASE_URL,
};
use kaiwa_core::shared::openai_client::OpenAiClient;
use kaiwa_core::shared::rate_limiter::{RateLimiter, RateLimits};
use kaiwa_core::shared::settings::{clean_value, parse_switch, Settings, SupabaseSettings};
use kaiwa_core::transcription::domain::transcriber::Transcriber;
use kaiwa_core::transcription::infrastructure::mock_transcriber::MockTranscriber;
use kaiwa_core::transcription::infrastructure::whisper_api_transcriber::WhisperApiTranscriber;

/// Turn dialogue videos into practice scripts and score spoken attempts.
#[derive(Parser)]
#[command(name = "kaiwa")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a scene package from a video URL.
    Ingest {
        /// Media URL (YouTube or any source yt-dlp understands).
        url: String,
    },
    /// Score a recorded attempt at one script line.
    Evaluate {
        #[arg(long)]
        scene_id: String,

        #[arg(long)]
        line_id: String,

        /// Text of the line as written in the script.
        #[arg(long)]
        expected: String,

        /// Recorded attempt (webm, mp3, wav...).
        audio: PathBuf,
    },
}

#[derive(Args)]
struct Config {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Use the real AI services; "true" enables them, anything else uses mocks.
    #[arg(long, env = "AI_ENABLED", default_value = "false")]
    ai_enabled: String,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = OPENAI_BASE_URL)]
    openai_base_url: String,

    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    supabase_service_role_key: Option<String>,

    #[arg(long, env = "SUPABASE_BUCKET", default_value = "audio")]
    supabase_bucket: String,

    /// Local directory used as audio storage when Supabase is not configured.
    #[arg(long, env = "KAIWA_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    #[arg(long, env = "KAIWA_MAX_DAILY_CALLS", default_value_t = DEFAULT_MAX_DAILY_CALLS)]
    max_daily_calls: u32,

    #[arg(long, env = "KAIWA_MAX_PER_MINUTE", default_value_t = DEFAULT_MAX_PER_MINUTE)]
    max_per_minute: u32,
}

impl Config {
    fn into_settings(self) -> Settings {
        let supabase = match (
            self.supabase_url.as_deref().and_then(clean_value),
            self.supabase_service_role_key.as_deref().and_then(clean_value),
        ) {
            (Some(url), Some(service_role_key)) => Some(SupabaseSettings {
                url,
                service_role_key,
                bucket: clean_value(&self.supabase_bucket).unwrap_or_else(|| "audio".to_string()),
            }),
            _ => None,
        };

        Settings {
            openai_api_key: self.openai_api_key.as_deref().and_then(clean_value),
            openai_base_url: clean_value(&self.openai_base_url)
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            ai_enabled: parse_switch(&self.ai_enabled),
            supabase,
            storage_dir: self.storage_dir,
            rate_limits: RateLimits {
                max_daily_calls: self.max_daily_calls,
                max_per_minute: self.max_per_minute,
            },
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = cli.config.into_settings();

    let missing = settings.missing_keys();
    if !missing.is_empty() {
        log::warn!(
            "Missing configuration: {}. Running in development mode.",
            missing.join(", ")
        );
    }

    let limiter = Arc::new(RateLimiter::new(settings.rate_limits));
    let client = settings.openai_client(limiter).map(Arc::new);
    match &client {
        Some(c) => log::info!("AI services enabled ({})", c.base_url()),
        None => log::info!("AI services disabled, using mock transcription and segmentation"),
    }

    match cli.command {
        Command::Ingest { url } => run_ingest(&url, &settings, client.as_ref()),
        Command::Evaluate {
            scene_id,
            line_id,
            expected,
            audio,
        } => {
            let bytes = fs::read(&audio)
                .map_err(|e| format!("cannot read {}: {e}", audio.display()))?;
            let request = EvaluationRequest {
                scene_id: &scene_id,
                line_id: &line_id,
                expected_text: &expected,
                audio: &bytes,
            };
            run_evaluate(request, client.as_ref())
        }
    }
}

fn run_ingest(
    url: &str,
    settings: &Settings,
    client: Option<&Arc<OpenAiClient>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let use_case = IngestSceneUseCase::new(
        Box::new(YtDlpFetcher::new()),
        build_transcriber(client),
        build_segmenter(client),
        build_storage(settings)?,
    );

    let mut logger = StdoutPipelineLogger::new();
    let result = use_case.execute(url, &mut logger);
    logger.summary();
    let package = result?;

    println!("{}", serde_json::to_string_pretty(&package)?);
    Ok(())
}

fn run_evaluate(
    request: EvaluationRequest<'_>,
    client: Option<&Arc<OpenAiClient>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let feedback = client.map(|c| {
        Box::new(OpenAiFeedbackGenerator::new(c.clone())) as Box<dyn FeedbackGenerator>
    });
    let use_case = EvaluateLineUseCase::new(build_transcriber(client), feedback);

    let result = use_case.execute(request)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn build_transcriber(client: Option<&Arc<OpenAiClient>>) -> Box<dyn Transcriber> {
    match client {
        Some(c) => Box::new(WhisperApiTranscriber::new(c.clone())),
        None => Box::new(MockTranscriber),
    }
}

fn build_segmenter(client: Option<&Arc<OpenAiClient>>) -> Box<dyn DialogueSegmenter> {
    match client {
        Some(c) => Box::new(OpenAiDialogueSegmenter::new(c.clone())),
        None => Box::new(MockDialogueSegmenter),
    }
}

fn build_storage(settings: &Settings) -> Result<Box<dyn AudioStorage>, Box<dyn std::error::Error>> {
    if let Some(supabase) = &settings.supabase {
        return Ok(Box::new(SupabaseStorage::new(supabase)));
    }
    let root = settings
        .storage_dir
        .clone()
        .or_else(LocalDirStorage::default_root)
        .ok_or("no local storage directory available; set KAIWA_STORAGE_DIR")?;
    log::info!("Storing audio locally under {}", root.display());
    Ok(Box::new(LocalDirStorage::new(root)))
}
