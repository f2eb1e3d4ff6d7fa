pub mod evaluation {
    pub mod domain {
        pub mod evaluation_result;
        pub mod feedback_generator;
        pub mod similarity_scorer;
        pub mod text_normalizer;
    }
    pub mod infrastructure;
}

pub mod media {
    pub mod domain {
        pub mod audio_storage;
        pub mod media_fetcher;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod artifact_scope;
    pub mod evaluate_line_use_case;
    pub mod ingest_scene_use_case;
    pub mod pipeline_error;
    pub mod pipeline_logger;
}

pub mod script {
    pub mod domain {
        pub mod dialogue_line;
        pub mod dialogue_segmenter;
        pub mod raw_segment;
        pub mod scene_package;
        pub mod speaker;
        pub mod timeline_reconciler;
    }
    pub mod infrastructure;
}

pub mod shared {
    pub mod constants;
    pub mod openai_client;
    pub mod rate_limiter;
    pub mod record_metadata;
    pub mod service_error;
    pub mod settings;
    pub mod thousandths;
}

pub mod transcription {
    pub mod domain {
        pub mod transcriber;
        pub mod transcript;
    }
    pub mod infrastructure;
}
