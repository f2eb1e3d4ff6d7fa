pub mod mock_transcriber;
pub mod whisper_api_transcriber;
