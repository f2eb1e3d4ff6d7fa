pub mod local_dir_storage;
pub mod supabase_storage;
pub mod yt_dlp_fetcher;
