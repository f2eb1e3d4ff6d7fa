use std::path::{Path, PathBuf};

use crate::shared::service_error::ServiceError;

/// Domain interface for acquiring the audio track of a remote media source.
pub trait MediaFetcher: Send + Sync {
    /// Download `source_url` and extract its audio next to `output_stem`, i.e.
    /// as `<output_stem>.<ext>`. Returns the path the fetcher intended to
    /// produce; the actual file may carry a different extension.
    fn fetch(&self, source_url: &str, output_stem: &Path) -> Result<PathBuf, ServiceError>;
}

/// `<stem>.<ext>`, without treating any dot already in the stem as an extension.
pub fn candidate_path(output_stem: &Path, ext: &str) -> PathBuf {
    let mut name = output_stem.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_path_appends_extension() {
        assert_eq!(
            candidate_path(Path::new("/tmp/run.1/source"), "mp3"),
            PathBuf::from("/tmp/run.1/source.mp3")
        );
        assert_eq!(
            candidate_path(Path::new("/tmp/source.v2"), "webm"),
            PathBuf::from("/tmp/source.v2.webm")
        );
    }
}
