//! Target directory planning.

use std::path::{Path, PathBuf};

use super::error::PathError;
use super::sanitize::sanitize_filename;
use crate::request::{AlbumRequest, ReleaseKind};

/// Directory that collects all singles of one artist.
pub const SINGLES_DIR: &str = "Singles";

/// Default base directory: `<home>/Downloads/SpotifyDownloads`.
pub fn default_download_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Downloads")
        .join("SpotifyDownloads")
}

/// Directory a request downloads into.
///
/// `{base}/{artist}/Singles` for singles, `{base}/{artist}/{album}` otherwise.
pub fn album_directory(base: &Path, request: &AlbumRequest) -> PathBuf {
    let artist_dir = base.join(sanitize_filename(&request.artist));
    match request.kind {
        ReleaseKind::Single => artist_dir.join(SINGLES_DIR),
        ReleaseKind::Album => artist_dir.join(sanitize_filename(&request.album)),
    }
}

/// Create `path` and its parents. Succeeds if the directory already exists.
pub async fn ensure_directory(path: &Path) -> Result<(), PathError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => return Err(PathError::NotADirectory(path.to_path_buf())),
        Err(_) => {}
    }

    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| PathError::CreateFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: ReleaseKind) -> AlbumRequest {
        AlbumRequest {
            url: "https://open.spotify.com/album/x".to_string(),
            artist: "AC/DC".to_string(),
            album: "Back in Black".to_string(),
            kind,
        }
    }

    #[test]
    fn album_goes_under_artist_and_album() {
        let dir = album_directory(Path::new("/music"), &request(ReleaseKind::Album));
        assert_eq!(dir, PathBuf::from("/music/AC_DC/Back in Black"));
    }

    #[test]
    fn single_goes_under_singles() {
        let dir = album_directory(Path::new("/music"), &request(ReleaseKind::Single));
        assert_eq!(dir, PathBuf::from("/music/AC_DC/Singles"));
    }

    #[tokio::test]
    async fn ensure_directory_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("a").join("b");

        ensure_directory(&dir).await.unwrap();
        ensure_directory(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn ensure_directory_rejects_files() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("file");
        std::fs::write(&file, b"x").unwrap();

        let err = ensure_directory(&file).await.unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));
    }
}
