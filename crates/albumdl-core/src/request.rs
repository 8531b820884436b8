//! Album download requests.

use serde::{Deserialize, Serialize};

use crate::ports::CoreError;

/// Message returned when a request lacks one of its mandatory fields.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: url, artist, album";

/// Release type, which decides the directory layout.
///
/// Anything other than `single` is filed as an album.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ReleaseKind {
    #[default]
    Album,
    Single,
}

impl From<String> for ReleaseKind {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&str> for ReleaseKind {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("single") {
            Self::Single
        } else {
            Self::Album
        }
    }
}

/// A validated request to download one release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRequest {
    pub url: String,
    pub artist: String,
    pub album: String,
    #[serde(rename = "type", default)]
    pub kind: ReleaseKind,
}

impl AlbumRequest {
    /// Build a request from loosely typed input.
    ///
    /// `url`, `artist` and `album` must be present and non-blank. A missing
    /// `kind` defaults to [`ReleaseKind::Album`].
    pub fn from_parts(
        url: Option<String>,
        artist: Option<String>,
        album: Option<String>,
        kind: Option<String>,
    ) -> Result<Self, CoreError> {
        let required = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        match (required(url), required(artist), required(album)) {
            (Some(url), Some(artist), Some(album)) => Ok(Self {
                url: url.trim().to_string(),
                artist,
                album,
                kind: kind.map(ReleaseKind::from).unwrap_or_default(),
            }),
            _ => Err(CoreError::Validation(MISSING_FIELDS_MESSAGE.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_defaults_to_album() {
        let req = AlbumRequest::from_parts(
            Some("https://open.spotify.com/album/x".into()),
            Some("Artist".into()),
            Some("Album".into()),
            None,
        )
        .unwrap();
        assert_eq!(req.kind, ReleaseKind::Album);
    }

    #[test]
    fn single_is_case_insensitive() {
        assert_eq!(ReleaseKind::from("Single"), ReleaseKind::Single);
        assert_eq!(ReleaseKind::from("compilation"), ReleaseKind::Album);
    }

    #[test]
    fn missing_or_blank_fields_are_rejected() {
        let err = AlbumRequest::from_parts(Some("u".into()), None, Some("a".into()), None)
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref m) if m == MISSING_FIELDS_MESSAGE));

        let err = AlbumRequest::from_parts(
            Some("u".into()),
            Some("   ".into()),
            Some("a".into()),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn deserializes_type_field() {
        let json = serde_json::json!({
            "url": "u",
            "artist": "a",
            "album": "b",
            "type": "single"
        });
        let req: AlbumRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.kind, ReleaseKind::Single);
        assert_eq!(serde_json::to_value(req.kind).unwrap(), "single");
    }
}
