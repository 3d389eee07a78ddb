use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a stored media object
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Map a sniffed MIME type (`image/png`, `video/mp4`, ...) to a kind.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.split('/').next()? {
            "image" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable reference to a stored media object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MediaRef {
    pub url: String,
    pub kind: MediaKind,
}

impl MediaRef {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

/// Media references split by kind, each half keeping input order
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ClassifiedMedia {
    pub images: Vec<MediaRef>,
    pub videos: Vec<MediaRef>,
}

impl ClassifiedMedia {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }
}

/// Partition references by kind. Pure, no I/O.
pub fn classify(refs: &[MediaRef]) -> ClassifiedMedia {
    let (images, videos) = refs
        .iter()
        .cloned()
        .partition(|media| media.kind == MediaKind::Image);

    ClassifiedMedia { images, videos }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(MediaKind::from_mime("image/jpeg"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_mime("video/mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_mime("application/pdf"), None);
        assert_eq!(MediaKind::from_mime(""), None);
    }

    #[test]
    fn test_classify_preserves_order_within_kind() {
        let refs = vec![
            MediaRef::new("https://cdn/a.png", MediaKind::Image),
            MediaRef::new("https://cdn/b.mp4", MediaKind::Video),
            MediaRef::new("https://cdn/c.jpg", MediaKind::Image),
        ];

        let classified = classify(&refs);
        assert_eq!(
            classified.images,
            vec![refs[0].clone(), refs[2].clone()]
        );
        assert_eq!(classified.videos, vec![refs[1].clone()]);
    }

    #[test]
    fn test_classify_empty() {
        assert!(classify(&[]).is_empty());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MediaRef::new("u", MediaKind::Video)).unwrap();
        assert_eq!(json, r#"{"url":"u","kind":"video"}"#);
    }
}
