//! Media kind classification.

/// Kind of media behind a post or story item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    /// Multi-item carousel post.
    Sidecar,
    Unknown,
}

impl MediaKind {
    /// Classify a GraphQL `__typename`.
    pub fn from_typename(typename: &str) -> Self {
        match typename {
            "GraphImage" | "GraphStoryImage" => MediaKind::Image,
            "GraphVideo" | "GraphStoryVideo" => MediaKind::Video,
            "GraphSidecar" => MediaKind::Sidecar,
            _ => MediaKind::Unknown,
        }
    }

    /// Only single images are downloaded.
    pub fn is_supported(&self) -> bool {
        matches!(self, MediaKind::Image)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
            MediaKind::Sidecar => write!(f, "sidecar"),
            MediaKind::Unknown => write!(f, "unknown"),
        }
    }
}
