//! Helpers for embedded media and extension blocks: YouTube identifiers and
//! the cloud-storage provider table.

use once_cell::sync::Lazy;
use regex::Regex;

/// Generic label shown when a cloud-storage card has neither a title nor a known provider.
pub const FILE_LABEL: &str = "File";
/// Subtitle used for cloud-storage cards whose provider is not recognised.
pub const CLOUD_STORAGE_LABEL: &str = "Cloud storage";

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube-nocookie.com/embed/";

static YOUTUBE_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube-nocookie\.com/embed/)([a-zA-Z0-9_-]{11})",
    )
    .expect("youtube id pattern must compile")
});

/// Extract the 11-character video identifier from a YouTube URL.
///
/// Watch, short-link, embed and privacy-enhanced embed URLs are recognised;
/// anything else yields `None`.
pub fn extract_youtube_id(src: &str) -> Option<&str> {
    YOUTUBE_ID_PATTERN
        .captures(src)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

/// Privacy-enhanced player URL for a video identifier.
pub fn youtube_embed_url(video_id: &str) -> String {
    format!("{YOUTUBE_EMBED_BASE}{video_id}")
}

/// Cloud storage services a link card can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudStorageProvider {
    GoogleDrive,
    ICloud,
    Dropbox,
    OneDrive,
    Box,
    YandexDisk,
    Mega,
    Unknown,
}

impl CloudStorageProvider {
    /// Parse the editor's provider token. Tokens outside the table yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        let provider = match token {
            "google-drive" => Self::GoogleDrive,
            "icloud" => Self::ICloud,
            "dropbox" => Self::Dropbox,
            "onedrive" => Self::OneDrive,
            "box" => Self::Box,
            "yandex-disk" => Self::YandexDisk,
            "mega" => Self::Mega,
            "unknown" => Self::Unknown,
            _ => return None,
        };
        Some(provider)
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::GoogleDrive => "google-drive",
            Self::ICloud => "icloud",
            Self::Dropbox => "dropbox",
            Self::OneDrive => "onedrive",
            Self::Box => "box",
            Self::YandexDisk => "yandex-disk",
            Self::Mega => "mega",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable provider name.
    pub fn label(self) -> &'static str {
        match self {
            Self::GoogleDrive => "Google Drive",
            Self::ICloud => "iCloud",
            Self::Dropbox => "Dropbox",
            Self::OneDrive => "OneDrive",
            Self::Box => "Box",
            Self::YandexDisk => "Yandex Disk",
            Self::Mega => "MEGA",
            Self::Unknown => FILE_LABEL,
        }
    }
}
