//! Video link recognition

use regex::Regex;
use serde::Serialize;
use std::ops::Range;
use std::sync::LazyLock;

/// YouTube watch, short-link, embed, shorts and live URLs, plus Streamable clips.
/// Trailing query strings are part of the match so they do not leak into text.
static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)https?://(?:(?:www\.|m\.)?youtube\.com/(?:watch\?(?:[^\s<>:#]*?&)?v=|embed/|shorts/|live/)|youtu\.be/)",
        r"(?P<yt>[a-z0-9_-]{11})(?:[?&#][^\s<>:]*)?",
        r"|https?://(?:www\.)?streamable\.com/(?:e/)?(?P<clip>[a-z0-9_-]+)(?:[?#][^\s<>:]*)?",
    ))
    .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    YouTube,
    Streamable,
}

/// A recognized video id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRef {
    pub provider: VideoProvider,
    pub id: String,
}

impl VideoRef {
    /// Recognize a single URL. The whole string must be the link.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        find_all(url)
            .into_iter()
            .next()
            .filter(|(range, _)| range.start == 0 && range.end == url.len())
            .map(|(_, video)| video)
    }

    /// URL for the embedded player
    pub fn embed_url(&self) -> String {
        match self.provider {
            VideoProvider::YouTube => format!("https://www.youtube.com/embed/{}", self.id),
            VideoProvider::Streamable => format!("https://streamable.com/e/{}", self.id),
        }
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Every video link in `input`, in order of appearance
pub(crate) fn find_all(input: &str) -> Vec<(Range<usize>, VideoRef)> {
    VIDEO_URL
        .captures_iter(input)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if let Some(id) = caps.name("yt") {
                // A YouTube id is exactly 11 characters; a longer run is not a video
                if input[id.end()..].starts_with(is_id_char) {
                    return None;
                }
                Some((
                    whole.range(),
                    VideoRef {
                        provider: VideoProvider::YouTube,
                        id: id.as_str().to_string(),
                    },
                ))
            } else {
                caps.name("clip").map(|clip| {
                    (
                        whole.range(),
                        VideoRef {
                            provider: VideoProvider::Streamable,
                            id: clip.as_str().to_string(),
                        },
                    )
                })
            }
        })
        .collect()
}
