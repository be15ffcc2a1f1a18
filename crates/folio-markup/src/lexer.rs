//! Tokenizer for the article markup language.
//!
//! Constructs are located by separate scans in precedence order: video links,
//! invite links, image tags, style tags. A match is kept only if it does not
//! overlap anything an earlier scan already claimed. The kept spans are then
//! sorted by offset and the gaps between them become text tokens.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::node::{Style, StyleFamily};
use crate::video::{self, VideoRef};

static INVITE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?(?:discord\.gg|discord(?:app)?\.com/invite)/([a-z0-9_-]+)")
        .expect("valid regex")
});

/// `(image style="css"="url")caption(/image)`; the caption stays on one line
static IMAGE_CAPTIONED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\(image style="([^"]+)"\s*=\s*"([^"]+)"\)(.*?)\(/image\)"#)
        .expect("valid regex")
});

/// `(image style="css")url(/image)`
static IMAGE_PLAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\(image style="([^"]+)"\)([^)]*)\(/image\)"#).expect("valid regex")
});

static STYLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)\((?:(?P<attr>color|font-size)\s*=\s*"(?P<value>[^"]+)""#,
        r"|(?P<strong>strong)",
        r"|/(?P<close>color|font-size|strong))\)",
    ))
    .expect("valid regex")
});

/// Minimum length of a video label, in characters
const MIN_LABEL_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Text(String),
    Video {
        video: VideoRef,
        label: Option<String>,
    },
    Invite {
        code: String,
    },
    Image {
        style: String,
        src: String,
        caption: Option<String>,
    },
    Open(Style),
    Close(StyleFamily),
}

#[derive(Default)]
struct Claimed(Vec<(Range<usize>, Token)>);

impl Claimed {
    fn is_free(&self, range: &Range<usize>) -> bool {
        !self
            .0
            .iter()
            .any(|(taken, _)| range.start < taken.end && taken.start < range.end)
    }

    fn claim(&mut self, range: Range<usize>, token: Token) {
        if self.is_free(&range) {
            self.0.push((range, token));
        }
    }

    fn into_tokens(mut self, input: &str) -> Vec<Token> {
        self.0.sort_by_key(|(range, _)| range.start);
        let mut tokens = Vec::with_capacity(self.0.len() * 2 + 1);
        let mut cursor = 0;
        for (range, token) in self.0 {
            if range.start > cursor {
                tokens.push(Token::Text(input[cursor..range.start].to_string()));
            }
            tokens.push(token);
            cursor = range.end;
        }
        if cursor < input.len() {
            tokens.push(Token::Text(input[cursor..].to_string()));
        }
        tokens
    }
}

/// Tokenize a full body
pub(crate) fn tokenize(input: &str) -> Vec<Token> {
    let mut claimed = Claimed::default();
    scan_videos(input, &mut claimed);
    scan_invites(input, &mut claimed);
    scan_images(input, &mut claimed);
    scan_style_tags(input, &mut claimed);
    claimed.into_tokens(input)
}

/// Tokenize a caption or label: only style tags are recognized
pub(crate) fn tokenize_inline(input: &str) -> Vec<Token> {
    let mut claimed = Claimed::default();
    scan_style_tags(input, &mut claimed);
    claimed.into_tokens(input)
}

fn is_prose(label: &str) -> bool {
    let label = label.trim();
    let lower = label.to_lowercase();
    label.chars().count() >= MIN_LABEL_CHARS && !lower.contains("http") && !label.contains("//")
}

/// `Label: <url>` - the run of text ending in a colon right before the link.
/// The run stops at another colon, an angle bracket, a line start or `floor`.
fn prefix_label(input: &str, floor: usize, url_start: usize) -> Option<(usize, &str)> {
    let head = &input[floor..url_start];
    let trimmed = head.trim_end();
    // A blank line between label and link separates paragraphs
    if head[trimmed.len()..].contains("\n\n") {
        return None;
    }
    let before_colon = trimmed.strip_suffix(':')?;
    let run_start = before_colon
        .rfind([':', '<', '>', '\n'])
        .map_or(0, |i| i + 1);
    let label = &before_colon[run_start..];
    (!label.trim().is_empty()).then_some((floor + run_start, label))
}

/// `<url> : Label` - the rest of the line after a colon, up to `limit`.
/// Returns the end offset of the label and its text.
fn suffix_label(input: &str, url_end: usize, limit: usize) -> Option<(usize, &str)> {
    let tail = &input[url_end..limit];
    let rest = tail
        .trim_start_matches([' ', '\t'])
        .strip_prefix(':')?
        .trim_start_matches([' ', '\t']);
    let len = rest.find(['\n', '<', '>']).unwrap_or(rest.len());
    let label = &rest[..len];
    if label.trim().is_empty() {
        return None;
    }
    let label_start = url_end + (tail.len() - rest.len());
    Some((label_start + len, label))
}

fn scan_videos(input: &str, claimed: &mut Claimed) {
    let links = video::find_all(input);
    let mut floor = 0;
    for (i, (url, video)) in links.iter().enumerate() {
        if url.start < floor {
            continue;
        }
        let limit = links.get(i + 1).map_or(input.len(), |(next, _)| next.start);

        let mut span = url.clone();
        let mut label = None;
        if let Some((start, text)) =
            prefix_label(input, floor, url.start).filter(|(_, text)| is_prose(text))
        {
            span.start = start;
            label = Some(text.trim().to_string());
        } else if let Some((end, text)) =
            suffix_label(input, url.end, limit).filter(|(_, text)| is_prose(text))
        {
            span.end = end;
            label = Some(text.trim().to_string());
        }

        floor = span.end;
        claimed.claim(
            span,
            Token::Video {
                video: video.clone(),
                label,
            },
        );
    }
}

fn scan_invites(input: &str, claimed: &mut Claimed) {
    for caps in INVITE_URL.captures_iter(input) {
        let (Some(whole), Some(code)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        claimed.claim(
            whole.range(),
            Token::Invite {
                code: code.as_str().to_string(),
            },
        );
    }
}

fn scan_images(input: &str, claimed: &mut Claimed) {
    for caps in IMAGE_CAPTIONED.captures_iter(input) {
        let (Some(whole), Some(style), Some(src), Some(caption)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        let caption = caption.as_str().trim();
        claimed.claim(
            whole.range(),
            Token::Image {
                style: style.as_str().trim().to_string(),
                src: src.as_str().trim().to_string(),
                caption: (!caption.is_empty()).then(|| caption.to_string()),
            },
        );
    }
    for caps in IMAGE_PLAIN.captures_iter(input) {
        let (Some(whole), Some(style), Some(src)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        claimed.claim(
            whole.range(),
            Token::Image {
                style: style.as_str().trim().to_string(),
                src: src.as_str().trim().to_string(),
                caption: None,
            },
        );
    }
}

fn scan_style_tags(input: &str, claimed: &mut Claimed) {
    for caps in STYLE_TAG.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let token = if let (Some(attr), Some(value)) = (caps.name("attr"), caps.name("value")) {
            let value = value.as_str().trim().to_string();
            if attr.as_str().eq_ignore_ascii_case("color") {
                Token::Open(Style::Color(value))
            } else {
                Token::Open(Style::FontSize(value))
            }
        } else if caps.name("strong").is_some() {
            Token::Open(Style::Strong)
        } else if let Some(close) = caps.name("close") {
            Token::Close(match close.as_str().to_ascii_lowercase().as_str() {
                "color" => StyleFamily::Color,
                "font-size" => StyleFamily::FontSize,
                _ => StyleFamily::Strong,
            })
        } else {
            continue;
        };
        claimed.claim(whole.range(), token);
    }
}
