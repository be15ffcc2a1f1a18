//! Typed intermediate tree produced by the renderer

use std::fmt;

use crate::html;
use crate::video::VideoRef;

/// Style tag families. Each family balances its own opens and closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleFamily {
    Color,
    FontSize,
    Strong,
}

/// An opening style tag with its attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Style {
    Color(String),
    FontSize(String),
    Strong,
}

impl Style {
    pub fn family(&self) -> StyleFamily {
        match self {
            Self::Color(_) => StyleFamily::Color,
            Self::FontSize(_) => StyleFamily::FontSize,
            Self::Strong => StyleFamily::Strong,
        }
    }
}

/// Responsive player for a recognized video link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEmbed {
    pub video: VideoRef,
    /// Label taken from the text around the link, rendered above the player
    pub title: Option<Vec<Node>>,
}

/// Placeholder card for a chat invite link.
///
/// Server name and artwork are filled in later by whoever resolves the
/// invite code; the renderer only reserves the card and its id.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InviteCard {
    pub card_id: String,
    pub code: String,
}

impl InviteCard {
    pub fn join_url(&self) -> String {
        format!("https://discord.gg/{}", self.code)
    }
}

/// Image tag, with or without caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFigure {
    pub style: String,
    pub src: String,
    pub caption: Option<Vec<Node>>,
}

/// Inline content of a paragraph or of an unwrapped block segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    LineBreak,
    Open(Style),
    Close(StyleFamily),
    Video(VideoEmbed),
    Invite(InviteCard),
    Image(ImageFigure),
}

impl Node {
    /// Videos, invites and images render as `<div>` containers
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Video(_) | Self::Invite(_) | Self::Image(_))
    }
}

/// A titled topic section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: Option<String>,
    pub body: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Wrapped in `<p>`, newlines become `<br>`
    Paragraph(Vec<Node>),
    /// Segment that starts with a block container; emitted without a wrapper
    Bare(Vec<Node>),
    Section(Section),
}

/// Rendered document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub blocks: Vec<Block>,
}

impl Fragment {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Serialize to an HTML string
    pub fn to_html(&self) -> String {
        let mut buf = String::with_capacity(256);
        html::write_blocks(&self.blocks, &mut buf);
        buf
    }

    /// Invite cards in document order
    pub fn invites(&self) -> Vec<&InviteCard> {
        fn walk<'a>(blocks: &'a [Block], out: &mut Vec<&'a InviteCard>) {
            for block in blocks {
                match block {
                    Block::Paragraph(nodes) | Block::Bare(nodes) => {
                        out.extend(nodes.iter().filter_map(|node| match node {
                            Node::Invite(card) => Some(card),
                            _ => None,
                        }));
                    }
                    Block::Section(section) => walk(&section.body, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.blocks, &mut out);
        out
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}
