//! Token stream to typed tree

use std::borrow::Cow;

use crate::document::{MarkupDocument, Topic};
use crate::lexer::{self, Token};
use crate::node::{
    Block, Fragment, ImageFigure, InviteCard, Node, Section, StyleFamily, VideoEmbed,
};

/// Render a body string
pub fn render_content(input: &str) -> Fragment {
    Renderer::new().content(input)
}

/// Render topics as consecutive sections, in the given order
pub fn render_topics(topics: &[Topic]) -> Fragment {
    Renderer::new().topics(topics)
}

pub fn render_document(document: &MarkupDocument) -> Fragment {
    Renderer::new().document(document)
}

/// Open-tag depth per style family
#[derive(Debug, Default)]
struct StyleDepth([usize; 3]);

impl StyleDepth {
    fn slot(family: StyleFamily) -> usize {
        match family {
            StyleFamily::Color => 0,
            StyleFamily::FontSize => 1,
            StyleFamily::Strong => 2,
        }
    }

    fn open(&mut self, family: StyleFamily) {
        self.0[Self::slot(family)] += 1;
    }

    /// False when there is nothing of this family left to close
    fn close(&mut self, family: StyleFamily) -> bool {
        let depth = &mut self.0[Self::slot(family)];
        if *depth == 0 {
            return false;
        }
        *depth -= 1;
        true
    }
}

/// Renders one page worth of content.
///
/// Invite card ids are numbered per renderer, so render everything that ends
/// up on the same page with one instance to keep ids unique.
#[derive(Debug, Default)]
pub struct Renderer {
    invites: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&mut self, input: &str) -> Fragment {
        Fragment {
            blocks: self.blocks(input),
        }
    }

    pub fn topics(&mut self, topics: &[Topic]) -> Fragment {
        let blocks = topics
            .iter()
            .map(|topic| {
                Block::Section(Section {
                    title: topic
                        .title
                        .as_deref()
                        .map(str::trim)
                        .filter(|title| !title.is_empty())
                        .map(str::to_string),
                    body: self.blocks(&topic.content),
                })
            })
            .collect();
        Fragment { blocks }
    }

    pub fn document(&mut self, document: &MarkupDocument) -> Fragment {
        match document {
            MarkupDocument::Content(content) => self.content(content),
            MarkupDocument::Topics(topics) => self.topics(topics),
        }
    }

    fn blocks(&mut self, input: &str) -> Vec<Block> {
        let input: Cow<'_, str> = if input.contains('\r') {
            Cow::Owned(input.replace("\r\n", "\n"))
        } else {
            Cow::Borrowed(input)
        };

        let mut depth = StyleDepth::default();
        let mut segments: Vec<Vec<Node>> = vec![Vec::new()];
        for token in lexer::tokenize(&input) {
            match token {
                Token::Text(text) => {
                    for (i, piece) in text.split("\n\n").enumerate() {
                        if i > 0 {
                            segments.push(Vec::new());
                        }
                        if !piece.is_empty() {
                            current(&mut segments).push(Node::Text(piece.to_string()));
                        }
                    }
                }
                other => {
                    if let Some(node) = self.node(other, &mut depth) {
                        current(&mut segments).push(node);
                    }
                }
            }
        }

        segments.into_iter().filter_map(segment_block).collect()
    }

    fn node(&mut self, token: Token, depth: &mut StyleDepth) -> Option<Node> {
        match token {
            Token::Text(text) => Some(Node::Text(text)),
            Token::Open(style) => {
                depth.open(style.family());
                Some(Node::Open(style))
            }
            Token::Close(family) => depth.close(family).then_some(Node::Close(family)),
            Token::Video { video, label } => Some(Node::Video(VideoEmbed {
                video,
                title: label.as_deref().map(inline),
            })),
            Token::Invite { code } => {
                self.invites += 1;
                Some(Node::Invite(InviteCard {
                    card_id: format!("invite-card-{}", self.invites),
                    code,
                }))
            }
            Token::Image {
                style,
                src,
                caption,
            } => Some(Node::Image(ImageFigure {
                style,
                src,
                caption: caption.as_deref().map(inline),
            })),
        }
    }
}

fn current(segments: &mut [Vec<Node>]) -> &mut Vec<Node> {
    let last = segments.len() - 1;
    &mut segments[last]
}

/// Style tags only, with their own balance, for captions and labels
fn inline(text: &str) -> Vec<Node> {
    let mut depth = StyleDepth::default();
    lexer::tokenize_inline(text)
        .into_iter()
        .filter_map(|token| match token {
            Token::Text(text) => Some(Node::Text(text)),
            Token::Open(style) => {
                depth.open(style.family());
                Some(Node::Open(style))
            }
            Token::Close(family) => depth.close(family).then_some(Node::Close(family)),
            _ => None,
        })
        .collect()
}

/// Whitespace-only segments are dropped. A segment led by a block container
/// is left unwrapped; anything else becomes a paragraph with line breaks.
fn segment_block(nodes: Vec<Node>) -> Option<Block> {
    let first = nodes
        .iter()
        .find(|node| !matches!(node, Node::Text(text) if text.trim().is_empty()))?;
    if first.is_block() {
        return Some(Block::Bare(nodes));
    }

    let mut lines = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(text) => {
                for (i, line) in text.split('\n').enumerate() {
                    if i > 0 {
                        lines.push(Node::LineBreak);
                    }
                    if !line.is_empty() {
                        lines.push(Node::Text(line.to_string()));
                    }
                }
            }
            other => lines.push(other),
        }
    }
    Some(Block::Paragraph(lines))
}
