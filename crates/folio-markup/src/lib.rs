//! # folio-markup
//!
//! Renders the article markup language to HTML fragments.
//!
//! Input is either one body string or a list of titled topics. The renderer
//! runs in three stages: the lexer locates video links, chat invites, image
//! tags and style tags in precedence order and produces a flat token stream;
//! the tree builder segments tokens into paragraphs of typed nodes; the
//! serializer writes escaped HTML. Rendering never fails: anything the lexer
//! does not recognize is kept as literal text.
//!
//! ```
//! let html = folio_markup::render_content("(strong)Hi(/strong)").to_html();
//! assert_eq!(html, "<p style=\"margin-bottom: 1.5rem;\"><strong>Hi</strong></p>");
//! ```

mod document;
mod html;
mod lexer;
mod node;
mod render;
mod video;

pub use document::{ArticleBody, MarkupDocument, Topic};
pub use node::{Block, Fragment, ImageFigure, InviteCard, Node, Section, Style, StyleFamily, VideoEmbed};
pub use render::{render_content, render_document, render_topics, Renderer};
pub use video::{VideoProvider, VideoRef};
