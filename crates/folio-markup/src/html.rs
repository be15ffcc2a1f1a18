//! HTML serializer for the node tree

use crate::node::{Block, ImageFigure, InviteCard, Node, Style, StyleFamily, VideoEmbed};

const PARAGRAPH_OPEN: &str = "<p style=\"margin-bottom: 1.5rem;\">";
const TOPIC_TITLE_STYLE: &str = "border-left: 4px solid var(--highlight); padding-left: 15px;";
const VIDEO_TITLE_STYLE: &str =
    "border-left: 3px solid var(--highlight); padding-left: 10px; font-weight: bold;";
const IFRAME_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";
const INVITE_PLACEHOLDER_NAME: &str = "Discord community";

pub(crate) fn write_blocks(blocks: &[Block], buf: &mut String) {
    for block in blocks {
        match block {
            Block::Paragraph(nodes) => {
                buf.push_str(PARAGRAPH_OPEN);
                write_nodes(nodes, buf);
                buf.push_str("</p>");
            }
            Block::Bare(nodes) => write_nodes(nodes, buf),
            Block::Section(section) => {
                buf.push_str("<section class=\"article-topic\">");
                if let Some(title) = &section.title {
                    buf.push_str("<h3 class=\"topic-title\" style=\"");
                    buf.push_str(TOPIC_TITLE_STYLE);
                    buf.push_str("\">");
                    escape_into(title, buf);
                    buf.push_str("</h3>");
                }
                write_blocks(&section.body, buf);
                buf.push_str("</section>");
            }
        }
    }
}

fn write_nodes(nodes: &[Node], buf: &mut String) {
    for node in nodes {
        write_node(node, buf);
    }
}

fn write_node(node: &Node, buf: &mut String) {
    match node {
        Node::Text(text) => escape_into(text, buf),
        Node::LineBreak => buf.push_str("<br>"),
        Node::Open(Style::Color(value)) => {
            buf.push_str("<span style=\"color: ");
            escape_into(value, buf);
            buf.push_str(";\">");
        }
        Node::Open(Style::FontSize(value)) => {
            buf.push_str("<span style=\"font-size: ");
            escape_into(value, buf);
            buf.push_str(";\">");
        }
        Node::Open(Style::Strong) => buf.push_str("<strong>"),
        Node::Close(StyleFamily::Color | StyleFamily::FontSize) => buf.push_str("</span>"),
        Node::Close(StyleFamily::Strong) => buf.push_str("</strong>"),
        Node::Video(video) => write_video(video, buf),
        Node::Invite(card) => write_invite(card, buf),
        Node::Image(image) => write_image(image, buf),
    }
}

fn write_video(video: &VideoEmbed, buf: &mut String) {
    buf.push_str("<div class=\"video-container\">");
    if let Some(title) = &video.title {
        buf.push_str("<p class=\"video-title\" style=\"");
        buf.push_str(VIDEO_TITLE_STYLE);
        buf.push_str("\">");
        write_nodes(title, buf);
        buf.push_str("</p>");
    }
    buf.push_str("<div class=\"video-wrapper\"><iframe src=\"");
    escape_into(&video.video.embed_url(), buf);
    buf.push_str("\" frameborder=\"0\" allow=\"");
    buf.push_str(IFRAME_ALLOW);
    buf.push_str("\" allowfullscreen></iframe></div></div>");
}

fn write_invite(card: &InviteCard, buf: &mut String) {
    buf.push_str("<div id=\"");
    escape_into(&card.card_id, buf);
    buf.push_str("\" class=\"invite-card\" data-invite-code=\"");
    escape_into(&card.code, buf);
    buf.push_str("\"><div class=\"invite-banner\"></div><div class=\"invite-body\">");
    buf.push_str("<div class=\"invite-icon\"></div><div class=\"invite-info\">");
    buf.push_str("<p class=\"invite-server-name\">");
    buf.push_str(INVITE_PLACEHOLDER_NAME);
    buf.push_str("</p><p class=\"invite-code\">discord.gg/");
    escape_into(&card.code, buf);
    buf.push_str("</p></div><a class=\"invite-join\" href=\"");
    escape_into(&card.join_url(), buf);
    buf.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">Join server</a></div></div>");
}

/// The author's CSS is trusted as written; escaping only keeps it inside the
/// `style` attribute. Article bodies come from admins, not from readers.
fn write_image(image: &ImageFigure, buf: &mut String) {
    buf.push_str("<div class=\"article-image\" style=\"");
    let style = image.style.trim().trim_end_matches(';');
    if !style.is_empty() {
        escape_into(style, buf);
        buf.push_str("; ");
    }
    buf.push_str("margin: 1.5rem 0;\"><img class=\"resp\" src=\"");
    escape_into(&image.src, buf);
    buf.push_str("\" alt=\"Image\">");
    if let Some(caption) = &image.caption {
        buf.push_str("<p class=\"image-caption\" style=\"font-style: italic;\">");
        write_nodes(caption, buf);
        buf.push_str("</p>");
    }
    buf.push_str("</div>");
}

/// Escape text for use in element content and double-quoted attributes
fn escape_into(s: &str, buf: &mut String) {
    for c in s.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            '\'' => buf.push_str("&#39;"),
            _ => buf.push(c),
        }
    }
}
