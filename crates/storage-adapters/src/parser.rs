//! # HtmlContentParser
//!
//! Renders stored post text as HTML: everything is escaped, runs of `>`
//! lines become one `<blockquote>`, and remaining lines break with `<br />`.
//! Author signatures are escaped too.

use async_trait::async_trait;
use domains::{ContentParser, Post, Result};

/// A quote marker as it appears after escaping.
const QUOTE_MARKER: &str = "&gt;";

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlContentParser;

impl HtmlContentParser {
    pub fn new() -> Self {
        Self
    }
}

enum Block<'a> {
    Line(&'a str),
    Quote(Vec<&'a str>),
}

fn blocks(escaped: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    for line in escaped.lines() {
        match line.strip_prefix(QUOTE_MARKER) {
            Some(quoted) => match blocks.last_mut() {
                Some(Block::Quote(lines)) => lines.push(quoted.trim_start()),
                _ => blocks.push(Block::Quote(vec![quoted.trim_start()])),
            },
            None => blocks.push(Block::Line(line)),
        }
    }
    blocks
}

/// HTML for a post body.
pub fn render_body(raw: &str) -> String {
    let escaped = html_escape::encode_safe(raw);
    let mut html = String::with_capacity(escaped.len());
    let mut after_line = false;

    for block in blocks(&escaped) {
        match block {
            Block::Line(line) => {
                if after_line {
                    html.push_str("<br />");
                }
                html.push_str(line);
                after_line = true;
            }
            Block::Quote(lines) => {
                html.push_str("<blockquote>");
                html.push_str(&lines.join("<br />"));
                html.push_str("</blockquote>");
                after_line = false;
            }
        }
    }
    html
}

#[async_trait]
impl ContentParser for HtmlContentParser {
    async fn parse(&self, mut post: Post) -> Result<Post> {
        post.content = render_body(&post.content);
        if !post.user.signature.is_empty() {
            post.user.signature = html_escape::encode_safe(&post.user.signature).into_owned();
        }
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{PostAuthor, PostId, TopicId, UserId};

    #[test]
    fn escapes_markup() {
        assert_eq!(render_body("<i>a & b"), "&lt;i&gt;a &amp; b");
    }

    #[test]
    fn plain_lines_break() {
        assert_eq!(render_body("one\ntwo"), "one<br />two");
    }

    #[test]
    fn consecutive_quote_lines_share_a_blockquote() {
        assert_eq!(
            render_body("> first\n>second\nreply\n> again"),
            "<blockquote>first<br />second</blockquote>reply<blockquote>again</blockquote>"
        );
    }

    #[tokio::test]
    async fn parse_escapes_signature_and_body() {
        let post = Post {
            pid: PostId(1),
            tid: TopicId(1),
            uid: UserId(2),
            content: "> quoted\n<b>".into(),
            timestamp: Utc::now(),
            votes: 0,
            deleted: false,
            self_post: false,
            user: PostAuthor {
                uid: UserId(2),
                username: "bob".into(),
                signature: "<script>".into(),
            },
        };
        let parsed = HtmlContentParser::new().parse(post).await.unwrap();
        assert_eq!(parsed.content, "<blockquote>quoted</blockquote>&lt;b&gt;");
        assert_eq!(parsed.user.signature, "&lt;script&gt;");
    }
}
