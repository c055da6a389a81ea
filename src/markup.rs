use super::*;

/// Parse mode for outgoing text. Every user-controlled or corpus string goes
/// through `escape` before it lands in a message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Markup {
    #[default]
    Html,
    MarkdownV2,
}

const MARKDOWN_V2_SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

impl Markup {
    pub(crate) fn parse_mode(self) -> ParseMode {
        match self {
            Markup::Html => ParseMode::Html,
            Markup::MarkdownV2 => ParseMode::MarkdownV2,
        }
    }

    pub(crate) fn escape(self, text: &str) -> String {
        match self {
            Markup::Html => {
                let mut out = String::with_capacity(text.len());
                for c in text.chars() {
                    match c {
                        '&' => out.push_str("&amp;"),
                        '<' => out.push_str("&lt;"),
                        '>' => out.push_str("&gt;"),
                        _ => out.push(c),
                    }
                }
                out
            }
            Markup::MarkdownV2 => {
                let mut out = String::with_capacity(text.len());
                for c in text.chars() {
                    if MARKDOWN_V2_SPECIAL.contains(&c) {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out
            }
        }
    }

    pub(crate) fn bold(self, text: &str) -> String {
        match self {
            Markup::Html => format!("<b>{}</b>", self.escape(text)),
            Markup::MarkdownV2 => format!("*{}*", self.escape(text)),
        }
    }

    pub(crate) fn italic(self, text: &str) -> String {
        match self {
            Markup::Html => format!("<i>{}</i>", self.escape(text)),
            Markup::MarkdownV2 => format!("_{}_", self.escape(text)),
        }
    }

    /// Formats one already-paginated page of a plain document: lines that
    /// start with a known label get the label bolded, the rest is escaped.
    pub(crate) fn format_document_page(self, page: &str, labels: &[&str]) -> String {
        page.lines()
            .map(|line| match labels.iter().find(|label| line.starts_with(**label)) {
                Some(label) => {
                    let rest = &line[label.len()..];
                    format!("{}{}", self.bold(label), self.escape(rest))
                }
                None => self.escape(line),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
