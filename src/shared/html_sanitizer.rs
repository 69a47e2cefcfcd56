//! Message body sanitizer.
//!
//! CRM email bodies are arbitrary HTML. Only a small formatting subset is
//! kept so bodies can be rendered inside message bubbles.

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::sync::OnceLock;

const SAFE_LINK_SCHEMES: &[&str] = &["http://", "https://", "mailto:"];

/// Elements whose text content must never reach the output
const DROPPED_ELEMENTS: &[&str] = &["script", "style", "template", "noscript", "iframe", "object"];

/// Keep only safe formatting tags from an HTML message body
pub fn sanitize_message_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    render_children(fragment.root_element(), &mut out);

    normalize_whitespace(&out)
}

/// Escape text for inclusion in HTML
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Plain text to HTML with literal newlines turned into `<br>`
pub fn text_to_html(text: &str) -> String {
    escape_html(text).replace("\r\n", "\n").replace('\n', "<br>")
}

fn render_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    render_element(child, out);
                }
            }
            _ => {}
        }
    }
}

fn render_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name().to_ascii_lowercase();

    let wrapper = match name.as_str() {
        "br" => {
            out.push_str("<br>");
            return;
        }
        "p" => Some("p"),
        "b" | "strong" => Some("strong"),
        "i" | "em" => Some("em"),
        "u" => Some("u"),
        "ul" => Some("ul"),
        "ol" => Some("ol"),
        "li" => Some("li"),
        "a" => {
            match element.value().attr("href").filter(|href| is_safe_link(href)) {
                Some(href) => {
                    out.push_str(&format!(
                        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">",
                        escape_html(href)
                    ));
                    render_children(element, out);
                    out.push_str("</a>");
                }
                None => render_children(element, out),
            }
            return;
        }
        other if DROPPED_ELEMENTS.contains(&other) => return,
        _ => None,
    };

    match wrapper {
        Some(tag) => {
            out.push('<');
            out.push_str(tag);
            out.push('>');
            render_children(element, out);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        None => render_children(element, out),
    }
}

fn is_safe_link(href: &str) -> bool {
    let href = href.trim().to_ascii_lowercase();
    SAFE_LINK_SCHEMES.iter().any(|scheme| href.starts_with(scheme))
}

fn normalize_whitespace(html: &str) -> String {
    static PATTERNS: OnceLock<(Regex, Regex, Regex)> = OnceLock::new();
    let (runs, around_br, between_paragraphs) = PATTERNS.get_or_init(|| {
        (
            Regex::new(r"\s+").expect("valid regex"),
            Regex::new(r"\s*<br>\s*").expect("valid regex"),
            Regex::new(r"\s*</p>\s*<p>\s*").expect("valid regex"),
        )
    });

    let collapsed = runs.replace_all(html, " ");
    let collapsed = around_br.replace_all(&collapsed, "<br>");
    let collapsed = between_paragraphs.replace_all(&collapsed, "</p><p>");
    collapsed.trim().to_string()
}
