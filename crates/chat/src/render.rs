use pulldown_cmark::{CowStr, Event, Options, Parser, html};

use crate::message::NodeBody;

/// Turns an answer into display markup.
///
/// With `markdown` on, Markdown syntax is rendered and inline HTML passes
/// through untouched. With it off, the answer is used verbatim.
pub fn render_answer(answer: &str, markdown: bool) -> String {
    if !markdown {
        return answer.to_string();
    }

    let parser = Parser::new_ext(
        answer,
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES,
    );
    let mut out = String::with_capacity(answer.len() + answer.len() / 2);
    html::push_html(&mut out, parser);
    out.truncate(out.trim_end().len());
    out
}

/// Escapes text so it displays literally inside an element body.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    html::push_html(&mut out, std::iter::once(Event::Text(CowStr::Borrowed(text))));
    out
}

pub fn body_html(body: &NodeBody<'_>) -> String {
    match body {
        NodeBody::Text(text) => escape_text(text),
        NodeBody::Markup(markup) => markup.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_emphasis_becomes_tags() {
        let html = render_answer("Prices are **fair**.", true);
        assert_eq!(html, "<p>Prices are <strong>fair</strong>.</p>");
    }

    #[test]
    fn inline_html_passes_through() {
        let html = render_answer("Our pricing is <b>$10/mo</b>.", true);
        assert!(html.contains("<b>$10/mo</b>"), "{html}");
    }

    #[test]
    fn lists_render_as_list_markup() {
        let html = render_answer("- vase\n- plate", true);
        assert!(html.contains("<ul>"));
        assert!(html.contains("<li>vase</li>"));
    }

    #[test]
    fn markdown_off_keeps_answer_verbatim() {
        assert_eq!(render_answer("**raw**", false), "**raw**");
    }

    #[test]
    fn escaped_text_shows_tags_literally() {
        assert_eq!(escape_text("<b>x</b> & y"), "&lt;b&gt;x&lt;/b&gt; &amp; y");
    }
}
