use std::fmt::Write as _;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

use super::{CodeBlockExtension, MarkdownRenderer, code_block_lang};
use crate::stream::{MessageView, Sender};

/// Markdown to HTML renderer backed by pulldown-cmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer {
    extension: Option<CodeBlockExtension>,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the fenced code block hook.
    #[must_use]
    pub fn with_extension(mut self, extension: CodeBlockExtension) -> Self {
        self.extension = Some(extension);
        self
    }

    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options
    }
}

impl MarkdownRenderer for HtmlRenderer {
    type Output = String;

    fn render(&self, source: &str) -> String {
        let parser = Parser::new_ext(source, Self::options());
        let mut out = String::with_capacity(source.len() * 3 / 2);

        let Some(extension) = self.extension else {
            html::push_html(&mut out, parser);
            return out;
        };

        let mut events: Vec<Event<'_>> = Vec::new();
        let mut fenced: Option<FencedBlock<'_>> = None;

        for event in parser {
            if let Some(block) = fenced.as_mut() {
                match event {
                    Event::Text(text) => {
                        block.code.push_str(&text);
                        block.inner.push(Event::Text(text));
                    }
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some(block) = fenced.take() {
                            block.finish(extension, &mut events);
                        }
                    }
                    other => block.inner.push(other),
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    fenced = Some(FencedBlock {
                        info,
                        code: String::new(),
                        inner: Vec::new(),
                    });
                }
                other => events.push(other),
            }
        }

        if let Some(block) = fenced.take() {
            block.finish(extension, &mut events);
        }

        html::push_html(&mut out, events.into_iter());
        out
    }
}

/// A fenced code block buffered until its end tag.
struct FencedBlock<'a> {
    info: CowStr<'a>,
    code: String,
    inner: Vec<Event<'a>>,
}

impl<'a> FencedBlock<'a> {
    fn finish(self, extension: CodeBlockExtension, events: &mut Vec<Event<'a>>) {
        if let Some(replacement) = extension(code_block_lang(&self.info), &self.code) {
            events.push(Event::Html(replacement.into()));
            return;
        }
        events.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(self.info))));
        events.extend(self.inner);
        events.push(Event::End(TagEnd::CodeBlock));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HtmlBody {
    Loading,
    Rendered(String),
    Error(String),
}

#[derive(Debug, Clone)]
struct HtmlMessage {
    sender: Sender,
    body: HtmlBody,
}

/// Ordered list of message containers rendered as HTML.
#[derive(Debug, Default)]
pub struct HtmlTranscript {
    renderer: HtmlRenderer,
    messages: Vec<HtmlMessage>,
}

impl HtmlTranscript {
    pub fn new(renderer: HtmlRenderer) -> Self {
        Self {
            renderer,
            messages: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether the message still shows the loading placeholder.
    pub fn is_loading(&self, handle: usize) -> bool {
        self.messages
            .get(handle)
            .is_some_and(|msg| msg.body == HtmlBody::Loading)
    }

    /// Inner HTML of a single message.
    pub fn message_html(&self, handle: usize) -> Option<&str> {
        self.messages.get(handle).map(|msg| match &msg.body {
            HtmlBody::Loading => "",
            HtmlBody::Rendered(html) | HtmlBody::Error(html) => html.as_str(),
        })
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for msg in &self.messages {
            let _ = write!(out, "<div class=\"message {}\">", msg.sender.as_str());
            match &msg.body {
                HtmlBody::Loading => out.push_str("<div class=\"loading\"></div>"),
                HtmlBody::Rendered(html) => out.push_str(html),
                HtmlBody::Error(message) => {
                    let _ = write!(out, "<p class=\"error\">{message}</p>");
                }
            }
            out.push_str("</div>\n");
        }
        out
    }
}

impl MessageView for HtmlTranscript {
    type Handle = usize;
    type Rendered = String;

    fn append(&mut self, sender: Sender, content: &str, loading: bool) -> usize {
        let body = if loading {
            HtmlBody::Loading
        } else {
            HtmlBody::Rendered(self.renderer.render(content))
        };
        self.messages.push(HtmlMessage { sender, body });
        self.scroll_to_bottom();
        self.messages.len() - 1
    }

    fn clear(&mut self, handle: usize) {
        if let Some(msg) = self.messages.get_mut(handle) {
            msg.body = HtmlBody::Rendered(String::new());
        }
    }

    fn set_rendered(&mut self, handle: usize, rendered: String) {
        if let Some(msg) = self.messages.get_mut(handle) {
            msg.body = HtmlBody::Rendered(rendered);
        }
    }

    fn set_error(&mut self, handle: usize, message: &str) {
        if let Some(msg) = self.messages.get_mut(handle) {
            msg.body = HtmlBody::Error(message.to_string());
        }
    }

    // Output is written top to bottom; there is no viewport to move.
    fn scroll_to_bottom(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::diagram_block;

    #[test]
    fn test_render_without_extension_matches_default() {
        let source = "# Title\n\n```mermaid\nA --> B\n```\n";
        let plain = HtmlRenderer::new().render(source);
        assert!(plain.contains("<h1>Title</h1>"));
        assert!(plain.contains("<code class=\"language-mermaid\">A --&gt; B\n</code>"));
    }

    #[test]
    fn test_extension_replaces_diagram_block() {
        let renderer = HtmlRenderer::new().with_extension(diagram_block);
        let html = renderer.render("Intro\n\n```mermaid\ngraph TD\n  A-->B\n```\n\nAfter");
        assert!(html.contains("<pre class=\"mermaid\">graph TD\n  A--&gt;B\n</pre>"));
        assert!(html.contains("<p>Intro</p>"));
        assert!(html.contains("<p>After</p>"));
        assert!(!html.contains("language-mermaid"));
    }

    #[test]
    fn test_extension_leaves_other_blocks_untouched() {
        let source = "```rust\nlet x = 1 < 2;\n```\n\n    indented\n";
        let with = HtmlRenderer::new().with_extension(diagram_block).render(source);
        let without = HtmlRenderer::new().render(source);
        assert_eq!(with, without);
    }

    #[test]
    fn test_unterminated_fence_still_renders() {
        let renderer = HtmlRenderer::new().with_extension(diagram_block);
        let html = renderer.render("```mermaid\ngraph TD");
        assert!(html.contains("<pre class=\"mermaid\">"));
    }

    #[test]
    fn test_transcript_message_lifecycle() {
        let mut view = HtmlTranscript::new(HtmlRenderer::new());
        let user = view.append(Sender::User, "hello", false);
        let model = view.append(Sender::Model, "", true);

        assert_eq!(view.len(), 2);
        assert!(view.is_loading(model));
        assert_eq!(view.message_html(user), Some("<p>hello</p>\n"));

        view.clear(model);
        assert!(!view.is_loading(model));
        view.set_error(model, "failed");
        let html = view.to_html();
        assert!(html.contains("<div class=\"message user\"><p>hello</p>\n</div>"));
        assert!(html.contains("<div class=\"message model\"><p class=\"error\">failed</p></div>"));
    }
}
