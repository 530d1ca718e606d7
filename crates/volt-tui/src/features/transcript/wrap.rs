//! Width-aware wrapping of styled spans with hanging indents.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::style::{Style, StyledLine, StyledSpan};

#[derive(Debug, Clone, Default)]
pub struct WrapOptions {
    pub width: usize,
    /// Spans prepended to the first output line (e.g. a list marker).
    pub first_prefix: Vec<StyledSpan>,
    /// Spans prepended to every continuation line.
    pub rest_prefix: Vec<StyledSpan>,
}

impl WrapOptions {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Uses the same prefix on every line.
    pub fn with_prefix(width: usize, prefix: Vec<StyledSpan>) -> Self {
        Self {
            width,
            first_prefix: prefix.clone(),
            rest_prefix: prefix,
        }
    }
}

fn prefix_width(prefix: &[StyledSpan]) -> usize {
    prefix.iter().map(|s| s.text.width()).sum()
}

struct LineBuilder<'a> {
    opts: &'a WrapOptions,
    lines: Vec<StyledLine>,
    current: Vec<StyledSpan>,
    used: usize,
    /// Collapsed whitespace waiting for the next word on this line.
    pending_space: Option<Style>,
}

impl<'a> LineBuilder<'a> {
    fn new(opts: &'a WrapOptions) -> Self {
        Self {
            opts,
            lines: Vec::new(),
            current: Vec::new(),
            used: 0,
            pending_space: None,
        }
    }

    fn limit(&self) -> usize {
        let prefix = if self.lines.is_empty() {
            &self.opts.first_prefix
        } else {
            &self.opts.rest_prefix
        };
        self.opts.width.saturating_sub(prefix_width(prefix)).max(1)
    }

    fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        self.used += text.width();
        match self.current.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.current.push(StyledSpan::new(text, style)),
        }
    }

    fn break_line(&mut self) {
        let prefix = if self.lines.is_empty() {
            &self.opts.first_prefix
        } else {
            &self.opts.rest_prefix
        };
        let mut spans = prefix.clone();
        spans.append(&mut self.current);
        self.lines.push(StyledLine { spans });
        self.used = 0;
        self.pending_space = None;
    }

    /// Places `text` one character at a time, breaking wherever it overflows.
    fn push_chars(&mut self, text: &str, style: Style) {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0);
            if w > 0 && self.used > 0 && self.used + w > self.limit() {
                self.break_line();
            }
            self.push(ch.encode_utf8(&mut buf), style);
        }
    }

    fn push_word(&mut self, word: &str, style: Style) {
        let w = word.width();
        let space = usize::from(self.pending_space.is_some() && self.used > 0);

        if self.used > 0 && self.used + space + w > self.limit() {
            self.break_line();
        } else if let Some(space_style) = self.pending_space.take()
            && self.used > 0
        {
            self.push(" ", space_style);
        }
        self.pending_space = None;

        if w > self.limit() {
            self.push_chars(word, style);
        } else {
            self.push(word, style);
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        let mut rest = text;
        while !rest.is_empty() {
            let ws_len = rest.len() - rest.trim_start().len();
            if ws_len > 0 {
                self.pending_space = Some(style);
                rest = &rest[ws_len..];
                continue;
            }
            let word_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            self.push_word(&rest[..word_len], style);
            rest = &rest[word_len..];
        }
    }

    fn finish(mut self) -> Vec<StyledLine> {
        if !self.current.is_empty() || self.lines.is_empty() {
            self.break_line();
        }
        self.lines
    }
}

/// Wraps `spans` to `opts.width` columns.
///
/// Text breaks at word boundaries with runs of whitespace collapsed to one
/// space. Code breaks at any character and keeps its whitespace. A `\n`
/// inside a span forces a line break. Always returns at least one line.
pub fn wrap_styled_spans(spans: &[StyledSpan], opts: &WrapOptions) -> Vec<StyledLine> {
    let mut builder = LineBuilder::new(opts);

    for span in spans {
        for (i, part) in span.text.split('\n').enumerate() {
            if i > 0 {
                builder.break_line();
            }
            if span.style.is_code() {
                if let Some(space_style) = builder.pending_space.take()
                    && builder.used > 0
                {
                    builder.push(" ", space_style);
                }
                builder.push_chars(part, span.style);
            } else {
                builder.push_text(part, span.style);
            }
        }
    }

    builder.finish()
}
