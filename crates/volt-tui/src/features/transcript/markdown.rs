//! Terminal markdown rendering.
//!
//! Parsing produces a width-independent [`MarkdownDoc`]; wrapping happens at
//! paint time so a resize never requires re-parsing the transcript.

use comfy_table::{ContentArrangement, Table};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthStr;
use volt_core::markdown::{DIAGRAM_TAG, MarkdownRenderer, code_block_lang};

use super::style::{Style, StyledLine, StyledSpan};
use super::wrap::{WrapOptions, wrap_styled_spans};
use crate::common::sanitize_for_display;

const QUOTE_PREFIX: &str = "▎ ";
const BULLET: &str = "• ";
const MAX_RULE_WIDTH: usize = 40;
const MIN_TABLE_WIDTH: usize = 10;

/// Renders markdown for the terminal transcript.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalMarkdown;

impl MarkdownRenderer for TerminalMarkdown {
    type Output = MarkdownDoc;

    fn render(&self, source: &str) -> MarkdownDoc {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut builder = DocBuilder::default();
        for event in Parser::new_ext(source, options) {
            builder.event(event);
        }
        builder.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph {
        spans: Vec<StyledSpan>,
        quoted: bool,
    },
    ListItem {
        depth: usize,
        /// `None` for a continuation paragraph inside the same item.
        marker: Option<(String, Style)>,
        marker_width: usize,
        spans: Vec<StyledSpan>,
    },
    Code {
        lang: Option<String>,
        text: String,
    },
    /// Fenced block tagged with the diagram language; shown as source.
    Diagram {
        text: String,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Rule,
    Blank,
}

/// Parsed markdown, ready to be laid out at any width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownDoc {
    blocks: Vec<Block>,
}

impl MarkdownDoc {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Lays the document out as styled lines no wider than `width`, except
    /// for code which is clipped by the viewport instead of wrapped.
    pub fn lines(&self, width: usize) -> Vec<StyledLine> {
        let mut out = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph { spans, quoted } => {
                    let opts = if *quoted {
                        WrapOptions::with_prefix(
                            width,
                            vec![StyledSpan::new(QUOTE_PREFIX, Style::BlockQuote)],
                        )
                    } else {
                        WrapOptions::new(width)
                    };
                    out.extend(wrap_styled_spans(spans, &opts));
                }
                Block::ListItem {
                    depth,
                    marker,
                    marker_width,
                    spans,
                } => {
                    let indent = "  ".repeat(*depth);
                    let hang = format!("{indent}{}", " ".repeat(*marker_width));
                    let first_prefix = match marker {
                        Some((text, style)) => vec![
                            StyledSpan::new(indent, Style::Plain),
                            StyledSpan::new(text.clone(), *style),
                        ],
                        None => vec![StyledSpan::new(hang.clone(), Style::Plain)],
                    };
                    let opts = WrapOptions {
                        width,
                        first_prefix,
                        rest_prefix: vec![StyledSpan::new(hang, Style::Plain)],
                    };
                    out.extend(wrap_styled_spans(spans, &opts));
                }
                Block::Code { lang, text } => {
                    let fence = format!("```{}", lang.as_deref().unwrap_or_default());
                    push_fenced(&mut out, &fence, text, Style::CodeBlock);
                }
                Block::Diagram { text } => {
                    push_fenced(&mut out, &format!("```{DIAGRAM_TAG}"), text, Style::Diagram);
                }
                Block::Table { header, rows } => {
                    out.extend(
                        render_table(header, rows, width.max(MIN_TABLE_WIDTH))
                            .into_iter()
                            .map(|line| StyledLine::plain(line, Style::Table)),
                    );
                }
                Block::Rule => {
                    out.push(StyledLine::plain(
                        "─".repeat(width.min(MAX_RULE_WIDTH)),
                        Style::Rule,
                    ));
                }
                Block::Blank => out.push(StyledLine::empty()),
            }
        }
        out
    }
}

fn push_fenced(out: &mut Vec<StyledLine>, fence: &str, text: &str, style: Style) {
    out.push(StyledLine::plain(fence, Style::CodeFence));
    for line in text.trim_end_matches('\n').split('\n') {
        out.push(StyledLine {
            spans: vec![
                StyledSpan::new("  ", Style::Plain),
                StyledSpan::new(sanitize_for_display(line), style),
            ],
        });
    }
    out.push(StyledLine::plain("```", Style::CodeFence));
}

fn render_table(header: &[String], rows: &[Vec<String>], width: usize) -> Vec<String> {
    let mut table = Table::new();
    table.set_width(width as u16);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if !header.is_empty() {
        table.set_header(header);
    }
    for row in rows {
        table.add_row(row);
    }
    table.to_string().lines().map(String::from).collect()
}

#[derive(Debug, Default)]
struct TableBuffer {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

#[derive(Debug)]
struct ListFrame {
    next_number: Option<u64>,
    item_marked: bool,
}

#[derive(Debug, Default)]
struct DocBuilder {
    blocks: Vec<Block>,
    spans: Vec<StyledSpan>,
    styles: Vec<Style>,
    /// Open fenced or indented code block: (language, text).
    code: Option<(Option<String>, String)>,
    lists: Vec<ListFrame>,
    quote_depth: usize,
    table: Option<TableBuffer>,
}

impl DocBuilder {
    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(Style::Model)
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.push_str(&code);
                } else {
                    self.spans
                        .push(StyledSpan::new(sanitize_for_display(&code), Style::CodeInline));
                }
            }
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.text("\n"),
            Event::Rule => {
                self.flush();
                self.blocks.push(Block::Rule);
                self.blocks.push(Block::Blank);
            }
            Event::TaskListMarker(done) => {
                let mark = if done { "[x] " } else { "[ ] " };
                self.spans.push(StyledSpan::new(mark, Style::ListBullet));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.styles.push(match level {
                    HeadingLevel::H1 => Style::H1,
                    HeadingLevel::H2 => Style::H2,
                    _ => Style::H3,
                });
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => code_block_lang(&info).map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((lang, String::new()));
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(ListFrame {
                    next_number: start,
                    item_marked: false,
                });
            }
            Tag::Item => {
                self.flush();
                if let Some(list) = self.lists.last_mut() {
                    list.item_marked = false;
                }
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
                self.styles.push(Style::BlockQuote);
            }
            Tag::Emphasis => self.styles.push(Style::Emphasis),
            Tag::Strong => self.styles.push(Style::Strong),
            Tag::Strikethrough => self.styles.push(Style::Strikethrough),
            Tag::Link { .. } => self.styles.push(Style::Link),
            Tag::Table(_) => {
                self.flush();
                self.table = Some(TableBuffer::default());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blocks.push(Block::Blank);
                }
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.styles.pop();
                self.blocks.push(Block::Blank);
            }
            TagEnd::CodeBlock => {
                if let Some((lang, text)) = self.code.take() {
                    let block = if lang.as_deref() == Some(DIAGRAM_TAG) {
                        Block::Diagram { text }
                    } else {
                        Block::Code { lang, text }
                    };
                    self.blocks.push(block);
                    self.blocks.push(Block::Blank);
                }
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blocks.push(Block::Blank);
                }
            }
            TagEnd::Item => {
                self.flush();
                if let Some(n) = self.lists.last_mut().and_then(|l| l.next_number.as_mut()) {
                    *n += 1;
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.styles.pop();
                self.blocks.push(Block::Blank);
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.styles.pop();
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.cell);
                    table.row.push(cell);
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.row);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.blocks.push(Block::Table {
                        header: table.header,
                        rows: table.rows,
                    });
                    self.blocks.push(Block::Blank);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, code)) = self.code.as_mut() {
            code.push_str(text);
        } else if let Some(table) = self.table.as_mut() {
            table.cell.push_str(text);
        } else {
            let style = self.style();
            self.spans
                .push(StyledSpan::new(sanitize_for_display(text), style));
        }
    }

    /// Turns pending inline spans into a block.
    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.spans);
        let depth = self.lists.len().saturating_sub(1);

        let Some(list) = self.lists.last_mut() else {
            self.blocks.push(Block::Paragraph {
                spans,
                quoted: self.quote_depth > 0,
            });
            return;
        };

        let (text, style) = match list.next_number {
            Some(n) => (format!("{n}. "), Style::ListNumber),
            None => (BULLET.to_string(), Style::ListBullet),
        };
        let marker_width = text.width();
        let marker = (!list.item_marked).then_some((text, style));
        list.item_marked = true;

        self.blocks.push(Block::ListItem {
            depth,
            marker,
            marker_width,
            spans,
        });
    }

    fn finish(mut self) -> MarkdownDoc {
        self.flush();
        // An unterminated fence mid-stream still shows what has arrived.
        if let Some((lang, text)) = self.code.take() {
            self.blocks.push(Block::Code { lang, text });
        }
        while self.blocks.last() == Some(&Block::Blank) {
            self.blocks.pop();
        }
        MarkdownDoc {
            blocks: self.blocks,
        }
    }
}
