//! Block extraction and page layout.
//!
//! Markdown is parsed with comrak and flattened into a list of [`Block`]s;
//! inline formatting (emphasis, links, inline code) collapses to plain text.
//! [`layout`] then word-wraps every block against the printable width and
//! flows the lines top-down onto as many pages as needed.
//!
//! Glyph widths are estimated from an average advance per font face rather
//! than measured, which keeps this stage independent of the PDF engine. The
//! averages are slightly generous so wrapped lines never overrun the margin.

use crate::config::RenderConfig;
use comrak::nodes::{AstNode, ListType, NodeList, NodeValue};
use comrak::{parse_document, Arena, Options};

/// Horizontal indent per list nesting level, in points.
const LIST_INDENT_PT: f32 = 18.0;
/// Indent of code blocks and block quotes, in points.
const BLOCK_INDENT_PT: f32 = 14.0;
/// Heading sizes relative to the body font, for levels 1–6.
const HEADING_SCALE: [f32; 6] = [1.9, 1.55, 1.3, 1.15, 1.05, 1.0];
const TAB_WIDTH: usize = 4;

/// A block-level element of a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    /// `marker` is `•` for bullets, `N.` for ordered items, empty for
    /// continuation paragraphs of the same item.
    ListItem {
        depth: usize,
        marker: String,
        text: String,
    },
    /// Verbatim lines, tabs expanded.
    Code(Vec<String>),
    Quote(String),
    TableRow { cells: Vec<String>, header: bool },
    Rule,
}

/// Parse Markdown into blocks in document order.
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let arena = Arena::new();
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;

    let root = parse_document(&arena, markdown, &options);
    let mut blocks = Vec::new();
    collect_children(root, 0, &mut blocks);
    blocks
}

fn collect_children<'a>(node: &'a AstNode<'a>, depth: usize, out: &mut Vec<Block>) {
    for child in node.children() {
        collect_block(child, depth, out);
    }
}

fn collect_block<'a>(node: &'a AstNode<'a>, depth: usize, out: &mut Vec<Block>) {
    let value = node.data.borrow().value.clone();
    match value {
        NodeValue::Heading(heading) => out.push(Block::Heading {
            level: heading.level.clamp(1, 6),
            text: inline_text(node),
        }),
        NodeValue::Paragraph => {
            let text = inline_text(node);
            if !text.is_empty() {
                out.push(Block::Paragraph(text));
            }
        }
        NodeValue::CodeBlock(code) => out.push(Block::Code(
            code.literal
                .lines()
                .map(|l| l.replace('\t', &" ".repeat(TAB_WIDTH)))
                .collect(),
        )),
        NodeValue::List(list) => collect_list(node, &list, depth, out),
        NodeValue::BlockQuote => {
            let mut inner = Vec::new();
            collect_children(node, depth, &mut inner);
            out.extend(inner.into_iter().map(|b| match b {
                Block::Paragraph(text) => Block::Quote(text),
                other => other,
            }));
        }
        NodeValue::ThematicBreak => out.push(Block::Rule),
        NodeValue::Table(..) => {
            for row in node.children() {
                let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
                let cells = row.children().map(inline_text).collect();
                out.push(Block::TableRow { cells, header });
            }
        }
        NodeValue::HtmlBlock(_) | NodeValue::FrontMatter(_) => {}
        _ => collect_children(node, depth, out),
    }
}

fn collect_list<'a>(node: &'a AstNode<'a>, list: &NodeList, depth: usize, out: &mut Vec<Block>) {
    for (i, item) in node.children().enumerate() {
        let mut marker = Some(match list.list_type {
            ListType::Bullet => "\u{2022}".to_string(),
            ListType::Ordered => format!("{}.", list.start + i),
        });

        for part in item.children() {
            let value = part.data.borrow().value.clone();
            match value {
                NodeValue::Paragraph => out.push(Block::ListItem {
                    depth,
                    marker: marker.take().unwrap_or_default(),
                    text: inline_text(part),
                }),
                NodeValue::List(nested) => {
                    if let Some(m) = marker.take() {
                        out.push(Block::ListItem {
                            depth,
                            marker: m,
                            text: String::new(),
                        });
                    }
                    collect_list(part, &nested, depth + 1, out);
                }
                _ => collect_block(part, depth + 1, out),
            }
        }

        // Empty item: "-" on its own line.
        if let Some(m) = marker {
            out.push(Block::ListItem {
                depth,
                marker: m,
                text: String::new(),
            });
        }
    }
}

/// Concatenate the inline content of `node`, collapsing whitespace.
fn inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut buf = String::new();
    push_inline(node, &mut buf);
    buf.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_inline<'a>(node: &'a AstNode<'a>, buf: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => buf.push_str(text),
            NodeValue::Code(code) => buf.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => buf.push(' '),
            NodeValue::HtmlInline(_) | NodeValue::Image(_) => {}
            _ => push_inline(child, buf),
        }
    }
}

// ── Layout ───────────────────────────────────────────────────────────────

/// The standard PDF font used for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
    Mono,
}

impl FontFace {
    /// Average glyph advance as a fraction of the font size.
    pub fn average_advance(self) -> f32 {
        match self {
            FontFace::Regular | FontFace::Italic => 0.52,
            FontFace::Bold => 0.56,
            FontFace::Mono => 0.6,
        }
    }
}

/// One line of text at an absolute page position.
///
/// `x`/`y` are in PDF points from the bottom-left corner; `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub face: FontFace,
    pub size: f32,
    pub x: f32,
    pub y: f32,
}

/// Everything drawn on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub items: Vec<PlacedText>,
}

/// Wrap and paginate `blocks`. Always returns at least one page.
pub fn layout(blocks: &[Block], config: &RenderConfig) -> Vec<PageLayout> {
    let mut flow = Flow::new(config);
    let base = config.font_size;

    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                let size = base * HEADING_SCALE[usize::from(level.saturating_sub(1)).min(5)];
                flow.gap(size * 0.6);
                flow.paragraph(text, FontFace::Bold, size, 0.0, 0.0);
                flow.gap(base * 0.3);
            }
            Block::Paragraph(text) => {
                flow.paragraph(text, FontFace::Regular, base, 0.0, 0.0);
                flow.gap(base * 0.6);
            }
            Block::ListItem {
                depth,
                marker,
                text,
            } => {
                let indent = *depth as f32 * LIST_INDENT_PT;
                let (first, hanging) = if marker.is_empty() {
                    (text.clone(), 0.0)
                } else {
                    let hang = (marker.chars().count() + 1) as f32
                        * base
                        * FontFace::Regular.average_advance();
                    (format!("{marker} {text}"), hang)
                };
                // Continuation paragraphs align with the item text.
                let indent = if marker.is_empty() {
                    indent + 2.0 * base * FontFace::Regular.average_advance()
                } else {
                    indent
                };
                flow.paragraph(&first, FontFace::Regular, base, indent, hanging);
                flow.gap(base * 0.2);
            }
            Block::Code(lines) => {
                let size = base * 0.9;
                flow.gap(base * 0.2);
                for line in lines {
                    flow.verbatim(line, FontFace::Mono, size, BLOCK_INDENT_PT);
                }
                flow.gap(base * 0.6);
            }
            Block::Quote(text) => {
                flow.paragraph(text, FontFace::Italic, base, BLOCK_INDENT_PT, 0.0);
                flow.gap(base * 0.6);
            }
            Block::TableRow { cells, header } => {
                let face = if *header {
                    FontFace::Bold
                } else {
                    FontFace::Regular
                };
                flow.paragraph(&cells.join("  |  "), face, base, 0.0, 0.0);
                flow.gap(base * 0.15);
            }
            Block::Rule => {
                let size = base * 0.8;
                let n = max_chars(config.text_width_pt(), FontFace::Regular, size);
                flow.gap(base * 0.3);
                flow.verbatim(&"-".repeat(n), FontFace::Regular, size, 0.0);
                flow.gap(base * 0.3);
            }
        }
    }

    flow.finish()
}

/// How many glyphs of `face` at `size` fit into `width`.
fn max_chars(width: f32, face: FontFace, size: f32) -> usize {
    ((width / (size * face.average_advance())).floor() as usize).max(1)
}

/// Greedy word wrap. Words longer than a line are split mid-word.
pub fn wrap_words(text: &str, first_width: usize, rest_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    let limit = |lines: &Vec<String>| {
        if lines.is_empty() {
            first_width.max(1)
        } else {
            rest_width.max(1)
        }
    };

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let width = limit(&lines);
            let sep = usize::from(current_len > 0);
            if current_len + sep + word.len() <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.extend(word.iter());
                current_len += sep + word.len();
                break;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            // Word alone is too long for an empty line.
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
            if word.is_empty() {
                break;
            }
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Top-down line placement with page breaks.
struct Flow<'c> {
    config: &'c RenderConfig,
    page_height: f32,
    pages: Vec<PageLayout>,
    current: PageLayout,
    /// Distance from the top edge to the top of the next line.
    cursor: f32,
}

impl<'c> Flow<'c> {
    fn new(config: &'c RenderConfig) -> Self {
        let (_, page_height) = config.page_size_pt();
        Self {
            config,
            page_height,
            pages: Vec::new(),
            current: PageLayout::default(),
            cursor: config.margin_pt,
        }
    }

    /// Vertical space between blocks; swallowed at the top of a page.
    fn gap(&mut self, pts: f32) {
        if self.cursor > self.config.margin_pt {
            self.cursor += pts;
        }
    }

    fn paragraph(&mut self, text: &str, face: FontFace, size: f32, indent: f32, hanging: f32) {
        let width = self.config.text_width_pt() - indent;
        let first = max_chars(width, face, size);
        let rest = max_chars(width - hanging, face, size);
        for (i, line) in wrap_words(text, first, rest).into_iter().enumerate() {
            let x = if i == 0 { indent } else { indent + hanging };
            self.line(line, face, size, x);
        }
    }

    /// Lines whose spacing must be preserved; hard-wrapped by character.
    fn verbatim(&mut self, text: &str, face: FontFace, size: f32, indent: f32) {
        let width = max_chars(self.config.text_width_pt() - indent, face, size);
        let chars: Vec<char> = text.trim_end().chars().collect();
        if chars.is_empty() {
            self.line(String::new(), face, size, indent);
            return;
        }
        for chunk in chars.chunks(width) {
            self.line(chunk.iter().collect(), face, size, indent);
        }
    }

    fn line(&mut self, text: String, face: FontFace, size: f32, indent: f32) {
        let height = size * self.config.line_spacing;
        let bottom_limit = self.page_height - self.config.margin_pt;
        if self.cursor + height > bottom_limit && self.cursor > self.config.margin_pt {
            self.break_page();
        }

        if !text.is_empty() {
            self.current.items.push(PlacedText {
                text,
                face,
                size,
                x: self.config.margin_pt + indent,
                y: self.page_height - (self.cursor + size),
            });
        }
        self.cursor += height;
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = self.config.margin_pt;
    }

    fn finish(mut self) -> Vec<PageLayout> {
        if !self.current.items.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}
