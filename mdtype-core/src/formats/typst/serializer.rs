//! Block-level traversal.
//!
//! Unlike inline translation, block translation carries state across siblings: whether the
//! previous block was a heading (for the page-break policy) and how many diagrams have been
//! consumed. That state lives in a [`Translator`] created for a single conversion and dropped
//! afterwards.
//!
//! Top-level children are scanned with look-ahead to group nodes into non-breakable blocks:
//!
//! 1. `<!-- keep-together -->` … `<!-- /keep-together -->`, nesting aware. An unmatched start
//!    marker is treated as ordinary raw content.
//! 2. A paragraph directly followed by a code block, when `keep_code_with_previous` is set.

use super::inline::{translate_inline, translate_inlines};
use super::ConvertContext;
use crate::diagram::DIAGRAM_LANGUAGE;
use crate::ir::nodes::{CodeBlock, Document, Heading, List, Node};
use crate::paths::relative_path;

pub const TOC_MARKER: &str = "<!-- toc -->";
pub const PAGEBREAK_MARKER: &str = "<!-- pagebreak -->";
pub const KEEP_TOGETHER_START: &str = "<!-- keep-together -->";
pub const KEEP_TOGETHER_END: &str = "<!-- /keep-together -->";

const BLOCK_OPEN: &str = "#block(breakable: false)[\n";
const BLOCK_CLOSE: &str = "]\n\n";

/// State carried between sibling blocks during one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalState {
    pub previous_was_heading: bool,
    pub diagram_cursor: usize,
}

/// Translates the body of one document.
pub struct Translator<'a> {
    context: &'a ConvertContext,
    title_mode: bool,
    state: TraversalState,
}

impl<'a> Translator<'a> {
    pub fn new(context: &'a ConvertContext, title_mode: bool) -> Self {
        Self {
            context,
            title_mode,
            state: TraversalState::default(),
        }
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// Translate the top-level children of `document`, skipping its frontmatter.
    pub fn translate_document(&mut self, document: &Document) -> String {
        let nodes: Vec<&Node> = document
            .children
            .iter()
            .filter(|node| !matches!(node, Node::FrontMatter(_)))
            .collect();

        let mut output = String::new();
        let mut index = 0;
        while index < nodes.len() {
            let node = nodes[index];

            if node.is_raw_marker(KEEP_TOGETHER_START) {
                if let Some(end) = find_keep_together_end(&nodes, index) {
                    output.push_str(BLOCK_OPEN);
                    for inner in &nodes[index + 1..end] {
                        output.push_str(&self.translate_block(inner));
                    }
                    output.push_str(BLOCK_CLOSE);
                    index = end + 1;
                    continue;
                }
            }

            if self.context.config.keep_code_with_previous
                && matches!(node, Node::Paragraph(_))
                && matches!(nodes.get(index + 1), Some(Node::CodeBlock(_)))
            {
                output.push_str(BLOCK_OPEN);
                output.push_str(&self.translate_block(node));
                output.push_str(&self.translate_block(nodes[index + 1]));
                output.push_str(BLOCK_CLOSE);
                index += 2;
                continue;
            }

            output.push_str(&self.translate_block(node));
            index += 1;
        }
        output
    }

    /// Translate one node in block position.
    pub fn translate_block(&mut self, node: &Node) -> String {
        match node {
            Node::Heading(heading) => self.heading(heading),
            Node::Paragraph(children) => {
                self.state.previous_was_heading = false;
                format!("{}\n\n", translate_inlines(children))
            }
            Node::CodeBlock(code) => {
                self.state.previous_was_heading = false;
                self.code_block(code)
            }
            Node::List(list) => {
                self.state.previous_was_heading = false;
                self.list(list)
            }
            Node::ListItem(children) => self.list_item(children),
            Node::BlockQuote(children) => {
                self.state.previous_was_heading = false;
                let content: String = children
                    .iter()
                    .map(|child| self.translate_block(child))
                    .collect();
                format!("#quote[\n{content}]\n\n")
            }
            Node::Table(rows) => {
                self.state.previous_was_heading = false;
                table(rows)
            }
            Node::ThematicBreak => {
                self.state.previous_was_heading = false;
                "#line(length: 100%)\n\n".to_string()
            }
            Node::BlockMath(math) => {
                self.state.previous_was_heading = false;
                format!("$ {math} $\n\n")
            }
            // Raw content never separates a heading from the next one.
            Node::Raw(raw) => self.raw_block(raw),
            // Rows and cells only occur inside a table.
            Node::TableRow(_) | Node::TableCell(_) => String::new(),
            Node::Document(_) | Node::FrontMatter(_) => String::new(),
            Node::Text(_)
            | Node::Emphasis(_)
            | Node::Strong(_)
            | Node::Strikethrough(_)
            | Node::InlineCode(_)
            | Node::Link(_)
            | Node::Image(_)
            | Node::LineBreak
            | Node::InlineMath(_) => translate_inline(node),
        }
    }

    fn heading(&mut self, heading: &Heading) -> String {
        let page_break = match self.context.config.page_break_before_heading {
            Some(level) if heading.depth <= level && !self.state.previous_was_heading => {
                "#pagebreak(weak: true)\n"
            }
            _ => "",
        };
        self.state.previous_was_heading = true;

        let text = translate_inlines(&heading.children);
        if heading.depth == 1 && self.title_mode {
            format!("{page_break}#heading(level: 1, outlined: false)[{text}]\n\n")
        } else {
            let prefix = "=".repeat(usize::from(heading.depth));
            format!("{page_break}{prefix} {text}\n\n")
        }
    }

    fn code_block(&mut self, code: &CodeBlock) -> String {
        if code.language.as_deref() == Some(DIAGRAM_LANGUAGE) {
            // Diagrams are matched by position: the Nth diagram block takes the Nth rendered image.
            let Some(diagram) = self.context.diagrams.get(self.state.diagram_cursor) else {
                return String::new();
            };
            self.state.diagram_cursor += 1;
            let path = relative_path(&diagram.image_path, &self.context.output_dir);
            return format!("#figure(\n  image(\"{path}\", width: 80%),\n)\n\n");
        }

        let language = code.language.as_deref().unwrap_or_default();
        format!("```{language}\n{}\n```\n\n", code.value)
    }

    fn list(&mut self, list: &List) -> String {
        let marker = if list.ordered { '+' } else { '-' };
        let mut output = String::new();
        for item in &list.items {
            let content = match item {
                Node::ListItem(children) => self.list_item(children),
                other => self.translate_block(other),
            };
            output.push(marker);
            output.push(' ');
            output.push_str(&content);
        }
        output.push('\n');
        output
    }

    /// Paragraphs are unwrapped to their inline content. Continuation lines, nested lists
    /// included, are indented so that they stay inside the item.
    fn list_item(&mut self, children: &[Node]) -> String {
        let mut content = String::new();
        for child in children {
            match child {
                Node::Paragraph(inlines) => {
                    if !content.is_empty() && !content.ends_with('\n') {
                        content.push('\n');
                    }
                    content.push_str(&translate_inlines(inlines));
                }
                Node::List(list) => {
                    content.push('\n');
                    content.push_str(&self.list(list));
                }
                other => {
                    if !content.is_empty() && !content.ends_with('\n') {
                        content.push('\n');
                    }
                    content.push_str(&self.translate_block(other));
                }
            }
        }
        format!("{}\n", indent_continuation(content.trim()))
    }

    fn raw_block(&self, raw: &str) -> String {
        match raw.trim() {
            TOC_MARKER => {
                let depth = self
                    .context
                    .config
                    .toc_depth
                    .saturating_add(u32::from(self.title_mode));
                format!("#outline(depth: {depth})\n\n")
            }
            PAGEBREAK_MARKER => "#pagebreak()\n\n".to_string(),
            _ => String::new(),
        }
    }
}

/// Index of the end marker closing the keep-together group opened at `start`.
fn find_keep_together_end(nodes: &[&Node], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (index, node) in nodes.iter().enumerate().skip(start + 1) {
        if node.is_raw_marker(KEEP_TOGETHER_START) {
            depth += 1;
        } else if node.is_raw_marker(KEEP_TOGETHER_END) {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

fn table(rows: &[Node]) -> String {
    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };

    let header_cells = header.children();
    let mut output = format!("#figure(\n  table(\n    columns: {},\n", header_cells.len());
    for cell in header_cells {
        output.push_str(&format!("    [*{}*],\n", translate_inlines(cell.children()).trim()));
    }
    for row in body {
        for cell in row.children() {
            output.push_str(&format!("    [{}],\n", translate_inlines(cell.children()).trim()));
        }
    }
    output.push_str("  )\n)\n\n");
    output
}

fn indent_continuation(text: &str) -> String {
    let mut lines = text.lines();
    let mut output = lines.next().unwrap_or_default().to_string();
    for line in lines {
        output.push('\n');
        if !line.is_empty() {
            output.push_str("  ");
            output.push_str(line);
        }
    }
    output
}
