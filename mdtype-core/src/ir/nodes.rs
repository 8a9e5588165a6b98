//! Core data structures for the document tree.

/// A node of the document tree.
///
/// The set of kinds is closed: translators match on it exhaustively so that adding a kind is a
/// compile error everywhere it has to be handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Document(Document),
    Heading(Heading),
    Paragraph(Vec<Node>),
    Text(String),
    Emphasis(Vec<Node>),
    Strong(Vec<Node>),
    Strikethrough(Vec<Node>),
    InlineCode(String),
    CodeBlock(CodeBlock),
    Link(Link),
    Image(Image),
    List(List),
    ListItem(Vec<Node>),
    BlockQuote(Vec<Node>),
    Table(Vec<Node>),
    TableRow(Vec<Node>),
    TableCell(Vec<Node>),
    ThematicBreak,
    LineBreak,
    /// Raw HTML, either a block or an inline fragment.
    Raw(String),
    InlineMath(String),
    BlockMath(String),
    /// The frontmatter text, without its `---` delimiters.
    FrontMatter(String),
}

/// Represents the root of a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

/// Represents a heading with its depth (1-6).
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub depth: u8,
    pub children: Vec<Node>,
}

/// Represents a fenced or indented block of code.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub value: String,
}

/// Represents a hyperlink around inline content.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub url: String,
    pub children: Vec<Node>,
}

/// Represents an image reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub url: String,
    pub alt: String,
}

/// Represents a list of items.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<Node>,
}

impl Node {
    /// Convenience constructor for a text run.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Convenience constructor for a paragraph holding a single text run.
    pub fn paragraph(value: impl Into<String>) -> Self {
        Node::Paragraph(vec![Node::text(value)])
    }

    /// Convenience constructor for a heading holding a single text run.
    pub fn heading(depth: u8, value: impl Into<String>) -> Self {
        Node::Heading(Heading {
            depth,
            children: vec![Node::text(value)],
        })
    }

    /// Convenience constructor for a block of code.
    pub fn code_block(language: Option<&str>, value: impl Into<String>) -> Self {
        Node::CodeBlock(CodeBlock {
            language: language.map(str::to_string),
            value: value.into(),
        })
    }

    /// Returns the child sequence of container kinds, or an empty slice for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document(doc) => &doc.children,
            Node::Heading(heading) => &heading.children,
            Node::Link(link) => &link.children,
            Node::List(list) => &list.items,
            Node::Paragraph(children)
            | Node::Emphasis(children)
            | Node::Strong(children)
            | Node::Strikethrough(children)
            | Node::ListItem(children)
            | Node::BlockQuote(children)
            | Node::Table(children)
            | Node::TableRow(children)
            | Node::TableCell(children) => children,
            Node::Text(_)
            | Node::InlineCode(_)
            | Node::CodeBlock(_)
            | Node::Image(_)
            | Node::ThematicBreak
            | Node::LineBreak
            | Node::Raw(_)
            | Node::InlineMath(_)
            | Node::BlockMath(_)
            | Node::FrontMatter(_) => &[],
        }
    }

    /// Whether this is a raw-passthrough node whose trimmed content equals `marker`.
    pub fn is_raw_marker(&self, marker: &str) -> bool {
        matches!(self, Node::Raw(raw) if raw.trim() == marker)
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Visits every heading depth-first in document order.
    pub fn heading_depths(&self) -> Vec<u8> {
        fn walk(nodes: &[Node], out: &mut Vec<u8>) {
            for node in nodes {
                if let Node::Heading(heading) = node {
                    out.push(heading.depth);
                }
                walk(node.children(), out);
            }
        }

        let mut depths = Vec::new();
        walk(&self.children, &mut depths);
        depths
    }

    /// The raw frontmatter text, if the document starts with a frontmatter block.
    pub fn frontmatter(&self) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            Node::FrontMatter(text) => Some(text.as_str()),
            _ => None,
        })
    }
}
