/// Inline content inside a heading or paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Literal(String),
    /// `*x*` when `double` is false, `**x**` when true
    Emphasis { double: bool, children: Vec<Inline> },
    LineBreak,
    Link {
        url: String,
        image: bool,
        children: Vec<Inline>,
    },
    Code(String),
    /// Something the renderer has no view for (inline HTML, ...); carries its kind
    Unsupported(String),
}

/// A single list item, holding arbitrary nested blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

/// Block-level elements parsed from Markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Paragraph {
        content: Vec<Inline>,
    },
    Quote {
        blocks: Vec<Block>,
    },
    Code {
        language: Option<String>,
        lines: Vec<String>,
    },
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
    ThematicBreak,
    Html(String),
    /// A construct with no renderer; carries its kind for diagnostics
    Unsupported(String),
}

impl Block {
    pub fn kind(&self) -> &str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::Quote { .. } => "quote",
            Block::Code { .. } => "code",
            Block::List { .. } => "list",
            Block::ThematicBreak => "thematic break",
            Block::Html(_) => "html",
            Block::Unsupported(kind) => kind,
        }
    }
}
