use serde::Serialize;
use std::path::PathBuf;

/// Markup tag of a block opened without a trailing `!<tag>`.
pub const MARKUP_NONE: &str = "none";
/// Markup every finalized function block carries.
pub const MARKUP_FUNCTION: &str = "function";
/// Heading of a paragraph that had no `Heading:` prefix.
pub const NO_HEADING: &str = "none";

/// Index of a block inside [`Run::blocks`]; doubles as its public id.
pub type BlockId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Generic,
    Function,
}

/// A finalized block exactly as the scanner captured it.
///
/// `lines` holds the content lines with the lead marker already stripped;
/// `lines.len()` is what the serializer reports as `lines.total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub markup: String,
    pub file: String,
    /// 1-based line number of the head marker.
    pub initial_line: usize,
    pub lines: Vec<String>,
}

/// ─────────────────────────────────────────────────────
/// Parsed content
/// ─────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub heading: String,
    pub paragraph: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionContent {
    pub name: String,
    #[serde(rename = "short-description")]
    pub short_description: String,
    pub members: Vec<Member>,
    pub description: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Function(FunctionContent),
    Generic(Vec<String>),
}

/// ─────────────────────────────────────────────────────
/// Diagnostics
/// ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: String,
    pub line: usize,
    pub message: String,
}

/// Every warning and error raised during a run, in the order raised.
/// Each one is also forwarded to the `log` facade.
#[derive(Debug, Default)]
pub struct Diagnostics {
    pub entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn warn(&mut self, file: &str, line: usize, message: &str) {
        log::warn!("{file}:{line}: {message}");
        self.push(Severity::Warning, file, line, message);
    }

    pub fn error(&mut self, file: &str, line: usize, message: &str) {
        log::error!("{file}:{line}: {message}");
        self.push(Severity::Error, file, line, message);
    }

    fn push(&mut self, severity: Severity, file: &str, line: usize, message: &str) {
        self.entries.push(Diagnostic {
            severity,
            file: file.to_string(),
            line,
            message: message.to_string(),
        });
    }

    pub fn contains(&self, message: &str) -> bool {
        self.entries.iter().any(|d| d.message == message)
    }
}

/// State shared by every stage of one extraction run.
///
/// Blocks are appended in discovery order across all input files, so a
/// block's id is always its index here.
#[derive(Debug, Default)]
pub struct Run {
    pub blocks: Vec<Block>,
    pub diagnostics: Diagnostics,
}

impl Run {
    pub fn next_id(&self) -> BlockId {
        self.blocks.len()
    }

    /// Store a finalized block and hand back its id.
    pub fn push(&mut self, mut block: Block) -> BlockId {
        let id = self.next_id();
        block.id = id;
        self.blocks.push(block);
        id
    }
}

/// ─────────────────────────────────────────────────────
/// Run options
/// ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Functions,
    Generic,
}

impl Selection {
    pub fn includes(self, kind: BlockKind) -> bool {
        match self {
            Selection::All => true,
            Selection::Functions => kind == BlockKind::Function,
            Selection::Generic => kind == BlockKind::Generic,
        }
    }
}

/// What to extract and how to classify files without a known extension.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub files: Vec<PathBuf>,
    pub default_filetype: Option<String>,
    pub selection: Selection,
}
