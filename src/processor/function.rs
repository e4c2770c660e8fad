//! Structural parser for function blocks.
//
//  Layout of a function block (lead already stripped):
//
//      [function] NAME [... - SHORT DESCRIPTION]
//      @arg: description
//            continued description
//
//      Heading: paragraph text
//      continued paragraph text
//
//  Members end at a blank line or the next `@tag:` line; paragraphs end
//  only at a blank line.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Block, Diagnostics, FunctionContent, Member, NO_HEADING, Paragraph};

/// The only word allowed in front of the function name.
pub const DECLARATION_KEYWORD: &str = "function";
/// Member name kept verbatim, sigil included.
const RETURN_TAG: &str = "return";

pub const WARN_EMPTY: &str = "empty function block";
pub const WARN_NOT_FUNCTION: &str = "ignoring non-function block";
pub const ERR_MISSING_TITLE: &str = "missing title in function block";

static LEADING_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)\s+[A-Za-z_]").unwrap());
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9:_+-]+").unwrap());
static SHORT_DESCRIPTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s-\s+(\S.*)$").unwrap());
static MEMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@([A-Za-z0-9_+-]+):(.*)$").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([\w ]+):(.*)$").unwrap());

/// Space-joined run of text pieces; empty pieces are skipped.
#[derive(Default)]
struct Text(Vec<String>);

impl Text {
    fn push(&mut self, piece: &str) {
        let piece = piece.trim();
        if !piece.is_empty() {
            self.0.push(piece.to_string());
        }
    }

    fn joined(&self) -> String {
        self.0.join(" ")
    }
}

/// Parse a function block's lines.
///
/// Returns `None` when the block has to be dropped; the reason has been
/// recorded in `diagnostics` by then.
pub fn parse(block: &Block, diagnostics: &mut Diagnostics) -> Option<FunctionContent> {
    // content line `i` sits on file line `initial_line + 1 + i`
    let line_of = |i: usize| block.initial_line + 1 + i;

    let header_idx = block.lines.iter().position(|l| !l.trim().is_empty());
    if header_idx.is_none() {
        diagnostics.warn(&block.file, block.initial_line, WARN_EMPTY);
    }
    let header_idx = header_idx.unwrap_or(block.lines.len());
    let header = block.lines.get(header_idx).map_or("", |l| l.trim());

    let title = match LEADING_WORD.captures(header) {
        Some(caps) if &caps[1] == DECLARATION_KEYWORD => {
            header[DECLARATION_KEYWORD.len()..].trim_start()
        }
        Some(_) => {
            diagnostics.warn(&block.file, line_of(header_idx), WARN_NOT_FUNCTION);
            return None;
        }
        None => header,
    };

    let Some(name) = NAME.find(title) else {
        diagnostics.error(&block.file, line_of(header_idx), ERR_MISSING_TITLE);
        return None;
    };

    let short_description = SHORT_DESCRIPTION
        .captures(header)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();

    let (members, description) = parse_body(block.lines.iter().skip(header_idx + 1));

    Some(FunctionContent {
        name: name.as_str().to_string(),
        short_description,
        members,
        description,
    })
}

fn parse_body<'a>(lines: impl Iterator<Item = &'a String>) -> (Vec<Member>, Vec<Paragraph>) {
    let mut members = Vec::new();
    let mut paragraphs = Vec::new();
    let mut lines = lines.map(|l| l.trim()).peekable();

    while let Some(line) = lines.next() {
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = MEMBER.captures(line) {
            let name = match &caps[1] {
                RETURN_TAG => format!("@{RETURN_TAG}"),
                tag => tag.to_string(),
            };
            let mut text = Text::default();
            text.push(&caps[2]);
            while let Some(next) = lines.next_if(|l| !l.is_empty() && !MEMBER.is_match(l)) {
                text.push(next);
            }
            members.push(Member {
                name,
                description: text.joined(),
            });
            continue;
        }

        let mut text = Text::default();
        let heading = match HEADING.captures(line) {
            Some(caps) => {
                text.push(&caps[2]);
                caps[1].to_string()
            }
            None => {
                text.push(line);
                NO_HEADING.to_string()
            }
        };
        while let Some(next) = lines.next_if(|l| !l.is_empty()) {
            text.push(next);
        }
        paragraphs.push(Paragraph {
            heading,
            paragraph: text.joined(),
        });
    }

    (members, paragraphs)
}
