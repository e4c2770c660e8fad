//! Line-oriented block scanner.
//!
//! The scanner is a two-state machine driven one physical line at a time:
//!
//! * **skipping** – outside any block; a head match opens one.
//! * **capturing** – inside a block; a foot match closes it, a line with
//!   the lead marker is captured (lead stripped), anything else closes the
//!   block early with an "unclosed block" warning.
//!
//! Leading whitespace is ignored everywhere. Running out of input while
//! capturing finalizes the partial block silently.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, BufRead};

use super::delimiters::Delimiters;
use crate::model::{Block, BlockId, BlockKind, MARKUP_FUNCTION, MARKUP_NONE, Run};

/// `!<tag>` at the end of a head line.
static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"!([A-Za-z0-9_+-]+)\s*$").unwrap());

pub const WARN_UNCLOSED: &str = "unclosed block";
pub const WARN_FUNCTION_MARKUP: &str = "function blocks may not have a markup tag";

/// A block that is still being captured.
struct OpenBlock {
    kind: BlockKind,
    markup: String,
    initial_line: usize,
    lines: Vec<String>,
}

impl OpenBlock {
    fn into_block(self, file: &str) -> Block {
        Block {
            id: 0,
            kind: self.kind,
            markup: self.markup,
            file: file.to_string(),
            initial_line: self.initial_line,
            lines: self.lines,
        }
    }
}

pub struct Scanner<'d, R> {
    reader: R,
    file: String,
    delimiters: &'d Delimiters,
    line_no: usize,
    buf: Vec<u8>,
}

impl<'d, R: BufRead> Scanner<'d, R> {
    pub fn new(reader: R, file: impl Into<String>, delimiters: &'d Delimiters) -> Self {
        Self {
            reader,
            file: file.into(),
            delimiters,
            line_no: 0,
            buf: Vec::new(),
        }
    }

    /// Next physical line, without its line terminator.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        let mut end = self.buf.len();
        if self.buf[..end].ends_with(b"\n") {
            end -= 1;
        }
        if self.buf[..end].ends_with(b"\r") {
            end -= 1;
        }
        Ok(Some(String::from_utf8_lossy(&self.buf[..end]).into_owned()))
    }

    fn open(&self, line: &str) -> Option<OpenBlock> {
        let kind = self.delimiters.head(line)?;
        let markup = match (kind, MARKUP_TAG.captures(line)) {
            (BlockKind::Generic, Some(caps)) => caps[1].to_string(),
            _ => MARKUP_NONE.to_string(),
        };
        Some(OpenBlock {
            kind,
            markup,
            initial_line: self.line_no,
            lines: Vec::new(),
        })
    }

    /// Finalize on a foot match of kind `foot`.
    fn close(&self, mut block: OpenBlock, foot: BlockKind, run: &mut Run) -> BlockId {
        block.kind = if block.markup == MARKUP_FUNCTION {
            BlockKind::Function
        } else {
            foot
        };

        if block.kind == BlockKind::Function {
            if block.markup != MARKUP_FUNCTION && block.markup != MARKUP_NONE {
                run.diagnostics
                    .warn(&self.file, self.line_no, WARN_FUNCTION_MARKUP);
            }
            block.markup = MARKUP_FUNCTION.to_string();
        }

        run.push(block.into_block(&self.file))
    }

    /// Finalize without a foot: lead mismatch or end of input.
    fn abandon(&self, mut block: OpenBlock, run: &mut Run) -> BlockId {
        if block.kind == BlockKind::Function {
            block.markup = MARKUP_FUNCTION.to_string();
        }
        run.push(block.into_block(&self.file))
    }

    /// Scan forward to the end of the next block.
    ///
    /// Returns `Ok(Some(id))` when a block was read and stored in `run`,
    /// `Ok(None)` at end of input, and `Err` when reading failed.
    pub fn next_block(&mut self, run: &mut Run) -> io::Result<Option<BlockId>> {
        let mut open: Option<OpenBlock> = None;

        while let Some(raw) = self.read_line()? {
            let line = raw.trim_start();

            let Some(mut block) = open.take() else {
                open = self.open(line);
                continue;
            };

            if let Some(foot) = self.delimiters.foot(line) {
                return Ok(Some(self.close(block, foot, run)));
            }

            match self.delimiters.strip_lead(block.kind, line) {
                Some(text) => {
                    block.lines.push(text.to_string());
                    open = Some(block);
                }
                None => {
                    run.diagnostics.warn(&self.file, self.line_no, WARN_UNCLOSED);
                    return Ok(Some(self.abandon(block, run)));
                }
            }
        }

        Ok(open.map(|block| self.abandon(block, run)))
    }
}
