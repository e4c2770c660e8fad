//! JSON Lines output: one record per block, one block per line.
//
//  {"id":0,"type":"function","markup":"function","file":"a.sh",
//   "lines":{"initial":3,"total":4},"content":{...}}

use anyhow::Result;
use serde::Serialize;
use serde_json::ser::{CharEscape, Formatter, Serializer};
use std::io::{self, Write};

use crate::model::{Block, BlockKind, Content};

#[derive(Serialize)]
struct Lines {
    initial: usize,
    total: usize,
}

#[derive(Serialize)]
struct Record<'a> {
    id: usize,
    #[serde(rename = "type")]
    kind: BlockKind,
    markup: &'a str,
    file: &'a str,
    lines: Lines,
    content: &'a Content,
}

/// Compact formatter that escapes only backslash, quote, NUL, BEL, BS,
/// HT, VT, FF and CR. Every other control character is written raw.
struct RecordFormatter;

impl Formatter for RecordFormatter {
    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let escaped: &[u8] = match char_escape {
            CharEscape::Quote => b"\\\"",
            CharEscape::ReverseSolidus => b"\\\\",
            CharEscape::Solidus => b"/",
            CharEscape::Backspace => b"\\b",
            CharEscape::FormFeed => b"\\f",
            CharEscape::LineFeed => b"\\n",
            CharEscape::CarriageReturn => b"\\r",
            CharEscape::Tab => b"\\t",
            CharEscape::AsciiControl(0x00) => b"\\u0000",
            CharEscape::AsciiControl(0x07) => b"\\u0007",
            CharEscape::AsciiControl(0x0b) => b"\\u000b",
            CharEscape::AsciiControl(byte) => return writer.write_all(&[byte]),
        };
        writer.write_all(escaped)
    }
}

pub struct JsonLines<W> {
    out: W,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn emit(&mut self, block: &Block, content: &Content) -> Result<()> {
        let record = Record {
            id: block.id,
            kind: block.kind,
            markup: &block.markup,
            file: &block.file,
            lines: Lines {
                initial: block.initial_line,
                total: block.lines.len(),
            },
            content,
        };

        let mut ser = Serializer::with_formatter(&mut self.out, RecordFormatter);
        record.serialize(&mut ser)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
