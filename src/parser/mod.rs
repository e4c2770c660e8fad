//! Input side: open source files and cut them into raw blocks.
pub mod delimiters;
pub mod scanner;

pub use scanner::Scanner;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use delimiters::Delimiters;

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";
const STDIN_LABEL: &str = "<stdin>";

/// One opened input file together with the delimiters that apply to it.
pub struct Source {
    pub label: String,
    pub filetype: String,
    pub delimiters: &'static Delimiters,
    pub reader: Box<dyn BufRead>,
}

impl Source {
    pub fn scanner(&mut self) -> Scanner<'static, &mut Box<dyn BufRead>> {
        Scanner::new(&mut self.reader, self.label.clone(), self.delimiters)
    }
}

/// Open `path` (or standard input for `-`) and resolve its filetype.
pub fn open(path: &Path, default_filetype: Option<&str>) -> Result<Source> {
    let (label, reader): (String, Box<dyn BufRead>) = if path.as_os_str() == STDIN_PATH {
        (STDIN_LABEL.to_string(), Box::new(BufReader::new(io::stdin())))
    } else {
        let file = File::open(path).with_context(|| format!("Opening {}", path.display()))?;
        (path.display().to_string(), Box::new(BufReader::new(file)))
    };

    let filetype = delimiters::filetype_for(path, default_filetype);
    log::debug!("{label}: filetype `{filetype}`");

    Ok(Source {
        delimiters: delimiters::get(&filetype),
        label,
        filetype,
        reader,
    })
}
