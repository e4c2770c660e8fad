//! Comment-delimiter table.
//!
//! Every filetype belongs to exactly one family. Families are tried in a
//! fixed order and the first one whose filetype pattern matches supplies
//! the delimiters; anything left over uses the default family, which can
//! only ever produce generic blocks.
//
//  family   head     lead     generic foot   function foot
//  script   ##       #␠       ##             function NAME(
//  shell    ##       #␠       ##             [function] NAME()
//  c-like   /**      *␠       **/            */
//  default  ##       #␠       ##             -

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::model::BlockKind;

/// Filetype label used when neither the path nor the caller supplies one.
pub const UNKNOWN_FILETYPE: &str = "unknown";

/// Head, lead and foot patterns for one block kind.
#[derive(Debug)]
pub struct DelimiterSet {
    pub head: Regex,
    pub lead: Regex,
    pub foot: Regex,
}

impl DelimiterSet {
    fn new(head: &str, lead: &str, foot: &str) -> Self {
        Self {
            head: Regex::new(head).unwrap(),
            lead: Regex::new(lead).unwrap(),
            foot: Regex::new(foot).unwrap(),
        }
    }
}

/// The delimiters of one family. `function` is `None` when the family has
/// no way to mark function blocks.
#[derive(Debug)]
pub struct Delimiters {
    pub generic: DelimiterSet,
    pub function: Option<DelimiterSet>,
}

impl Delimiters {
    pub fn set(&self, kind: BlockKind) -> Option<&DelimiterSet> {
        match kind {
            BlockKind::Generic => Some(&self.generic),
            BlockKind::Function => self.function.as_ref(),
        }
    }

    fn first_match(&self, pick: impl Fn(&DelimiterSet) -> &Regex, line: &str) -> Option<BlockKind> {
        [BlockKind::Generic, BlockKind::Function]
            .into_iter()
            .find(|&kind| self.set(kind).is_some_and(|set| pick(set).is_match(line)))
    }

    /// Kind of block `line` opens, generic winning over function.
    pub fn head(&self, line: &str) -> Option<BlockKind> {
        self.first_match(|set| &set.head, line)
    }

    /// Kind of block `line` closes, generic winning over function.
    pub fn foot(&self, line: &str) -> Option<BlockKind> {
        self.first_match(|set| &set.foot, line)
    }

    /// `line` without the lead marker of `kind`, or `None` if it has none.
    pub fn strip_lead<'l>(&self, kind: BlockKind, line: &'l str) -> Option<&'l str> {
        let found = self.set(kind)?.lead.find(line)?;
        Some(&line[found.end()..])
    }
}

struct Family {
    name: &'static str,
    filetypes: Regex,
    delimiters: Delimiters,
}

impl Family {
    fn new(name: &'static str, filetypes: &str, delimiters: Delimiters) -> Self {
        Self {
            name,
            filetypes: Regex::new(filetypes).unwrap(),
            delimiters,
        }
    }
}

fn hash_comments(function_foot: Option<&str>) -> Delimiters {
    Delimiters {
        generic: DelimiterSet::new(r"^##", r"^# ?", r"^##"),
        function: function_foot.map(|foot| DelimiterSet::new(r"^##", r"^# ?", foot)),
    }
}

static FAMILIES: Lazy<Vec<Family>> = Lazy::new(|| {
    vec![
        Family::new(
            "script",
            r"^(awk|gawk|mawk|nawk)$",
            hash_comments(Some(r"^function\s+[A-Za-z_][A-Za-z0-9_]*\s*\(")),
        ),
        Family::new(
            "shell",
            r"^(sh|bash|ksh|zsh|dash|ash)$",
            hash_comments(Some(
                r"^(function\s+)?[A-Za-z_][A-Za-z0-9_:+-]*\s*\(\s*\)",
            )),
        ),
        Family::new(
            "c-like",
            r"^(c|h|cc|cpp|cxx|hpp|hh|hxx|java|js|mjs|ts|go|rs|cs|css|php|swift|kt|scala)$",
            Delimiters {
                generic: DelimiterSet::new(r"^/\*\*", r"^\* ?", r"^\*\*/"),
                function: Some(DelimiterSet::new(r"^/\*\*", r"^\* ?", r"^\*/")),
            },
        ),
    ]
});

static DEFAULT_FAMILY: Lazy<Delimiters> = Lazy::new(|| hash_comments(None));

fn family(filetype: &str) -> Option<&'static Family> {
    FAMILIES.iter().find(|f| f.filetypes.is_match(filetype))
}

/// Delimiters for `filetype`, falling back to the default family.
pub fn get(filetype: &str) -> &'static Delimiters {
    match family(filetype) {
        Some(f) => {
            log::debug!("filetype `{filetype}` uses the {} family", f.name);
            &f.delimiters
        }
        None => &DEFAULT_FAMILY,
    }
}

/// Filetype label for `path`: its extension when a family knows it,
/// otherwise the caller's default, otherwise [`UNKNOWN_FILETYPE`].
pub fn filetype_for(path: &Path, default: Option<&str>) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| family(e).is_some());

    match (ext, default) {
        (Some(ext), _) => ext.to_string(),
        (None, Some(default)) if !default.is_empty() => default.to_string(),
        _ => UNKNOWN_FILETYPE.to_string(),
    }
}
