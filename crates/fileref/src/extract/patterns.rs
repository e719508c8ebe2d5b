//! Regex rules for the four reference forms.
//!
//! Keyword rules (`file:`, `files:`, `output:`) take one path token: a quoted
//! run (quotes removed, spaces allowed) or a bare run of non-whitespace with
//! trailing sentence punctuation trimmed off.

use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::OnceLock;

static FILE_RULE: OnceLock<Regex> = OnceLock::new();
static FILES_RULE: OnceLock<Regex> = OnceLock::new();
static OUTPUT_RULE: OnceLock<Regex> = OnceLock::new();
static QUOTED_RULE: OnceLock<Regex> = OnceLock::new();
static KEYWORD_PREFIX: OnceLock<Regex> = OnceLock::new();

const TOKEN: &str = r#"(?:"([^"]*)"|'([^']*)'|(\S+))"#;
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

fn keyword_rule(cell: &'static OnceLock<Regex>, keyword: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(&format!(r"(?i){}:\s*{}", keyword, TOKEN))
            .expect("keyword rule should compile")
    })
}

/// `file: <token>`
pub fn file_rule() -> &'static Regex {
    keyword_rule(&FILE_RULE, "file")
}

/// `files: <token>`
pub fn files_rule() -> &'static Regex {
    keyword_rule(&FILES_RULE, "files")
}

/// `output: <token>`
pub fn output_rule() -> &'static Regex {
    keyword_rule(&OUTPUT_RULE, "output")
}

/// A single- or double-quoted run ending in `.ext`
pub fn quoted_rule() -> &'static Regex {
    QUOTED_RULE.get_or_init(|| {
        Regex::new(r#""([^'"]+\.[A-Za-z0-9]+)"|'([^'"]+\.[A-Za-z0-9]+)'"#)
            .expect("quoted path rule should compile")
    })
}

/// Whether `preceding` ends with `file:`, `files:` or `output:` and optional
/// whitespace, i.e. a quoted run right after it is that keyword's token
pub fn ends_with_keyword(preceding: &str) -> bool {
    KEYWORD_PREFIX
        .get_or_init(|| {
            Regex::new(r"(?i)(?:files?|output):\s*\z").expect("keyword prefix rule should compile")
        })
        .is_match(preceding)
}

/// A path token pulled out of one keyword match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch<'t> {
    /// The path as written, without quotes or trailing punctuation
    pub path: &'t str,
    /// Bytes from the keyword through the end of the path token
    pub span: Range<usize>,
}

impl<'t> KeywordMatch<'t> {
    /// Read a keyword match. Returns `None` when the token is empty.
    ///
    /// Quoted tokens keep their content verbatim apart from surrounding
    /// whitespace; bare tokens lose trailing `.,;:!?`, which stays in the text.
    pub fn from_captures(caps: &Captures<'t>) -> Option<Self> {
        let whole = caps.get(0)?;

        if let Some(quoted) = caps.get(1).or_else(|| caps.get(2)) {
            let path = quoted.as_str().trim();
            if path.is_empty() {
                return None;
            }
            return Some(Self {
                path,
                span: whole.start()..whole.end(),
            });
        }

        let bare = caps.get(3)?;
        let path = bare.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        if path.is_empty() {
            return None;
        }
        Some(Self {
            path,
            span: whole.start()..bare.start() + path.len(),
        })
    }
}

/// A quoted path found anywhere in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedMatch<'t> {
    pub path: &'t str,
    /// Bytes of the quoted run, quotes included
    pub span: Range<usize>,
}

impl<'t> QuotedMatch<'t> {
    pub fn from_captures(caps: &Captures<'t>) -> Option<Self> {
        let whole = caps.get(0)?;
        let inner = caps.get(1).or_else(|| caps.get(2))?;
        let path = inner.as_str().trim();
        if path.is_empty() {
            return None;
        }
        Some(Self {
            path,
            span: whole.start()..whole.end(),
        })
    }
}
