//! Recovery of prefix and base declarations from Turtle source text.
//!
//! The sophia Turtle parser only yields triples, so the namespace bindings
//! and base IRI that the canonical output must carry are read back from the
//! source here. Only directives starting a line are recognized, which is how
//! every Turtle writer emits them. String literals and comments are blanked
//! out before matching, so directive-looking text inside them is ignored.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::model::Namespaces;

/// Prefix bindings and base IRI declared in a Turtle document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// Prefix to namespace IRI; a later declaration of a prefix wins.
    pub namespaces: Namespaces,
    /// Last declared base IRI.
    pub base: Option<String>,
}

#[allow(clippy::expect_used)]
static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:@prefix|(?i:prefix))[ \t]+([^\s:<>]*):[ \t]*<([^>\s]*)>")
        .expect("Invalid regex pattern for prefix directive")
});

#[allow(clippy::expect_used)]
static BASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:@base|(?i:base))[ \t]+<([^>\s]*)>")
        .expect("Invalid regex pattern for base directive")
});

#[allow(clippy::expect_used)]
static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("Invalid regex pattern for IRI scheme")
});

/// Lexical context while blanking out literals and comments.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Span {
    Code,
    Iri,
    Comment,
    Short(char),
    Long(char),
}

/// Copy of `text` where the content of string literals and comments is
/// replaced by spaces. Line breaks are kept so line anchors still hold, and
/// IRIs are copied verbatim since `#` and quotes are ordinary inside them.
fn blank_out_literals(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut span = Span::Code;
    let mut i = 0;

    let blank = |c: char| if c == '\n' { '\n' } else { ' ' };
    let tripled = |i: usize, quote: char| chars.get(i..i + 3) == Some(&[quote; 3][..]);

    while i < chars.len() {
        let c = chars[i];
        match span {
            Span::Code => match c {
                '<' => {
                    span = Span::Iri;
                    out.push(c);
                }
                '#' => {
                    span = Span::Comment;
                    out.push(' ');
                }
                '"' | '\'' if tripled(i, c) => {
                    span = Span::Long(c);
                    out.extend([c, c, c]);
                    i += 2;
                }
                '"' | '\'' => {
                    span = Span::Short(c);
                    out.push(c);
                }
                _ => out.push(c),
            },
            Span::Iri => {
                if c == '>' {
                    span = Span::Code;
                }
                out.push(c);
            }
            Span::Comment => {
                if c == '\n' {
                    span = Span::Code;
                }
                out.push(blank(c));
            }
            Span::Short(_) | Span::Long(_) if c == '\\' => {
                out.push(' ');
                if let Some(&next) = chars.get(i + 1) {
                    out.push(blank(next));
                    i += 1;
                }
            }
            Span::Short(quote) => {
                if c == quote || c == '\n' {
                    span = Span::Code;
                    out.push(c);
                } else {
                    out.push(' ');
                }
            }
            Span::Long(quote) => {
                if tripled(i, quote) {
                    span = Span::Code;
                    out.extend([c, c, c]);
                    i += 2;
                } else {
                    out.push(blank(c));
                }
            }
        }
        i += 1;
    }

    out
}

/// Returns true if `iri` carries a scheme, i.e. is not a relative reference.
#[must_use]
pub fn is_absolute(iri: &str) -> bool {
    SCHEME_RE.is_match(iri)
}

/// Scans `text` for `@prefix`/`PREFIX` and `@base`/`BASE` directives.
///
/// Relative namespace or base IRIs are skipped: the parser has already
/// resolved every IRI in the graph, so they could not abbreviate anything.
#[must_use]
pub fn scan(text: &str) -> Directives {
    let mut directives = Directives::default();
    let code = blank_out_literals(text);
    let text = code.as_str();

    for caps in PREFIX_RE.captures_iter(text) {
        let (Some(prefix), Some(iri)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if !is_absolute(iri.as_str()) {
            trace!(prefix = prefix.as_str(), iri = iri.as_str(), "skipping relative namespace");
            continue;
        }
        directives
            .namespaces
            .insert(prefix.as_str().to_string(), iri.as_str().to_string());
    }

    for caps in BASE_RE.captures_iter(text) {
        if let Some(iri) = caps.get(1) {
            if is_absolute(iri.as_str()) {
                directives.base = Some(iri.as_str().to_string());
            } else {
                trace!(iri = iri.as_str(), "skipping relative base");
            }
        }
    }

    directives
}
