//! Text emission helpers shared by the generators

use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::warn;

/// Line-oriented source writer with block indentation
#[derive(Debug, Clone)]
pub struct CodeWriter {
    indent_unit: &'static str,
    depth: usize,
    out: String,
}

impl CodeWriter {
    pub fn new(indent_unit: &'static str) -> Self {
        Self {
            indent_unit,
            depth: 0,
            out: String::new(),
        }
    }

    /// Write one line at the current depth; empty lines carry no indentation
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(self.indent_unit);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    pub fn indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// `{` on its own line, then one level deeper
    pub fn open(&mut self) -> &mut Self {
        self.line("{").indent()
    }

    pub fn close(&mut self) -> &mut Self {
        self.dedent().line("}")
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Kind of a `:func:` / `:cb:` cross reference in documentation text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Function,
    Callback,
}

/// Compile `pattern` once into `cell`
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Regex>,
    pattern: &str,
) -> Result<&'static Regex, regex::Error> {
    if let Some(regex) = cell.get() {
        return Ok(regex);
    }
    let regex = Regex::new(pattern)?;
    Ok(cell.get_or_init(|| regex))
}

static REFERENCE: OnceLock<Regex> = OnceLock::new();

/// Replace every ``:func:`Name` `` and ``:cb:`Name` `` with the resolver's output
pub fn rewrite_references<F>(text: &str, mut resolve: F) -> String
where
    F: FnMut(ReferenceKind, &str) -> String,
{
    let regex = match cached_regex(&REFERENCE, r":(func|cb):`([^`]+)`") {
        Ok(regex) => regex,
        Err(e) => {
            warn!(error = %e, "Cross references left unresolved");
            return text.to_string();
        }
    };

    regex
        .replace_all(text, |captures: &Captures| {
            let kind = match &captures[1] {
                "cb" => ReferenceKind::Callback,
                _ => ReferenceKind::Function,
            };
            resolve(kind, &captures[2])
        })
        .into_owned()
}

/// Shortest float literal that still reads as a float ("2.0", "0.25")
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Prefix every non-empty line
pub fn prefix_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
