//! Textual forms of values.
//!
//! `mold` renders a value as it would be written in source, `print` is the
//! user-facing form (strings without quotes) and `inspect` adds the type.

use rye_common::WordIndex;

use crate::series::Series;
use crate::value::{BlockMode, PathMode, Value};

/// Elements shown on each side of the cursor in error locations.
const SURROUNDING: usize = 6;

impl Value {
    pub fn mold(&self, words: &WordIndex) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Decimal(n) => format!("{n:?}"),
            Value::String(s) => format!("{s:?}"),
            Value::Boolean(b) => b.to_string(),
            Value::Uri(u) => format!("{}://{}", words.name(u.scheme), u.path),
            Value::Block(b) => {
                let (open, close) = match b.mode {
                    BlockMode::Data => ("{", "}"),
                    BlockMode::Compose => ("[", "]"),
                    BlockMode::Do => ("(", ")"),
                };
                mold_items(open, b.items(), close, words)
            }
            Value::Ref(r) => r.with_series(|s| format!("ref{}", mold_items("{", s.items(), "}", words))),
            Value::Word(w) => words.name(*w).to_string(),
            Value::Setword(w) => format!("{}:", words.name(*w)),
            Value::LSetword(w) => format!(":{}", words.name(*w)),
            Value::Modword(w) => format!("{}::", words.name(*w)),
            Value::LModword(w) => format!("::{}", words.name(*w)),
            Value::Getword(w) => format!("?{}", words.name(*w)),
            Value::Opword(w) => format!(".{}", words.name(*w)),
            Value::Pipeword(w) => format!("|{}", words.name(*w)),
            Value::Tagword(w) => format!("'{}", words.name(*w)),
            Value::Xword(w) => format!("<{}>", words.name(*w)),
            Value::Genword(w) => format!("~{}", words.name(*w)),
            Value::CPath(p) => {
                let prefix = match p.mode {
                    PathMode::Plain => "",
                    PathMode::Op => ".",
                    PathMode::Pipe => "|",
                    PathMode::Get => "?",
                };
                let parts: Vec<&str> = p.words.iter().map(|w| words.name(*w)).collect();
                format!("{prefix}{}", parts.join("/"))
            }
            Value::Builtin(b) => {
                if b.is_curried() {
                    format!("[Builtin(curried): {}]", b.name)
                } else {
                    format!("[Builtin: {}]", b.name)
                }
            }
            Value::Function(f) => {
                let params: Vec<&str> = f.params.iter().map(|w| words.name(*w)).collect();
                format!("[Function: {{ {} }}]", params.join(" "))
            }
            Value::Context(ctx) => match ctx.kind() {
                Some(kind) => format!("[Context ({}): {} words]", words.name(kind), ctx.len()),
                None => format!("[Context: {} words]", ctx.len()),
            },
            Value::Error(e) => format!("[Error({}): {}]", e.status, e),
            Value::Void => "_".to_string(),
            Value::Comma => ",".to_string(),
        }
    }

    pub fn print(&self, words: &WordIndex) -> String {
        match self {
            Value::String(s) => s.to_string(),
            Value::Error(e) => format!("Error: {e}"),
            other => other.mold(words),
        }
    }

    pub fn inspect(&self, words: &WordIndex) -> String {
        let ty = self.value_type().name();
        let mut chars = ty.chars();
        let title: String = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .into_iter()
            .chain(chars)
            .collect();
        match self {
            Value::Builtin(_) | Value::Function(_) | Value::Context(_) | Value::Error(_) => {
                self.mold(words)
            }
            other => format!("[{title}: {}]", other.mold(words)),
        }
    }
}

fn mold_items(open: &str, items: &[Value], close: &str, words: &WordIndex) -> String {
    if items.is_empty() {
        return format!("{open} {close}");
    }
    let inner: Vec<String> = items.iter().map(|v| v.mold(words)).collect();
    format!("{open} {} {close}", inner.join(" "))
}

impl Series {
    /// The elements around the cursor, with the cursor marked.
    pub fn surroundings(&self, words: &WordIndex) -> String {
        let pos = self.pos();
        let start = pos.saturating_sub(SURROUNDING);
        let end = (pos + SURROUNDING).min(self.len());
        let mut parts = Vec::new();
        if start > 0 {
            parts.push("...".to_string());
        }
        for (i, item) in self.items()[start..end].iter().enumerate() {
            if start + i == pos {
                parts.push("<here>".to_string());
            }
            parts.push(item.mold(words));
        }
        if pos >= end {
            parts.push("<here>".to_string());
        }
        if end < self.len() {
            parts.push("...".to_string());
        }
        format!("{{ {} }}", parts.join(" "))
    }
}
