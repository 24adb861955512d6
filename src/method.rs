use crate::block::BlockLocator;
use crate::buffer::{LineBuffer, LineId, leading_whitespace};

/// Substrings that mark a generator/coroutine body.
const ITERATOR_MARKERS: &[&str] = &["yield return", "yield break"];

/// Substring that marks an early exit.
const RETURN_TOKEN: &str = "return";

/// Profiler calls written into instrumented methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Call that opens a named sample, e.g. `Profiler.BeginSample`.
    pub begin: String,
    /// Call that closes the innermost sample.
    pub end: String,
    /// Indentation unit added to the body's own indentation.
    pub indent: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            begin: "UnityEngine.Profiling.Profiler.BeginSample".to_string(),
            end: "UnityEngine.Profiling.Profiler.EndSample".to_string(),
            indent: "\t".to_string(),
        }
    }
}

impl Markers {
    pub fn begin_line(&self, prefix: &str, label: &str) -> String {
        format!("{prefix}{}(\"{label}\");", self.begin)
    }

    pub fn end_line(&self, prefix: &str) -> String {
        format!("{prefix}{}();", self.end)
    }
}

/// A method body located by brace tracking, plus the name taken from its
/// signature.
#[derive(Debug, Clone)]
pub struct MethodBlock {
    name: String,
    locator: BlockLocator,
}

impl MethodBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locator: BlockLocator::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locator(&self) -> &BlockLocator {
        &self.locator
    }

    pub fn is_finished(&self) -> bool {
        self.locator.is_finished()
    }

    pub fn start(&mut self, line: LineId, text: &str) -> bool {
        self.locator.start(line, text)
    }

    pub fn feed(&mut self, line: LineId, text: &str) -> bool {
        self.locator.feed(line, text)
    }

    /// Whether any body line, braces included, contains `yield return` or
    /// `yield break`. Unfinished blocks are never iterator-shaped.
    pub fn is_iterator_shaped(&self, buffer: &LineBuffer) -> bool {
        let Some((start, end)) = self.locator.bounds() else {
            return false;
        };
        buffer
            .range(start, end)
            .any(|(_, line)| ITERATOR_MARKERS.iter().any(|m| line.contains(m)))
    }

    /// `"<file name> <method name>"`.
    pub fn sample_label(&self, buffer: &LineBuffer) -> String {
        format!("{} {}", buffer.file_name(), self.name)
    }

    /// Source text from the signature line through the closing brace.
    pub fn block_text(&self, buffer: &LineBuffer) -> String {
        let Some(define) = self.locator.define_line() else {
            return String::new();
        };
        let end = self.locator.end_line().unwrap_or(define);
        buffer
            .range(define, end)
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Insert a begin marker after the opening brace line, an end marker
    /// before every line containing `return`, and an end marker before the
    /// closing brace line. Returns how many lines were inserted.
    ///
    /// Unfinished and iterator-shaped blocks are left untouched.
    pub fn instrument(&self, buffer: &mut LineBuffer, markers: &Markers) -> usize {
        let Some((start, end)) = self.locator.bounds() else {
            return 0;
        };
        if self.is_iterator_shaped(buffer) {
            return 0;
        }

        let prefix = format!("{}{}", leading_whitespace(buffer.text(start)), markers.indent);
        let label = self.sample_label(buffer);
        // Early exits are collected from the original lines before anything
        // is inserted, so generated lines are never rescanned.
        let exits: Vec<LineId> = buffer
            .range(start, end)
            .filter(|(_, line)| line.contains(RETURN_TOKEN))
            .map(|(id, _)| id)
            .collect();

        buffer.insert_after(start, markers.begin_line(&prefix, &label));
        buffer.insert_before(end, markers.end_line(&prefix));
        for &exit in &exits {
            buffer.insert_before(exit, markers.end_line(&prefix));
        }
        2 + exits.len()
    }
}
