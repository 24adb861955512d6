use std::path::Path;

use crate::buffer::LineBuffer;
use crate::method::Markers;
use crate::scan::scan;

/// Outcome for one method found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodReport {
    pub name: String,
    /// Coroutine/iterator bodies are found but never instrumented.
    pub iterator_shaped: bool,
    /// Marker lines inserted into this method.
    pub inserted: usize,
}

/// Result of instrumenting a source file.
#[derive(Debug)]
pub struct InstrumentResult {
    pub source: String,
    /// Every finished method block, in the order it was found.
    pub methods: Vec<MethodReport>,
    /// Name of a method whose braces never balanced before end of input.
    pub unfinished: Option<String>,
}

impl InstrumentResult {
    pub fn inserted_lines(&self) -> usize {
        self.methods.iter().map(|m| m.inserted).sum()
    }

    pub fn instrumented_methods(&self) -> usize {
        self.methods.iter().filter(|m| m.inserted > 0).count()
    }
}

/// Rewrite `source` so that every ordinary method body begins a profiler
/// sample and ends it before each exit.
///
/// `path` only supplies the file name used in sample labels
/// (`"<file name> <method name>"`).
pub fn instrument_source(source: &str, path: &Path, markers: &Markers) -> InstrumentResult {
    let mut buffer = LineBuffer::parse(path, source);
    let (methods, unfinished) = instrument_buffer(&mut buffer, markers);
    InstrumentResult {
        source: buffer.render(),
        methods,
        unfinished,
    }
}

/// Scan `buffer` to the end, then instrument each finished block in
/// discovery order.
pub fn instrument_buffer(
    buffer: &mut LineBuffer,
    markers: &Markers,
) -> (Vec<MethodReport>, Option<String>) {
    let outcome = scan(buffer);

    let unfinished = outcome.unfinished.map(|block| {
        tracing::debug!(
            file = %buffer.path().display(),
            method = block.name(),
            "braces never balanced, method left as is"
        );
        block.name().to_string()
    });

    let mut reports = Vec::with_capacity(outcome.finished.len());
    for block in &outcome.finished {
        tracing::debug!("{}", block.block_text(buffer));
        let iterator_shaped = block.is_iterator_shaped(buffer);
        if iterator_shaped {
            tracing::debug!(method = block.name(), "iterator body, skipped");
        }
        let inserted = block.instrument(buffer, markers);
        reports.push(MethodReport {
            name: block.name().to_string(),
            iterator_shaped,
            inserted,
        });
    }
    (reports, unfinished)
}
