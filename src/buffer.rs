use std::path::{Path, PathBuf};

/// Stable handle to a line inside a [`LineBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(usize);

#[derive(Debug)]
struct LineNode {
    text: String,
    prev: Option<LineId>,
    next: Option<LineId>,
}

/// Ordered, insertion-stable sequence of text lines keyed by a file path.
///
/// Lines live in an arena and are linked in both directions, so a [`LineId`]
/// handed out once keeps pointing at the same line no matter how many lines
/// are inserted around it later.
#[derive(Debug)]
pub struct LineBuffer {
    path: PathBuf,
    nodes: Vec<LineNode>,
    head: Option<LineId>,
    tail: Option<LineId>,
    line_ending: &'static str,
}

impl LineBuffer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            nodes: Vec::new(),
            head: None,
            tail: None,
            line_ending: "\n",
        }
    }

    /// Split `source` into lines the way a line reader does: `\n` separates
    /// lines, a trailing `\r` is dropped, and a final terminator does not
    /// produce an empty last line.
    ///
    /// The terminator used by [`render`](Self::render) follows the first line
    /// of the input.
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Self {
        let mut buffer = Self::new(path);
        if source.is_empty() {
            return buffer;
        }
        if let Some((first, _)) = source.split_once('\n')
            && first.ends_with('\r')
        {
            buffer.line_ending = "\r\n";
        }

        let body = source.strip_suffix('\n').unwrap_or(source);
        for line in body.split('\n') {
            buffer.append(line.strip_suffix('\r').unwrap_or(line));
        }
        buffer
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the file, used in sample labels.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[cfg(test)]
    fn first(&self) -> Option<LineId> {
        self.head
    }

    #[cfg(test)]
    fn last(&self) -> Option<LineId> {
        self.tail
    }

    pub fn text(&self, id: LineId) -> &str {
        &self.nodes[id.0].text
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.nodes[id.0].next
    }

    #[cfg(test)]
    fn prev(&self, id: LineId) -> Option<LineId> {
        self.nodes[id.0].prev
    }

    /// Add a line at the end of the buffer.
    pub fn append(&mut self, text: impl Into<String>) -> LineId {
        let id = self.push_node(text.into(), self.tail, None);
        match self.tail {
            Some(tail) => self.nodes[tail.0].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Insert a new line directly after `anchor`.
    pub fn insert_after(&mut self, anchor: LineId, text: impl Into<String>) -> LineId {
        let next = self.nodes[anchor.0].next;
        let id = self.push_node(text.into(), Some(anchor), next);
        self.nodes[anchor.0].next = Some(id);
        match next {
            Some(next) => self.nodes[next.0].prev = Some(id),
            None => self.tail = Some(id),
        }
        id
    }

    /// Insert a new line directly before `anchor`.
    pub fn insert_before(&mut self, anchor: LineId, text: impl Into<String>) -> LineId {
        let prev = self.nodes[anchor.0].prev;
        let id = self.push_node(text.into(), prev, Some(anchor));
        self.nodes[anchor.0].prev = Some(id);
        match prev {
            Some(prev) => self.nodes[prev.0].next = Some(id),
            None => self.head = Some(id),
        }
        id
    }

    fn push_node(&mut self, text: String, prev: Option<LineId>, next: Option<LineId>) -> LineId {
        let id = LineId(self.nodes.len());
        self.nodes.push(LineNode { text, prev, next });
        id
    }

    /// Iterate every line in document order.
    pub fn iter(&self) -> Lines<'_> {
        Lines {
            buffer: self,
            cursor: self.head,
            stop: None,
        }
    }

    /// Iterate from `from` to `to`, both inclusive. If `to` never follows
    /// `from`, iteration runs to the end of the buffer.
    pub fn range(&self, from: LineId, to: LineId) -> Lines<'_> {
        Lines {
            buffer: self,
            cursor: Some(from),
            stop: Some(to),
        }
    }

    /// Join all lines, each followed by the buffer's line terminator.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (_, line) in self.iter() {
            out.push_str(line);
            out.push_str(self.line_ending);
        }
        out
    }
}

/// Iterator over `(LineId, text)` pairs of a [`LineBuffer`].
pub struct Lines<'a> {
    buffer: &'a LineBuffer,
    cursor: Option<LineId>,
    stop: Option<LineId>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = (LineId, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        self.cursor = if Some(id) == self.stop {
            None
        } else {
            self.buffer.next(id)
        };
        Some((id, self.buffer.text(id)))
    }
}

/// The leading run of spaces and tabs of `line`.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}
