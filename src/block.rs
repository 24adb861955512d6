use crate::buffer::LineId;

/// Tracks brace depth across consecutive lines to find where a block opens
/// and closes.
///
/// Braces are counted character by character with no knowledge of string or
/// comment literals, so a `"{"` literal shifts the depth like real code does.
#[derive(Debug, Default, Clone)]
pub struct BlockLocator {
    define_line: Option<LineId>,
    start_line: Option<LineId>,
    end_line: Option<LineId>,
    depth: i32,
    opened: bool,
    finished: bool,
}

impl BlockLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin tracking at the definition line. The line itself is fed, so a
    /// brace on the signature line opens the block.
    pub fn start(&mut self, line: LineId, text: &str) -> bool {
        *self = Self {
            define_line: Some(line),
            ..Self::default()
        };
        self.feed(line, text)
    }

    /// Count the braces of the next line. Returns whether the block is now
    /// closed. Each line must be fed exactly once, in order; lines fed after
    /// the block closed are ignored.
    pub fn feed(&mut self, line: LineId, text: &str) -> bool {
        if self.finished {
            return true;
        }
        for c in text.chars() {
            match c {
                '{' => {
                    if self.depth == 0 && self.start_line.is_none() {
                        self.start_line = Some(line);
                    }
                    self.depth += 1;
                    self.opened |= self.depth > 0;
                }
                '}' => {
                    self.depth -= 1;
                    if self.depth == 0 && self.opened {
                        self.end_line = Some(line);
                        self.finished = true;
                        break;
                    }
                }
                _ => {}
            }
        }
        self.finished
    }

    pub fn define_line(&self) -> Option<LineId> {
        self.define_line
    }

    pub fn start_line(&self) -> Option<LineId> {
        self.start_line
    }

    pub fn end_line(&self) -> Option<LineId> {
        self.end_line
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Opening and closing line of a finished block.
    pub fn bounds(&self) -> Option<(LineId, LineId)> {
        if !self.finished {
            return None;
        }
        Some((self.start_line?, self.end_line?))
    }
}
