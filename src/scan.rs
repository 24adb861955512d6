use crate::buffer::{LineBuffer, LineId};
use crate::method::MethodBlock;
use crate::signature;

#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    Active(MethodBlock),
}

/// Idle/Active state machine fed one line at a time.
///
/// At most one block is tracked at a time. While a block is active every
/// line goes to its brace counter, so local functions and lambdas inside a
/// method body are never picked up as separate candidates.
#[derive(Debug, Default)]
pub struct Scanner {
    state: ScanState,
    finished: Vec<MethodBlock>,
}

/// Blocks found in one pass.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Closed blocks in discovery order.
    pub finished: Vec<MethodBlock>,
    /// A block still open when the input ran out. It is never instrumented.
    pub unfinished: Option<MethodBlock>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn is_active(&self) -> bool {
        matches!(self.state, ScanState::Active(_))
    }

    #[cfg(test)]
    fn active_method(&self) -> Option<&str> {
        match &self.state {
            ScanState::Active(block) => Some(block.name()),
            ScanState::Idle => None,
        }
    }

    #[cfg(test)]
    fn finished(&self) -> &[MethodBlock] {
        &self.finished
    }

    /// Process the next line. Returns the block that this line closed, if any.
    pub fn step(&mut self, line: LineId, text: &str) -> Option<&MethodBlock> {
        let (block, closed) = match std::mem::take(&mut self.state) {
            ScanState::Idle => {
                let name = signature::candidate(text)?;
                let mut block = MethodBlock::new(name);
                let closed = block.start(line, text);
                (block, closed)
            }
            ScanState::Active(mut block) => {
                let closed = block.feed(line, text);
                (block, closed)
            }
        };

        if !closed {
            self.state = ScanState::Active(block);
            return None;
        }
        debug_assert!(block.is_finished());
        self.finished.push(block);
        self.finished.last()
    }

    pub fn finish(self) -> ScanOutcome {
        let unfinished = match self.state {
            ScanState::Active(block) => Some(block),
            ScanState::Idle => None,
        };
        ScanOutcome {
            finished: self.finished,
            unfinished,
        }
    }
}

/// Scan every line of `buffer`.
pub fn scan(buffer: &LineBuffer) -> ScanOutcome {
    let mut scanner = Scanner::new();
    for (id, text) in buffer.iter() {
        scanner.step(id, text);
    }
    scanner.finish()
}
