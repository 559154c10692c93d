use std::fmt;

/// Identifies one loop: its nesting depth and its id among loops seen at
/// that depth. Printed as `DDD_III`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Label {
    pub depth: usize,
    pub id: usize,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:03}_{:03}", self.depth, self.id)
    }
}

/// `exit_loop` with no loop open, or `finish` with loops still open.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UnbalancedLoop;

/// Hands out label pairs for nested loops.
///
/// `counters[d]` is the id the next loop opened at depth `d` will get.
/// Counters outlive the frames that use them, so two loops at the same depth
/// never share an id even when they have different parents.
#[derive(Clone, Debug)]
pub struct LoopLabelStack {
    counters: Vec<usize>,
    depth: usize,
}

impl LoopLabelStack {
    pub fn new() -> Self {
        Self {
            counters: vec![0],
            depth: 0,
        }
    }

    /// Number of loops currently open.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn enter_loop(&mut self) -> Label {
        let label = Label {
            depth: self.depth,
            id: self.counters[self.depth],
        };
        self.depth += 1;
        if self.counters.len() == self.depth {
            self.counters.push(0);
        }
        label
    }

    pub fn exit_loop(&mut self) -> Result<Label, UnbalancedLoop> {
        if self.depth == 0 {
            return Err(UnbalancedLoop);
        }
        self.depth -= 1;
        let label = Label {
            depth: self.depth,
            id: self.counters[self.depth],
        };
        self.counters[self.depth] += 1;
        Ok(label)
    }

    pub fn finish(&self) -> Result<(), UnbalancedLoop> {
        if self.depth == 0 {
            Ok(())
        } else {
            Err(UnbalancedLoop)
        }
    }
}

impl Default for LoopLabelStack {
    fn default() -> Self {
        Self::new()
    }
}
