use serde::Serialize;
use std::ops::AddAssign;

/// Outcome of one normalizer pass (or the running total of an observer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    /// Anchors inspected
    pub scanned: usize,
    /// Anchors whose target was rewritten to `_self`
    pub rewritten: usize,
}

impl NormalizeStats {
    pub fn is_noop(&self) -> bool {
        self.rewritten == 0
    }
}

impl AddAssign for NormalizeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.scanned += rhs.scanned;
        self.rewritten += rhs.rewritten;
    }
}
