//! Lookback boundary for re-trigger suppression

/// Lower bound (inclusive) below which the matcher ignores trigger anchors.
///
/// Dismissing a surface moves the boundary to the cursor so the same trigger
/// does not re-open on the next keystroke. Retreating the cursor to or
/// before the boundary lowers it again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lookback {
    index: usize,
}

impl Lookback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Lower the boundary when the cursor has moved back to or before it.
    ///
    /// Must run before the matcher is invoked. Returns the boundary to use.
    pub fn reopen(&mut self, cursor: usize) -> usize {
        if cursor <= self.index {
            self.index = cursor.saturating_sub(1);
        }
        self.index
    }

    /// Move the boundary to the dismissal point.
    ///
    /// A cursor of zero keeps the current boundary.
    pub fn dismiss_at(&mut self, cursor: usize) {
        if cursor > 0 {
            self.index = cursor;
        }
    }

    /// Place the boundary at the cursor after a committed insertion
    pub fn set(&mut self, cursor: usize) {
        self.index = cursor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(Lookback::new().index(), 0);
    }

    #[test]
    fn test_reopen_when_cursor_retreats() {
        let mut lookback = Lookback::new();
        lookback.dismiss_at(5);

        assert_eq!(lookback.reopen(7), 5);
        assert_eq!(lookback.reopen(5), 4);
        assert_eq!(lookback.reopen(2), 1);
    }

    #[test]
    fn test_reopen_at_start_of_text() {
        let mut lookback = Lookback::new();
        assert_eq!(lookback.reopen(0), 0);
    }

    #[test]
    fn test_dismiss_at_zero_keeps_boundary() {
        let mut lookback = Lookback::new();
        lookback.dismiss_at(3);
        lookback.dismiss_at(0);
        assert_eq!(lookback.index(), 3);
    }
}
