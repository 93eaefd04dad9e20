//! Code fence tracking for line-based directive scanning.

/// Tracks whether the current line is inside a fenced code block.
///
/// Fences use backticks or tildes (three or more); the closing fence must use
/// the same character and be at least as long as the opening one.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line. Returns `true` if the line opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        match self.open {
            Some((fence_char, min_len)) => {
                if is_closing_fence(trimmed, fence_char, min_len) {
                    self.open = None;
                    return true;
                }
                false
            }
            None => {
                self.open = opening_fence(trimmed);
                self.open.is_some()
            }
        }
    }
}

fn opening_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|&c| c == first).count();
    (len >= 3).then_some((first, len))
}

fn is_closing_fence(trimmed: &str, fence_char: char, min_len: usize) -> bool {
    let len = trimmed.chars().take_while(|&c| c == fence_char).count();
    // Fence chars are ASCII, so `len` is also a byte offset
    len >= min_len && trimmed[len..].chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.in_fence());

        assert!(tracker.update("```rust\n"));
        assert!(tracker.in_fence());
        assert!(!tracker.update(":::note\n"));
        assert!(tracker.in_fence());
        assert!(tracker.update("```\n"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_closing_fence_must_match() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("````"));

        assert!(!tracker.update("```"));
        assert!(!tracker.update("~~~~"));
        assert!(!tracker.update("```` trailing"));
        assert!(tracker.in_fence());

        assert!(tracker.update("`````  "));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_indented_tilde_fence() {
        let mut tracker = FenceTracker::new();
        assert!(tracker.update("   ~~~python"));
        assert!(tracker.update("  ~~~"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_short_runs_are_not_fences() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("``inline code``"));
        assert!(!tracker.update("::: tabs"));
        assert!(!tracker.in_fence());
    }
}
