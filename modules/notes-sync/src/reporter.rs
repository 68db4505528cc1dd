//! Last error message plus per-operation busy flags.

/// Kind of remote work in flight. Flags are per kind, not per note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Busy {
    Listing,
    Saving,
    Deleting,
}

#[derive(Debug, Clone, Default)]
pub struct ErrorReporter {
    last_error: Option<String>,
    listing: u32,
    saving: u32,
    deleting: u32,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Newest failure wins; nothing is queued.
    pub fn report(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.last_error = None;
    }

    pub fn is_busy(&self, kind: Busy) -> bool {
        *self.counter(kind) > 0
    }

    pub fn begin(&mut self, kind: Busy) {
        *self.counter_mut(kind) += 1;
    }

    pub fn end(&mut self, kind: Busy) {
        let counter = self.counter_mut(kind);
        *counter = counter.saturating_sub(1);
    }

    fn counter(&self, kind: Busy) -> &u32 {
        match kind {
            Busy::Listing => &self.listing,
            Busy::Saving => &self.saving,
            Busy::Deleting => &self.deleting,
        }
    }

    fn counter_mut(&mut self, kind: Busy) -> &mut u32 {
        match kind {
            Busy::Listing => &mut self.listing,
            Busy::Saving => &mut self.saving,
            Busy::Deleting => &mut self.deleting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_error_wins() {
        let mut reporter = ErrorReporter::new();
        reporter.report("first");
        reporter.report("second");
        assert_eq!(reporter.last_error(), Some("second"));

        reporter.clear();
        assert_eq!(reporter.last_error(), None);
    }

    #[test]
    fn test_busy_flags_are_independent() {
        let mut reporter = ErrorReporter::new();
        reporter.begin(Busy::Saving);

        assert!(reporter.is_busy(Busy::Saving));
        assert!(!reporter.is_busy(Busy::Listing));
        assert!(!reporter.is_busy(Busy::Deleting));
    }

    #[test]
    fn test_overlapping_calls_keep_flag_until_last_ends() {
        let mut reporter = ErrorReporter::new();
        reporter.begin(Busy::Saving);
        reporter.begin(Busy::Saving);

        reporter.end(Busy::Saving);
        assert!(reporter.is_busy(Busy::Saving));

        reporter.end(Busy::Saving);
        assert!(!reporter.is_busy(Busy::Saving));

        reporter.end(Busy::Saving);
        assert!(!reporter.is_busy(Busy::Saving));
    }
}
