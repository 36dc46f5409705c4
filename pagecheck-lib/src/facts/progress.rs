/// A trait for reporting progress of long-running operations.
pub trait Progress: Send + Sync {
    /// Set the phase label for the current operation (e.g., "Measuring", "Probing").
    fn set_phase(&self, phase: &str);

    /// Set the message shown next to the phase label.
    fn set_message(&self, message: &str);

    /// Finish and clear the progress indicator.
    fn done(&self);
}

/// Progress sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn set_phase(&self, _phase: &str) {}

    fn set_message(&self, _message: &str) {}

    fn done(&self) {}
}
