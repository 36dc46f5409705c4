use super::{AuditTarget, Progress, SourceCollector, SourceResult};
use futures::future::join_all;
use strum::Display;

const LOG_TARGET: &str = "coordinator";

/// States of the primary/fallback routing machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CoordinatorState {
    /// No primary has been attempted yet.
    PrimaryPending,

    /// Every primary succeeded.
    PrimaryComplete,

    /// At least one primary succeeded and at least one failed.
    PrimaryPartial,

    /// Every primary failed.
    PrimaryFailed,

    /// The fallback is about to be attempted.
    FallbackPending,

    /// The fallback was attempted, successfully or not.
    FallbackComplete,

    Done,
}

impl CoordinatorState {
    /// State reached once all `total` primaries have resolved, `succeeded` of them with data.
    #[must_use]
    pub const fn after_primaries(succeeded: usize, total: usize) -> Self {
        if succeeded == 0 {
            Self::PrimaryFailed
        } else if succeeded == total {
            Self::PrimaryComplete
        } else {
            Self::PrimaryPartial
        }
    }

    /// The state that follows this one once its own work is finished.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::PrimaryPending | Self::FallbackPending => {
                // these two leave through the work they do, not through a fixed transition
                self
            }
            Self::PrimaryFailed => Self::FallbackPending,
            Self::PrimaryComplete | Self::PrimaryPartial | Self::FallbackComplete | Self::Done => Self::Done,
        }
    }
}

/// Which kind of source ended up supplying data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Supplier {
    Primary,
    Fallback,
    None,
}

/// Everything the coordinator observed for one audit target.
#[derive(Debug, Clone)]
pub struct CoordinatorOutcome {
    /// Primary results, in the ranked order the primaries were given.
    pub primaries: Vec<(String, SourceResult)>,

    /// Fallback result, present only when the fallback was attempted.
    pub fallback: Option<(String, SourceResult)>,

    pub supplier: Supplier,

    /// Every state visited, ending with [`CoordinatorState::Done`].
    pub trace: Vec<CoordinatorState>,
}

impl CoordinatorOutcome {
    /// Whether at least one primary failed.
    #[must_use]
    pub fn any_primary_failed(&self) -> bool {
        self.primaries.iter().any(|(_, result)| !result.is_ok())
    }

    /// All results in reporting order: primaries first, then the fallback if it ran.
    pub fn sources(&self) -> impl Iterator<Item = &(String, SourceResult)> {
        self.primaries.iter().chain(self.fallback.iter())
    }
}

/// Routes one audit target through a ranked list of primary sources and a single fallback.
///
/// All primaries are attempted concurrently and independently; a failed primary is never
/// retried. The fallback runs only when every primary failed.
#[derive(Debug)]
pub struct FallbackCoordinator<'a, P, F> {
    primaries: &'a [P],
    fallback: &'a F,
}

impl<'a, P: SourceCollector, F: SourceCollector> FallbackCoordinator<'a, P, F> {
    #[must_use]
    pub const fn new(primaries: &'a [P], fallback: &'a F) -> Self {
        Self { primaries, fallback }
    }

    pub async fn run(&self, target: &AuditTarget, progress: &dyn Progress) -> CoordinatorOutcome {
        let mut state = CoordinatorState::PrimaryPending;
        let mut trace = vec![state];
        let mut primaries = Vec::new();
        let mut fallback = None;

        while state != CoordinatorState::Done {
            state = match state {
                CoordinatorState::PrimaryPending => {
                    progress.set_phase("Measuring");
                    log::info!(target: LOG_TARGET, "Querying {} primary source(s) for {}", self.primaries.len(), target.url);

                    let results = join_all(self.primaries.iter().map(|p| p.collect(target))).await;
                    primaries = self.primaries.iter().map(|p| p.label().to_string()).zip(results).collect::<Vec<_>>();

                    let succeeded = primaries.iter().filter(|(_, r)| r.is_ok()).count();
                    CoordinatorState::after_primaries(succeeded, primaries.len())
                }

                CoordinatorState::FallbackPending => {
                    progress.set_phase("Inspecting");
                    log::info!(target: LOG_TARGET, "All primary sources failed, trying '{}'", self.fallback.label());

                    let result = self.fallback.collect(target).await;
                    fallback = Some((self.fallback.label().to_string(), result));
                    CoordinatorState::FallbackComplete
                }

                other => other.next(),
            };

            log::debug!(target: LOG_TARGET, "State: {state}");
            trace.push(state);
        }

        let supplier = if primaries.iter().any(|(_, r)| r.is_ok()) {
            Supplier::Primary
        } else if fallback.as_ref().is_some_and(|(_, r)| r.is_ok()) {
            Supplier::Fallback
        } else {
            Supplier::None
        };

        log::info!(target: LOG_TARGET, "Data supplied by: {supplier}");

        CoordinatorOutcome {
            primaries,
            fallback,
            supplier,
            trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_after_primaries() {
        assert_eq!(CoordinatorState::after_primaries(2, 2), CoordinatorState::PrimaryComplete);
        assert_eq!(CoordinatorState::after_primaries(1, 2), CoordinatorState::PrimaryPartial);
        assert_eq!(CoordinatorState::after_primaries(0, 2), CoordinatorState::PrimaryFailed);
        assert_eq!(CoordinatorState::after_primaries(0, 0), CoordinatorState::PrimaryFailed);
    }

    #[test]
    fn test_fixed_transitions() {
        assert_eq!(CoordinatorState::PrimaryFailed.next(), CoordinatorState::FallbackPending);
        assert_eq!(CoordinatorState::PrimaryComplete.next(), CoordinatorState::Done);
        assert_eq!(CoordinatorState::PrimaryPartial.next(), CoordinatorState::Done);
        assert_eq!(CoordinatorState::FallbackComplete.next(), CoordinatorState::Done);
        assert_eq!(CoordinatorState::Done.next(), CoordinatorState::Done);
    }
}
