// Lifecycle state tracking
//
// This module provides the StateTracker which holds the current LifecycleState behind
// Arc<RwLock<T>>, validates transitions against the lifecycle table, and broadcasts every
// transition so the presentation layer can follow along from another thread.

use std::fmt;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Phases of one launcher run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Init,
    OptimizerCheck,
    SourceResolution,
    DatasetLoad,
    Running,
    ShutdownConfirm,
    Exporting,
    PersistingState,
    Terminated,
}

impl LifecycleState {
    /// Whether the lifecycle may move from `self` to `next`.
    ///
    /// Any live state may terminate on a fatal error; `Terminated` is final.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;

        if self == Terminated {
            return false;
        }
        if next == Terminated {
            return true;
        }

        matches!(
            (self, next),
            (Init, OptimizerCheck)
                | (OptimizerCheck, SourceResolution)
                | (SourceResolution, DatasetLoad)
                | (DatasetLoad, Running)
                | (Running, ShutdownConfirm)
                | (ShutdownConfirm, Running)
                | (ShutdownConfirm, Exporting)
                | (ShutdownConfirm, PersistingState)
                | (Exporting, PersistingState)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == LifecycleState::Terminated
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A completed lifecycle transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

/// Attempted transition that the lifecycle table does not allow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid lifecycle transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

/// Thread-safe holder of the current [`LifecycleState`] with transition events.
///
/// Only the lifecycle thread calls [`advance`](Self::advance); other threads read the state or
/// [`subscribe`](Self::subscribe) to transitions.
#[derive(Clone)]
pub struct StateTracker {
    state: Arc<RwLock<LifecycleState>>,
    state_tx: broadcast::Sender<Transition>,
}

impl StateTracker {
    /// A tracker in [`LifecycleState::Init`] with a buffer of 32 transition events.
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(32);
        Self {
            state: Arc::new(RwLock::new(LifecycleState::Init)),
            state_tx,
        }
    }

    pub fn current(&self) -> LifecycleState {
        *self.state.read().unwrap()
    }

    /// Move to `next`, emitting a [`Transition`] to subscribers.
    pub fn advance(&self, next: LifecycleState) -> Result<Transition, InvalidTransition> {
        let mut state = self.state.write().unwrap();
        let from = *state;

        if !from.can_transition_to(next) {
            return Err(InvalidTransition { from, to: next });
        }

        *state = next;
        let transition = Transition { from, to: next };
        tracing::debug!("Lifecycle {} -> {}", from, next);

        // Ignore send errors - it's OK if no one is listening
        let _ = self.state_tx.send(transition);

        Ok(transition)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Transition> {
        self.state_tx.subscribe()
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    #[test]
    fn test_happy_path_is_allowed() {
        let path = [
            Init,
            OptimizerCheck,
            SourceResolution,
            DatasetLoad,
            Running,
            ShutdownConfirm,
            Exporting,
            PersistingState,
            Terminated,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?}", pair);
        }
    }

    #[test]
    fn test_skipping_is_rejected() {
        assert!(!Init.can_transition_to(SourceResolution));
        assert!(!OptimizerCheck.can_transition_to(DatasetLoad));
        assert!(!Running.can_transition_to(Exporting));
        assert!(!Exporting.can_transition_to(Running));
    }

    #[test]
    fn test_terminated_is_final() {
        for next in [Init, Running, Terminated] {
            assert!(!Terminated.can_transition_to(next));
        }
    }

    #[test]
    fn test_any_live_state_may_terminate() {
        for state in [Init, OptimizerCheck, SourceResolution, DatasetLoad, Running] {
            assert!(state.can_transition_to(Terminated));
        }
    }

    #[test]
    fn test_shutdown_cancel_returns_to_running() {
        let tracker = StateTracker::new();
        for next in [OptimizerCheck, SourceResolution, DatasetLoad, Running, ShutdownConfirm] {
            tracker.advance(next).unwrap();
        }
        tracker.advance(Running).unwrap();
        assert_eq!(tracker.current(), Running);
    }

    #[test]
    fn test_invalid_advance_keeps_state() {
        let tracker = StateTracker::new();
        let err = tracker.advance(Running).unwrap_err();
        assert_eq!(err, InvalidTransition { from: Init, to: Running });
        assert_eq!(tracker.current(), Init);
    }

    #[test]
    fn test_subscribers_receive_transitions() {
        let tracker = StateTracker::new();
        let mut rx1 = tracker.subscribe();
        let mut rx2 = tracker.clone().subscribe();

        tracker.advance(OptimizerCheck).unwrap();

        let expected = Transition { from: Init, to: OptimizerCheck };
        assert_eq!(rx1.try_recv().unwrap(), expected);
        assert_eq!(rx2.try_recv().unwrap(), expected);
    }
}
