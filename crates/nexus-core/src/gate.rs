//! Verification gate state machine
//!
//! A strictly linear, forward-only unlock pipeline. Step 1 starts
//! Unlocked, the rest Locked; completing step k unlocks step k+1, and
//! completing the last step enables key issuance.
//!
//! ```text
//! Locked ──(prev completed)──► Unlocked ──activate──► Verifying
//!                                                        │
//!                                   timer_fired(token)   │
//!                                                        ▼
//!                                                    Completed
//! ```
//!
//! The delayed completion is modeled as an explicit scheduled event:
//! [`VerificationGate::activate`] hands back a [`ScheduledVerify`] with a
//! token, the caller schedules the delay however it likes (tokio sleep,
//! test harness calling straight through) and reports back with
//! [`VerificationGate::timer_fired`]. Invalid activations and stale
//! tokens are silently ignored, never errors.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed verification delay per step
pub const VERIFY_DELAY: Duration = Duration::from_secs(5);

/// Status of one gate step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// Previous step not yet completed
    Locked,
    /// Ready to be activated
    Unlocked,
    /// Activation in flight, waiting for the timer
    Verifying,
    /// Done; never leaves this state
    Completed,
}

impl StepStatus {
    /// Status text shown next to the step
    pub fn label(&self) -> &'static str {
        match self {
            Self::Locked => "Locked",
            Self::Unlocked => "Waiting...",
            Self::Verifying => "Verifying...",
            Self::Completed => "Verified",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A pending step completion handed to the caller for scheduling
///
/// Carries a cancel token; the gate completes the step only when the
/// same token comes back via [`VerificationGate::timer_fired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledVerify {
    /// 1-based step number
    pub step: usize,
    /// Token tying the timer back to this activation
    pub token: u64,
    /// How long the caller should wait before firing
    pub delay: Duration,
}

/// Events produced when a scheduled verification fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    /// Step moved to Completed
    StepCompleted { step: usize },
    /// Next step moved from Locked to Unlocked
    StepUnlocked { step: usize },
    /// Last step completed; key issuance is now allowed
    ReadyToIssue,
}

/// Linear step-unlock state machine gating key issuance
pub struct VerificationGate {
    steps: Vec<StepStatus>,
    /// Outstanding scheduled verification, at most one
    pending: Option<(u64, usize)>,
    next_token: u64,
}

impl VerificationGate {
    /// Create a gate with `step_count` steps, step 1 unlocked
    pub fn new(step_count: usize) -> Self {
        let mut steps = vec![StepStatus::Locked; step_count];
        if let Some(first) = steps.first_mut() {
            *first = StepStatus::Unlocked;
        }
        Self {
            steps,
            pending: None,
            next_token: 0,
        }
    }

    /// Number of steps
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Status of a 1-based step, `None` when out of range
    pub fn status(&self, step: usize) -> Option<StepStatus> {
        self.steps.get(step.checked_sub(1)?).copied()
    }

    /// Whether every step is Completed
    pub fn all_completed(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| *s == StepStatus::Completed)
    }

    /// Whether key issuance is allowed
    pub fn issuance_enabled(&self) -> bool {
        self.all_completed()
    }

    /// Activate a step, moving it Unlocked → Verifying
    ///
    /// Returns the scheduled completion event, or `None` when the
    /// activation is invalid: step out of range, not Unlocked, or
    /// another step already Verifying. Invalid activations have no
    /// effect on gate state.
    pub fn activate(&mut self, step: usize) -> Option<ScheduledVerify> {
        if self.pending.is_some() {
            return None;
        }
        let index = step.checked_sub(1)?;
        match self.steps.get(index) {
            Some(StepStatus::Unlocked) => {}
            _ => return None,
        }

        self.steps[index] = StepStatus::Verifying;
        let token = self.next_token;
        self.next_token += 1;
        self.pending = Some((token, step));

        Some(ScheduledVerify {
            step,
            token,
            delay: VERIFY_DELAY,
        })
    }

    /// Report a scheduled verification as fired
    ///
    /// Completes the Verifying step and unlocks its successor, or
    /// signals readiness to issue when it was the last step. Stale or
    /// unknown tokens are ignored and return no events.
    pub fn timer_fired(&mut self, token: u64) -> Vec<GateEvent> {
        let step = match self.pending {
            Some((pending_token, step)) if pending_token == token => step,
            _ => return Vec::new(),
        };
        self.pending = None;
        self.steps[step - 1] = StepStatus::Completed;

        let mut events = vec![GateEvent::StepCompleted { step }];
        if step < self.steps.len() {
            self.steps[step] = StepStatus::Unlocked;
            events.push(GateEvent::StepUnlocked { step: step + 1 });
        } else {
            events.push(GateEvent::ReadyToIssue);
        }
        events
    }

    /// Cancel an outstanding scheduled verification
    ///
    /// Returns the step to Unlocked. No shipped flow cancels; the token
    /// exists so the scheduled event is a first-class value.
    pub fn cancel(&mut self, token: u64) -> bool {
        match self.pending {
            Some((pending_token, step)) if pending_token == token => {
                self.pending = None;
                self.steps[step - 1] = StepStatus::Unlocked;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Activate a step and fire its timer immediately
    fn walk(gate: &mut VerificationGate, step: usize) -> Vec<GateEvent> {
        let scheduled = gate.activate(step).expect("step should activate");
        gate.timer_fired(scheduled.token)
    }

    #[test]
    fn test_initial_state() {
        let gate = VerificationGate::new(3);
        assert_eq!(gate.status(1), Some(StepStatus::Unlocked));
        assert_eq!(gate.status(2), Some(StepStatus::Locked));
        assert_eq!(gate.status(3), Some(StepStatus::Locked));
        assert_eq!(gate.status(4), None);
        assert!(!gate.issuance_enabled());
    }

    #[test]
    fn test_locked_step_ignores_activation() {
        let mut gate = VerificationGate::new(3);
        assert!(gate.activate(2).is_none());
        assert_eq!(gate.status(2), Some(StepStatus::Locked));
    }

    #[test]
    fn test_completion_unlocks_next() {
        let mut gate = VerificationGate::new(3);
        let events = walk(&mut gate, 1);

        assert_eq!(
            events,
            vec![
                GateEvent::StepCompleted { step: 1 },
                GateEvent::StepUnlocked { step: 2 }
            ]
        );
        assert_eq!(gate.status(1), Some(StepStatus::Completed));
        assert_eq!(gate.status(2), Some(StepStatus::Unlocked));
    }

    #[test]
    fn test_completed_step_cannot_reactivate() {
        let mut gate = VerificationGate::new(3);
        walk(&mut gate, 1);
        assert!(gate.activate(1).is_none());
        assert_eq!(gate.status(1), Some(StepStatus::Completed));
    }

    #[test]
    fn test_one_verifying_at_a_time() {
        let mut gate = VerificationGate::new(3);
        let first = gate.activate(1).unwrap();
        // Step 1 is Verifying; nothing else may activate, itself included
        assert!(gate.activate(1).is_none());
        assert!(gate.activate(2).is_none());
        gate.timer_fired(first.token);
    }

    #[test]
    fn test_full_three_step_walk() {
        let mut gate = VerificationGate::new(3);

        walk(&mut gate, 1);
        assert_eq!(gate.status(2), Some(StepStatus::Unlocked));

        walk(&mut gate, 2);
        assert_eq!(gate.status(3), Some(StepStatus::Unlocked));

        let events = walk(&mut gate, 3);
        assert_eq!(
            events,
            vec![
                GateEvent::StepCompleted { step: 3 },
                GateEvent::ReadyToIssue
            ]
        );
        assert!(gate.all_completed());
        assert!(gate.issuance_enabled());
    }

    #[test]
    fn test_stale_token_ignored() {
        let mut gate = VerificationGate::new(2);
        let scheduled = gate.activate(1).unwrap();
        gate.timer_fired(scheduled.token);

        // Firing the same token again does nothing
        assert!(gate.timer_fired(scheduled.token).is_empty());
        // Unknown tokens do nothing
        assert!(gate.timer_fired(999).is_empty());
        assert_eq!(gate.status(2), Some(StepStatus::Unlocked));
    }

    #[test]
    fn test_cancel_returns_step_to_unlocked() {
        let mut gate = VerificationGate::new(2);
        let scheduled = gate.activate(1).unwrap();

        assert!(gate.cancel(scheduled.token));
        assert_eq!(gate.status(1), Some(StepStatus::Unlocked));
        // The cancelled timer firing later is ignored
        assert!(gate.timer_fired(scheduled.token).is_empty());
        // The step can be activated again
        assert!(gate.activate(1).is_some());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(StepStatus::Unlocked.label(), "Waiting...");
        assert_eq!(StepStatus::Verifying.label(), "Verifying...");
        assert_eq!(StepStatus::Completed.label(), "Verified");
    }
}
