//! Delayed transitions of the round state machine.
//!
//! The coordinator never runs anything itself. It keeps one pending slot per
//! [`TimerKind`] and hands out [`TimerToken`]s; whoever drives time (the async
//! [`GameSession`](crate::GameSession) or [`GameEngine::advance`](crate::GameEngine::advance))
//! gives the token back when the delay elapses. A token is honoured only while
//! it is still the pending one for its kind and was issued in the current
//! round epoch, so a cancelled or superseded timer can never mutate state.

use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Evaluate the chosen hand.
    Reveal,
    /// Return to betting after a lost guess.
    LossReset,
    /// Drop the win/lose flash.
    EffectClear,
    /// End the recovery cooldown.
    RecoveryEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    id: u64,
    kind: TimerKind,
    epoch: u64,
}

impl TimerToken {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub token: TimerToken,
    pub delay: Duration,
    /// Due time on the coordinator's virtual clock.
    pub due: Duration,
}

#[derive(Debug, Default)]
pub struct TimingCoordinator {
    next_id: u64,
    epoch: u64,
    clock: Duration,
    pending: HashMap<TimerKind, ScheduledTimer>,
}

impl TimingCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn now(&self) -> Duration {
        self.clock
    }

    /// Start a new round epoch. Every pending timer is dropped.
    pub fn begin_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.pending.clear();
        self.epoch
    }

    /// Schedule `kind` after `delay`, replacing any pending timer of that kind.
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerToken {
        let token = TimerToken {
            id: self.next_id,
            kind,
            epoch: self.epoch,
        };
        self.next_id += 1;

        let timer = ScheduledTimer {
            token,
            delay,
            due: self.clock + delay,
        };
        if let Some(replaced) = self.pending.insert(kind, timer) {
            tracing::debug!("Timer {} ({:?}) superseded", replaced.token.id, kind);
        }
        token
    }

    pub fn cancel(&mut self, kind: TimerKind) -> Option<TimerToken> {
        self.pending.remove(&kind).map(|timer| timer.token)
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.contains_key(&kind)
    }

    /// Consume a fired token. Returns false for stale tokens.
    pub fn claim(&mut self, token: TimerToken) -> bool {
        if token.epoch != self.epoch {
            return false;
        }

        match self.pending.get(&token.kind) {
            Some(timer) if timer.token == token => {
                self.pending.remove(&token.kind);
                true
            }
            _ => false,
        }
    }

    /// Pending timers ordered by due time, then by scheduling order.
    pub fn pending(&self) -> Vec<ScheduledTimer> {
        let mut timers: Vec<ScheduledTimer> = self.pending.values().copied().collect();
        timers.sort_by_key(|timer| (timer.due, timer.token.id));
        timers
    }

    /// Earliest pending timer due at or before `limit`.
    pub fn next_due(&self, limit: Duration) -> Option<ScheduledTimer> {
        self.pending
            .values()
            .filter(|timer| timer.due <= limit)
            .min_by_key(|timer| (timer.due, timer.token.id))
            .copied()
    }

    pub fn set_clock(&mut self, now: Duration) {
        self.clock = self.clock.max(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_claim_consumes_token_once() {
        let mut timers = TimingCoordinator::new();
        let token = timers.schedule(TimerKind::Reveal, 1500 * MS);

        assert!(timers.claim(token));
        assert!(!timers.claim(token));
        assert!(!timers.is_pending(TimerKind::Reveal));
    }

    #[test]
    fn test_rescheduling_makes_old_token_stale() {
        let mut timers = TimingCoordinator::new();
        let old = timers.schedule(TimerKind::EffectClear, 500 * MS);
        let new = timers.schedule(TimerKind::EffectClear, 500 * MS);

        assert!(!timers.claim(old));
        assert!(timers.claim(new));
    }

    #[test]
    fn test_new_epoch_invalidates_everything() {
        let mut timers = TimingCoordinator::new();
        let reveal = timers.schedule(TimerKind::Reveal, 1500 * MS);
        let reset = timers.schedule(TimerKind::LossReset, 2500 * MS);

        timers.begin_epoch();
        assert!(timers.pending().is_empty());
        assert!(!timers.claim(reveal));
        assert!(!timers.claim(reset));
    }

    #[test]
    fn test_token_from_old_epoch_rejected_even_if_kind_rescheduled() {
        let mut timers = TimingCoordinator::new();
        let stale = timers.schedule(TimerKind::Reveal, 1500 * MS);
        timers.begin_epoch();
        let fresh = timers.schedule(TimerKind::Reveal, 1500 * MS);

        assert!(!timers.claim(stale));
        assert!(timers.claim(fresh));
    }

    #[test]
    fn test_cancel_drops_pending_timer() {
        let mut timers = TimingCoordinator::new();
        let token = timers.schedule(TimerKind::RecoveryEnd, 5000 * MS);

        assert_eq!(timers.cancel(TimerKind::RecoveryEnd), Some(token));
        assert!(!timers.claim(token));
    }

    #[test]
    fn test_next_due_orders_by_due_then_id() {
        let mut timers = TimingCoordinator::new();
        let reset = timers.schedule(TimerKind::LossReset, 2500 * MS);
        let effect = timers.schedule(TimerKind::EffectClear, 500 * MS);

        assert_eq!(timers.next_due(400 * MS), None);
        assert_eq!(timers.next_due(600 * MS).map(|t| t.token), Some(effect));

        timers.claim(effect);
        assert_eq!(timers.next_due(3000 * MS).map(|t| t.token), Some(reset));
    }

    #[test]
    fn test_due_follows_virtual_clock() {
        let mut timers = TimingCoordinator::new();
        timers.set_clock(1000 * MS);
        timers.schedule(TimerKind::Reveal, 1500 * MS);
        assert_eq!(timers.pending()[0].due, 2500 * MS);
    }
}
