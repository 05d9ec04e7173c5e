//! Re-armable fixed-period tick schedule.
//!
//! The flow loop is driven by a single periodic timer that only exists while
//! a session runs. The schedule works on virtual time: the owner feeds it the
//! current time and asks whether a firing is due. Disarming drops any pending
//! firing, so a stopped session never receives a stray step.

use std::time::Duration;

use crate::error::{SimError, SimResult};

/// Period of the reference site's simulation timer.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(50);

/// Tracks when the next tick should fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSchedule {
    period: Duration,
    /// Time of next scheduled firing; `None` while disarmed.
    next_fire: Option<Duration>,
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self {
            period: DEFAULT_TICK_PERIOD,
            next_fire: None,
        }
    }
}

impl TickSchedule {
    /// Create a disarmed schedule. The period must be non-zero.
    pub fn new(period: Duration) -> SimResult<Self> {
        if period.is_zero() {
            return Err(SimError::InvalidArg {
                what: "tick period must be positive",
            });
        }
        Ok(Self {
            period,
            next_fire: None,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.next_fire.is_some()
    }

    /// Time of the next firing, if armed.
    pub fn next_fire(&self) -> Option<Duration> {
        self.next_fire
    }

    /// Arm the timer so that it first fires one period after `now`.
    ///
    /// Arming an armed timer keeps the existing phase.
    pub fn arm(&mut self, now: Duration) {
        if self.next_fire.is_none() {
            self.next_fire = Some(now + self.period);
        }
    }

    /// Cancel any pending firing.
    pub fn disarm(&mut self) {
        self.next_fire = None;
    }

    /// If a firing is due at or before `now`, consume it, schedule the next
    /// one a period later and return the time it was due.
    ///
    /// Call repeatedly to drain every firing up to `now`; the owner decides
    /// between calls whether to [`disarm`](Self::disarm).
    pub fn poll(&mut self, now: Duration) -> Option<Duration> {
        let due = self.next_fire?;
        if due > now {
            return None;
        }
        self.next_fire = Some(due + self.period);
        Some(due)
    }

    /// Restart the period at `now` after an off-schedule step. No-op while
    /// disarmed.
    pub fn rephase(&mut self, now: Duration) {
        if self.next_fire.is_some() {
            self.next_fire = Some(now + self.period);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn zero_period_rejected() {
        assert!(TickSchedule::new(Duration::ZERO).is_err());
        assert_eq!(TickSchedule::new(ms(20)).unwrap().period(), ms(20));
    }

    #[test]
    fn disarmed_never_fires() {
        let mut schedule = TickSchedule::default();
        assert!(!schedule.is_armed());
        assert_eq!(schedule.poll(ms(10_000)), None);
    }

    #[test]
    fn fires_once_per_period() {
        let mut schedule = TickSchedule::default();
        schedule.arm(ms(0));

        // Should not fire before one period has elapsed
        assert_eq!(schedule.poll(ms(49)), None);

        // Should fire at t=50
        assert_eq!(schedule.poll(ms(50)), Some(ms(50)));
        assert_eq!(schedule.poll(ms(50)), None);
        assert_eq!(schedule.next_fire(), Some(ms(100)));
    }

    #[test]
    fn drains_every_due_firing_in_order() {
        let mut schedule = TickSchedule::default();
        schedule.arm(ms(0));

        let mut fired = Vec::new();
        while let Some(at) = schedule.poll(ms(175)) {
            fired.push(at);
        }
        assert_eq!(fired, vec![ms(50), ms(100), ms(150)]);
        assert_eq!(schedule.next_fire(), Some(ms(200)));
    }

    #[test]
    fn disarm_drops_pending_firing() {
        let mut schedule = TickSchedule::default();
        schedule.arm(ms(0));
        assert!(schedule.poll(ms(50)).is_some());
        schedule.disarm();
        assert_eq!(schedule.poll(ms(500)), None);
        assert_eq!(schedule.next_fire(), None);
    }

    #[test]
    fn rearm_keeps_phase() {
        let mut schedule = TickSchedule::default();
        schedule.arm(ms(0));
        schedule.arm(ms(30));
        assert_eq!(schedule.next_fire(), Some(ms(50)));

        schedule.disarm();
        schedule.arm(ms(30));
        assert_eq!(schedule.next_fire(), Some(ms(80)));
    }

    #[test]
    fn rephase_restarts_period() {
        let mut schedule = TickSchedule::default();
        schedule.rephase(ms(30));
        assert!(!schedule.is_armed());

        schedule.arm(ms(0));
        schedule.rephase(ms(30));
        assert_eq!(schedule.poll(ms(50)), None);
        assert_eq!(schedule.poll(ms(80)), Some(ms(80)));
    }
}
