//! Auto-advance scheduler
//!
//! ```text
//!            enable (count > 1)
//!   Stopped ───────────────────▶ Running
//!      ▲  ◀─────── disable ───────  │ ▲
//!      │                pause_for_drag │ resume_after_drag (enabled)
//!      │                            ▼ │
//!      └── resume_after_drag ──── Paused
//!           (disabled)
//! ```
//!
//! Any state drops to `Stopped` when the dataset shrinks to one item or
//! fewer. The scheduler owns the deadline of its repeating timer but never
//! touches the active index: a tick only yields the slot to scroll to.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::utils::wrap_next;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone)]
pub struct AutoAdvanceScheduler {
    state: SchedulerState,
    enabled: bool,
    interval: Duration,
    item_count: usize,
    next_due: Option<Instant>,
}

impl AutoAdvanceScheduler {
    pub fn new(enabled: bool, interval: Duration, item_count: usize, now: Instant) -> Self {
        let mut scheduler = Self {
            state: SchedulerState::Stopped,
            enabled,
            interval,
            item_count,
            next_due: None,
        };
        if enabled && item_count > 1 {
            scheduler.start(now);
        }
        scheduler
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next tick is due, `None` unless running
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    fn can_run(&self) -> bool {
        self.enabled && self.item_count > 1
    }

    fn start(&mut self, now: Instant) {
        self.state = SchedulerState::Running;
        self.next_due = Some(now + self.interval);
    }

    fn stop(&mut self) {
        self.state = SchedulerState::Stopped;
        self.next_due = None;
    }

    fn transition(&mut self, to: SchedulerState, now: Instant) {
        if self.state == to {
            return;
        }
        debug!("Auto-advance: {:?} -> {:?}", self.state, to);
        match to {
            SchedulerState::Running => self.start(now),
            SchedulerState::Stopped => self.stop(),
            SchedulerState::Paused => {
                self.state = SchedulerState::Paused;
                self.next_due = None;
            }
        }
    }

    pub fn enable(&mut self, now: Instant) {
        self.enabled = true;
        // A paused scheduler waits for the drag to end
        if self.state == SchedulerState::Stopped && self.can_run() {
            self.transition(SchedulerState::Running, now);
        }
    }

    pub fn disable(&mut self, now: Instant) {
        self.enabled = false;
        if self.state == SchedulerState::Running {
            self.transition(SchedulerState::Stopped, now);
        }
    }

    /// Stop ticking while the user holds the surface.
    ///
    /// Also parks a `Stopped` scheduler so that enabling auto-advance
    /// mid-drag cannot start a timer under the user's finger.
    pub fn pause_for_drag(&mut self, now: Instant) {
        if self.item_count > 1 {
            self.transition(SchedulerState::Paused, now);
        }
    }

    pub fn resume_after_drag(&mut self, now: Instant) {
        if self.state != SchedulerState::Paused {
            return;
        }
        let to = if self.can_run() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        };
        self.transition(to, now);
    }

    /// Dataset size changed (full reconfiguration)
    pub fn set_item_count(&mut self, item_count: usize, now: Instant) {
        self.item_count = item_count;
        match self.state {
            _ if item_count <= 1 => self.transition(SchedulerState::Stopped, now),
            SchedulerState::Stopped if self.enabled => {
                self.transition(SchedulerState::Running, now)
            }
            SchedulerState::Running => self.restart(now),
            _ => {}
        }
    }

    /// New period; a running timer restarts with the full new interval
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.restart(now);
    }

    /// Active index changed: measure the next tick from now
    pub fn restart(&mut self, now: Instant) {
        if self.state == SchedulerState::Running {
            self.next_due = Some(now + self.interval);
        }
    }

    /// Fire if due. Returns the slot the surface should scroll to.
    pub fn tick(&mut self, now: Instant, active_index: usize) -> Option<usize> {
        if self.state != SchedulerState::Running {
            return None;
        }
        match self.next_due {
            Some(due) if due <= now => {}
            _ => return None,
        }
        self.next_due = Some(now + self.interval);
        wrap_next(active_index, self.item_count)
    }

    /// Unmount: release the timer for good
    pub fn teardown(&mut self) {
        self.enabled = false;
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(3000);

    fn running(count: usize) -> (AutoAdvanceScheduler, Instant) {
        let now = Instant::now();
        (AutoAdvanceScheduler::new(true, INTERVAL, count, now), now)
    }

    mod transitions {
        use super::*;

        #[test]
        fn initial_state() {
            let now = Instant::now();
            assert_eq!(
                AutoAdvanceScheduler::new(true, INTERVAL, 3, now).state(),
                SchedulerState::Running
            );
            assert_eq!(
                AutoAdvanceScheduler::new(false, INTERVAL, 3, now).state(),
                SchedulerState::Stopped
            );
            assert_eq!(
                AutoAdvanceScheduler::new(true, INTERVAL, 1, now).state(),
                SchedulerState::Stopped
            );
            assert_eq!(
                AutoAdvanceScheduler::new(true, INTERVAL, 0, now).state(),
                SchedulerState::Stopped
            );
        }

        #[test]
        fn enable_and_disable() {
            let now = Instant::now();
            let mut s = AutoAdvanceScheduler::new(false, INTERVAL, 3, now);
            s.enable(now);
            assert_eq!(s.state(), SchedulerState::Running);
            assert_eq!(s.next_due(), Some(now + INTERVAL));
            s.disable(now);
            assert_eq!(s.state(), SchedulerState::Stopped);
            assert_eq!(s.next_due(), None);
        }

        #[test]
        fn enable_with_single_item_stays_stopped() {
            let now = Instant::now();
            let mut s = AutoAdvanceScheduler::new(false, INTERVAL, 1, now);
            s.enable(now);
            assert_eq!(s.state(), SchedulerState::Stopped);
        }

        #[test]
        fn drag_pauses_and_resumes() {
            let (mut s, now) = running(4);
            s.pause_for_drag(now);
            assert_eq!(s.state(), SchedulerState::Paused);
            assert_eq!(s.next_due(), None);

            let later = now + Duration::from_millis(500);
            s.resume_after_drag(later);
            assert_eq!(s.state(), SchedulerState::Running);
            assert_eq!(s.next_due(), Some(later + INTERVAL));
        }

        #[test]
        fn resume_after_disable_stops() {
            let (mut s, now) = running(4);
            s.pause_for_drag(now);
            s.disable(now);
            assert_eq!(s.state(), SchedulerState::Paused);
            s.resume_after_drag(now);
            assert_eq!(s.state(), SchedulerState::Stopped);
        }

        #[test]
        fn enable_during_drag_waits_for_release() {
            let now = Instant::now();
            let mut s = AutoAdvanceScheduler::new(false, INTERVAL, 4, now);
            s.pause_for_drag(now);
            s.enable(now);
            assert_eq!(s.state(), SchedulerState::Paused);
            assert_eq!(s.tick(now + INTERVAL * 10, 0), None);
            s.resume_after_drag(now);
            assert_eq!(s.state(), SchedulerState::Running);
        }

        #[test]
        fn shrinking_dataset_stops_from_any_state() {
            let (mut s, now) = running(4);
            s.set_item_count(1, now);
            assert_eq!(s.state(), SchedulerState::Stopped);

            let (mut s, now) = running(4);
            s.pause_for_drag(now);
            s.set_item_count(0, now);
            assert_eq!(s.state(), SchedulerState::Stopped);
        }

        #[test]
        fn growing_dataset_starts_when_enabled() {
            let now = Instant::now();
            let mut s = AutoAdvanceScheduler::new(true, INTERVAL, 1, now);
            s.set_item_count(3, now);
            assert_eq!(s.state(), SchedulerState::Running);
        }

        #[test]
        fn teardown_stops() {
            let (mut s, now) = running(4);
            s.teardown();
            assert_eq!(s.state(), SchedulerState::Stopped);
            assert_eq!(s.next_due(), None);
            s.resume_after_drag(now);
            assert_eq!(s.state(), SchedulerState::Stopped);
        }
    }

    mod ticking {
        use super::*;

        #[test]
        fn tick_waits_for_deadline() {
            let (mut s, now) = running(4);
            assert_eq!(s.tick(now + INTERVAL / 2, 0), None);
            assert_eq!(s.tick(now + INTERVAL, 0), Some(1));
        }

        #[test]
        fn tick_wraps_around() {
            let (mut s, now) = running(4);
            assert_eq!(s.tick(now + INTERVAL, 3), Some(0));
        }

        #[test]
        fn tick_rearms_timer() {
            let (mut s, now) = running(4);
            let first = now + INTERVAL;
            s.tick(first, 0);
            assert_eq!(s.next_due(), Some(first + INTERVAL));
            assert_eq!(s.tick(first + INTERVAL / 2, 1), None);
        }

        #[test]
        fn interval_change_restarts_timer() {
            let (mut s, now) = running(4);
            let later = now + Duration::from_millis(2500);
            s.set_interval(Duration::from_millis(1000), later);
            assert_eq!(s.next_due(), Some(later + Duration::from_millis(1000)));
            // The old deadline no longer fires
            assert_eq!(s.tick(now + INTERVAL, 0), None);
        }

        #[test]
        fn restart_pushes_deadline() {
            let (mut s, now) = running(4);
            let later = now + Duration::from_millis(2000);
            s.restart(later);
            assert_eq!(s.tick(now + INTERVAL, 0), None);
            assert_eq!(s.tick(later + INTERVAL, 0), Some(1));
        }

        #[test]
        fn paused_never_ticks() {
            let (mut s, now) = running(4);
            s.pause_for_drag(now);
            for n in 1..20 {
                assert_eq!(s.tick(now + INTERVAL * n, 0), None);
            }
        }
    }
}
