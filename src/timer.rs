use std::fmt;
use std::time::Duration;

use tracing::{debug, trace};

/// Length of one countdown tick
pub const TICK: Duration = Duration::from_secs(1);

pub type ExpireCallback = Box<dyn FnMut()>;

/// Counts whole seconds down to zero and calls `on_expire` once when it gets
/// there.
///
/// The timer does not schedule anything itself: its owner feeds it elapsed
/// time through [`CountdownTimer::advance`] (or single ticks through
/// [`CountdownTimer::tick`]). Stopping is therefore just a flag, and dropping
/// the timer leaves nothing behind that could fire later.
pub struct CountdownTimer {
    allowed_seconds: i64,
    seconds_left: i64,
    running: bool,
    // time banked towards the next tick
    pending: Duration,
    on_expire: ExpireCallback,
}

impl CountdownTimer {
    pub fn new(allowed_seconds: i64, on_expire: impl FnMut() + 'static) -> Self {
        Self {
            allowed_seconds,
            seconds_left: allowed_seconds,
            running: false,
            pending: Duration::ZERO,
            on_expire: Box::new(on_expire),
        }
    }

    /// Sets the total duration. While stopped the counter jumps to the new
    /// value; a running countdown keeps counting from where it is.
    pub fn configure(&mut self, allowed_seconds: i64) {
        self.allowed_seconds = allowed_seconds;
        if !self.running {
            self.seconds_left = allowed_seconds;
        }
        debug!(allowed_seconds, running = self.running, "timer configured");
    }

    /// Begins ticking. Starting a running timer does nothing.
    pub fn start(&mut self) {
        if self.running {
            debug!("ignored start on running timer");
            return;
        }
        self.running = true;
        self.pending = Duration::ZERO;
        debug!(seconds_left = self.seconds_left, "timer started");
    }

    /// One tick. Ignored unless running.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        trace!(seconds_left = self.seconds_left, "tick");
        if self.seconds_left <= 0 {
            self.seconds_left = 0;
            self.running = false;
            self.pending = Duration::ZERO;
            debug!("timer expired");
            (self.on_expire)();
        }
    }

    /// Feeds `elapsed` wall time to the timer, firing one tick per whole
    /// second accumulated. Returns the number of ticks fired.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.pending += elapsed;
        let mut fired = 0;
        while self.running && self.pending >= TICK {
            self.pending -= TICK;
            self.tick();
            fired += 1;
        }
        fired
    }

    /// Stops any countdown and refills the counter. Safe in any state.
    pub fn reset(&mut self) {
        self.running = false;
        self.pending = Duration::ZERO;
        self.seconds_left = self.allowed_seconds;
        debug!(seconds_left = self.seconds_left, "timer reset");
    }

    /// Stops ticking but keeps the counter where it is, e.g. to show the
    /// time that was left when the text was finished.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.pending = Duration::ZERO;
            debug!(seconds_left = self.seconds_left, "timer stopped");
        }
    }

    pub fn seconds_left(&self) -> i64 {
        self.seconds_left
    }

    pub fn allowed_seconds(&self) -> i64 {
        self.allowed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl fmt::Debug for CountdownTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("allowed_seconds", &self.allowed_seconds)
            .field("seconds_left", &self.seconds_left)
            .field("running", &self.running)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counted(allowed_seconds: i64) -> (CountdownTimer, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let hook = Rc::clone(&calls);
        let timer = CountdownTimer::new(allowed_seconds, move || hook.set(hook.get() + 1));
        (timer, calls)
    }

    #[test]
    fn test_initial_state() {
        let (timer, calls) = counted(60);

        assert_eq!(timer.seconds_left(), 60);
        assert!(!timer.is_running());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_counts_down_one_per_second() {
        let (mut timer, _calls) = counted(60);
        timer.start();

        timer.advance(Duration::from_secs(1));
        assert_eq!(timer.seconds_left(), 59);

        timer.advance(Duration::from_secs(9));
        assert_eq!(timer.seconds_left(), 50);
    }

    #[test]
    fn test_expires_exactly_once() {
        let (mut timer, calls) = counted(5);
        timer.configure(5);
        timer.start();

        for _ in 0..5 {
            timer.advance(TICK);
        }

        assert_eq!(timer.seconds_left(), 0);
        assert!(!timer.is_running());
        assert_eq!(calls.get(), 1);

        timer.advance(Duration::from_secs(10));
        assert_eq!(timer.seconds_left(), 0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_double_start_does_not_double_decrement() {
        let (mut timer, _calls) = counted(60);
        timer.start();
        timer.start();

        let fired = timer.advance(Duration::from_secs(1));

        assert_eq!(fired, 1);
        assert_eq!(timer.seconds_left(), 59);
    }

    #[test]
    fn test_partial_seconds_accumulate() {
        let (mut timer, _calls) = counted(10);
        timer.start();

        for _ in 0..9 {
            timer.advance(Duration::from_millis(100));
        }
        assert_eq!(timer.seconds_left(), 10);

        timer.advance(Duration::from_millis(100));
        assert_eq!(timer.seconds_left(), 9);
    }

    #[test]
    fn test_reset_restores_allowed_and_stops() {
        let (mut timer, calls) = counted(60);
        timer.start();
        timer.advance(Duration::from_secs(10));
        assert_eq!(timer.seconds_left(), 50);

        timer.reset();

        assert_eq!(timer.seconds_left(), 60);
        assert!(!timer.is_running());
        timer.advance(Duration::from_secs(120));
        assert_eq!(timer.seconds_left(), 60);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_reset_discards_banked_time() {
        let (mut timer, _calls) = counted(10);
        timer.start();
        timer.advance(Duration::from_millis(900));
        timer.reset();
        timer.start();

        timer.advance(Duration::from_millis(200));

        assert_eq!(timer.seconds_left(), 10);
    }

    #[test]
    fn test_reset_when_idle_is_safe() {
        let (mut timer, calls) = counted(30);
        timer.reset();
        timer.reset();

        assert_eq!(timer.seconds_left(), 30);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_configure_while_stopped_applies_immediately() {
        let (mut timer, _calls) = counted(45);
        timer.configure(90);

        assert_eq!(timer.seconds_left(), 90);
        assert_eq!(timer.allowed_seconds(), 90);
    }

    #[test]
    fn test_configure_while_running_waits_for_reset() {
        let (mut timer, _calls) = counted(45);
        timer.start();
        timer.advance(Duration::from_secs(5));

        timer.configure(90);
        assert_eq!(timer.seconds_left(), 40);

        timer.reset();
        assert_eq!(timer.seconds_left(), 90);
    }

    #[test]
    fn test_stop_freezes_counter_without_expiring() {
        let (mut timer, calls) = counted(10);
        timer.start();
        timer.advance(Duration::from_secs(3));

        timer.stop();
        timer.advance(Duration::from_secs(30));

        assert_eq!(timer.seconds_left(), 7);
        assert!(!timer.is_running());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_zero_duration_expires_on_first_tick() {
        let (mut timer, calls) = counted(0);
        timer.start();
        assert_eq!(calls.get(), 0);
        assert!(timer.is_running());

        timer.tick();

        assert_eq!(timer.seconds_left(), 0);
        assert!(!timer.is_running());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_negative_duration_clamps_to_zero() {
        let (mut timer, calls) = counted(-3);
        timer.start();

        timer.advance(TICK);

        assert_eq!(timer.seconds_left(), 0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_most_negative_duration_expires_without_overflow() {
        let (mut timer, calls) = counted(i64::MIN);
        timer.start();

        timer.tick();

        assert_eq!(timer.seconds_left(), 0);
        assert!(!timer.is_running());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_ticks_ignored_when_not_started() {
        let (mut timer, calls) = counted(3);

        timer.tick();
        assert_eq!(timer.advance(Duration::from_secs(5)), 0);

        assert_eq!(timer.seconds_left(), 3);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_restart_after_expiry_needs_reset_to_refill() {
        let (mut timer, calls) = counted(2);
        timer.start();
        timer.advance(Duration::from_secs(2));
        assert_eq!(calls.get(), 1);

        timer.reset();
        timer.start();
        timer.advance(Duration::from_secs(2));

        assert_eq!(calls.get(), 2);
    }
}
