use chrono::{NaiveDateTime, NaiveTime};
use log::debug;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use crate::widget::timer::{TimerSlot, spawn_once, spawn_repeating};

/// Wall-clock delay until the next local `00:00`.
pub fn until_next_midnight(now: NaiveDateTime) -> Duration {
    let today = now.date();
    let tomorrow = today.succ_opt().unwrap_or(today);
    let midnight = tomorrow.and_time(NaiveTime::MIN);
    (midnight - now).to_std().unwrap_or(Duration::ZERO)
}

/// The two refresh timers of a board: a fixed period and the next midnight.
#[derive(Debug, Default)]
pub struct RefreshSchedule {
    periodic: TimerSlot,
    midnight: TimerSlot,
}

impl RefreshSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)starts the periodic timer; its first firing is one period from now.
    pub fn restart_periodic<M>(&mut self, period: Duration, tx: UnboundedSender<M>, msg: M)
    where
        M: Clone + Send + 'static,
    {
        debug!("Periodic refresh every {}s", period.as_secs());
        self.periodic
            .replace(spawn_repeating(period, false, tx, msg));
    }

    /// (Re)arms the midnight timer from the current wall clock, so day
    /// boundaries never drift with the periodic timer.
    pub fn arm_midnight<M>(&mut self, now: NaiveDateTime, tx: UnboundedSender<M>, msg: M)
    where
        M: Send + 'static,
    {
        let delay = until_next_midnight(now);
        debug!("Midnight refresh in {}s", delay.as_secs());
        self.midnight.replace(spawn_once(delay, tx, msg));
    }
}
