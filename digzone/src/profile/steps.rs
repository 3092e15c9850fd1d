//! Step-counter to currency conversion.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bookkeeping for a cumulative hardware step counter.
///
/// Step counters report the total since boot, so coins are awarded for the
/// difference between consecutive readings. One step earns one coin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepAccrual {
    day: Option<NaiveDate>,
    last_steps: Option<u64>,
}

impl StepAccrual {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    pub fn last_steps(&self) -> Option<u64> {
        self.last_steps
    }

    /// Records a reading taken on `day` and returns the coins earned.
    ///
    /// The first reading, the first reading of a new day, and a reading
    /// below the baseline (counter reset) all re-base without earning.
    pub fn record(&mut self, day: NaiveDate, reading: u64) -> u64 {
        let baseline = match (self.day, self.last_steps) {
            (Some(d), Some(last)) if d == day => last,
            _ => {
                self.day = Some(day);
                self.last_steps = Some(reading);
                return 0;
            }
        };

        if reading < baseline {
            debug!(baseline, reading, "Step counter went backwards, re-basing");
            self.last_steps = Some(reading);
            return 0;
        }

        self.last_steps = Some(reading);
        reading - baseline
    }
}
