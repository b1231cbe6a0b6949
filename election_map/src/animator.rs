//! Count-up animation of the summary numbers.
//!
//! Values are a function of elapsed wall-clock time only, so the caller may
//! sample them at whatever cadence its display refreshes.

use std::time::Duration;

use log::debug;

use crate::config::*;
use crate::interaction::Surface;

/// Drives a number from 0 to `target` over `duration` with a cubic ease-out.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct CountUp {
    pub target: u64,
    pub duration: Duration,
}

impl CountUp {
    pub fn new(target: u64, duration: Duration) -> CountUp {
        CountUp { target, duration }
    }

    /// The displayed value after `elapsed`.
    ///
    /// Returns exactly `target` once `elapsed >= duration`.
    ///
    /// ```
    /// use std::time::Duration;
    /// use election_map::animator::CountUp;
    ///
    /// let a = CountUp::new(50, Duration::from_millis(1000));
    /// assert_eq!(a.value_at(Duration::ZERO), 0);
    /// assert_eq!(a.value_at(Duration::from_millis(500)), 44);
    /// assert_eq!(a.value_at(Duration::from_millis(1000)), 50);
    /// ```
    pub fn value_at(&self, elapsed: Duration) -> u64 {
        if elapsed >= self.duration {
            return self.target;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let eased = 1.0 - (1.0 - t).powi(3);
        let v = (self.target as f64 * eased).round() as u64;
        v.min(self.target)
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// One count-up per summary widget, each with its own start delay.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StatAnimation {
    tracks: Vec<(StatWidget, Duration, CountUp)>,
}

impl StatAnimation {
    pub fn new(settings: &AnimationSettings, stats: &DatasetStats) -> StatAnimation {
        let tracks = settings
            .timings
            .iter()
            .map(|t| {
                (
                    t.widget,
                    t.delay,
                    CountUp::new(t.widget.value(stats), t.duration),
                )
            })
            .collect();
        StatAnimation { tracks }
    }

    /// The values of all widgets, `elapsed` after the animation started.
    /// Widgets whose delay has not passed yet show 0.
    pub fn frame(&self, elapsed: Duration) -> Vec<(StatWidget, u64)> {
        self.tracks
            .iter()
            .map(|(w, delay, a)| {
                let v = match elapsed.checked_sub(*delay) {
                    Some(local) => a.value_at(local),
                    None => 0,
                };
                (*w, v)
            })
            .collect()
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        self.tracks.iter().all(|(_, delay, a)| match elapsed.checked_sub(*delay) {
            Some(local) => a.is_done(local),
            None => false,
        })
    }

    /// Total time until the last widget settles.
    pub fn total_duration(&self) -> Duration {
        self.tracks
            .iter()
            .map(|(_, delay, a)| *delay + a.duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Pushes one frame to the surface.
    pub fn draw(&self, elapsed: Duration, surface: &mut dyn Surface) {
        let frame = self.frame(elapsed);
        debug!("draw: {:?}: {:?}", elapsed, frame);
        for (w, v) in frame {
            surface.set_number(w.element_id(), v);
        }
    }
}
