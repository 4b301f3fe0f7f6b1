//! # Playback engine
//!
//! Drives a continuous, real-valued **day index** over the shared time axis of a
//! [`SpaceDataset`] and answers "where is every body right now?" for any non-integral index.
//!
//! ## Time axis
//!
//! `total_steps` is the length of the longest point sequence of the dataset. The index
//! always satisfies `0 ≤ index ≤ total_steps − 1`. Bodies with fewer samples are clamped to
//! their own last point.
//!
//! ## Driving the clock
//!
//! The caller owns the frame loop and feeds monotonic timestamps to [`Playback::tick`]:
//!
//! ```rust, no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use orrery::animation::Playback;
//! # fn dataset() -> orrery::loader::SpaceDataset { unimplemented!() }
//!
//! let mut playback = Playback::new(365.0);
//! playback.set_dataset(Some(Arc::new(dataset())));
//! playback.play();
//!
//! let mut ts = Duration::ZERO;
//! while playback.tick(ts).should_continue() {
//!     ts += Duration::from_millis(16);
//! }
//! assert!(!playback.is_playing());
//! ```
//!
//! [`Playback::run_frames`] is the same loop paced by a tokio interval.
//!
//! Once the index reaches the last step the playback pauses on its own (the *ended*
//! condition). Seeks and speed changes act directly on the authoritative clock; the copy
//! published by [`Playback::subscribe`] is only ever written from it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::bodies::{AliasTable, CATALOG_ALIASES};
use crate::config::{OrreryConfig, DEFAULT_SPEED};
use crate::horizons::space_point::SpacePoint;
use crate::loader::SpaceDataset;

pub mod clock;
pub mod interpolation;

use clock::DayClock;
use interpolation::interpolate_point;

/// Result of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still playing, schedule another frame.
    Continue,
    /// The index reached the last step and playback paused.
    Ended,
    /// Not playing, the frame was ignored.
    Idle,
}

impl TickOutcome {
    pub fn should_continue(self) -> bool {
        self == TickOutcome::Continue
    }
}

/// Interpolated points of every body, reachable by raw id, label or English name.
#[derive(Debug, Clone)]
pub struct PositionMap {
    points: HashMap<String, SpacePoint>,
    aliases: Arc<AliasTable>,
}

impl PositionMap {
    pub fn get(&self, key: &str) -> Option<&SpacePoint> {
        let canonical = self.aliases.canonical(key).unwrap_or(key);
        self.points.get(canonical)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// `(raw id, point)` pairs, one per body.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpacePoint)> {
        self.points.iter().map(|(id, p)| (id.as_str(), p))
    }

    /// Number of bodies with a position.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed >= 0.0
}

/// Playback session over one dataset.
#[derive(Debug)]
pub struct Playback {
    dataset: Option<Arc<SpaceDataset>>,
    aliases: Arc<AliasTable>,
    clock: DayClock,
    playing: bool,
    speed: f64,
    last_tick: Option<Duration>,
}

impl Playback {
    /// Empty session; `speed` in simulated days per real second.
    ///
    /// A non-finite or negative speed falls back to [`DEFAULT_SPEED`].
    pub fn new(speed: f64) -> Self {
        let speed = if is_valid_speed(speed) {
            speed
        } else {
            warn!(speed, fallback = DEFAULT_SPEED, "invalid playback speed, using default");
            DEFAULT_SPEED
        };
        Playback {
            dataset: None,
            aliases: Arc::new(CATALOG_ALIASES.clone()),
            clock: DayClock::new(),
            playing: false,
            speed,
            last_tick: None,
        }
    }

    /// Empty session at the configured default speed.
    pub fn from_config(config: &OrreryConfig) -> Self {
        Playback::new(config.default_speed)
    }

    /// Attach a dataset. A different dataset (by reference) pauses and rewinds to index 0;
    /// passing the same `Arc` again keeps the current position.
    pub fn set_dataset(&mut self, dataset: Option<Arc<SpaceDataset>>) {
        let same = match (&self.dataset, &dataset) {
            (Some(current), Some(next)) => Arc::ptr_eq(current, next),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }

        self.aliases = Arc::new(match &dataset {
            Some(ds) => CATALOG_ALIASES
                .with_bodies(ds.bodies.iter().map(|b| (b.body.as_str(), b.label.as_str()))),
            None => CATALOG_ALIASES.clone(),
        });
        self.dataset = dataset;
        self.playing = false;
        self.last_tick = None;
        self.clock.set(0.0);
        debug!(total_steps = self.total_steps(), "playback dataset changed");
    }

    pub fn dataset(&self) -> Option<&Arc<SpaceDataset>> {
        self.dataset.as_ref()
    }

    pub fn total_steps(&self) -> usize {
        self.dataset.as_ref().map_or(0, |ds| ds.total_steps())
    }

    fn last_index(&self) -> f64 {
        self.total_steps().saturating_sub(1) as f64
    }

    /// Authoritative day index.
    pub fn day_index(&self) -> f64 {
        self.clock.get()
    }

    /// Display copy of the day index.
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.clock.subscribe()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Start advancing. No-op when already playing or with fewer than two steps.
    pub fn play(&mut self) {
        if self.playing || self.total_steps() < 2 {
            return;
        }
        self.playing = true;
        self.last_tick = None;
        debug!(index = self.clock.get(), speed = self.speed, "playback started");
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.last_tick = None;
    }

    pub fn reset(&mut self) {
        self.pause();
        self.clock.set(0.0);
    }

    /// Change the advance rate from the next frame on. Non-finite or negative speeds are
    /// ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if !is_valid_speed(speed) {
            warn!(speed, "ignoring invalid playback speed");
            return;
        }
        self.speed = speed;
    }

    /// Jump to the first sample dated on or after `iso` (`YYYY-MM-DD`) on the reference body,
    /// or to its last sample when every date is earlier.
    pub fn seek_to_date(&mut self, iso: &str) {
        let Some(reference) = self.dataset.as_ref().and_then(|ds| ds.reference_body()) else {
            return;
        };
        let index = reference
            .points
            .iter()
            .position(|p| p.date.as_str() >= iso)
            .unwrap_or(reference.points.len() - 1);
        self.clock.set(index as f64);
    }

    /// Jump to `pct` percent of the time axis, clamped to `[0, 100]`.
    pub fn seek_to_progress(&mut self, pct: f64) {
        if self.total_steps() == 0 {
            return;
        }
        let fraction = if pct.is_nan() {
            0.0
        } else {
            (pct / 100.0).clamp(0.0, 1.0)
        };
        self.clock.set(fraction * self.last_index());
    }

    /// Advance the clock to the frame stamped `timestamp`.
    ///
    /// The first frame after [`play`](Self::play) only records the timestamp. Later frames
    /// add `elapsed × speed` days; reaching the last step clamps there and pauses.
    pub fn tick(&mut self, timestamp: Duration) -> TickOutcome {
        if !self.playing {
            return TickOutcome::Idle;
        }

        let previous = self.last_tick.replace(timestamp).unwrap_or(timestamp);
        let elapsed = timestamp.saturating_sub(previous);
        let next = self.clock.get() + elapsed.as_secs_f64() * self.speed;

        let last = self.last_index();
        if next >= last {
            self.clock.set(last);
            self.pause();
            debug!(index = last, "playback reached the end");
            return TickOutcome::Ended;
        }

        self.clock.set(next);
        TickOutcome::Continue
    }

    /// Tick on a fixed frame period until the playback stops.
    ///
    /// Return
    /// ------
    /// * The number of frames ticked.
    pub async fn run_frames(&mut self, period: Duration) -> usize {
        let origin = Instant::now();
        let mut frames = interval(period);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut count = 0;

        loop {
            let now = frames.tick().await;
            count += 1;
            if !self.tick(now.duration_since(origin)).should_continue() {
                return count;
            }
        }
    }

    /// Interpolated position of every body holding points, or `None` without data.
    pub fn current_positions(&self) -> Option<PositionMap> {
        let dataset = self.dataset.as_ref()?;
        if dataset.total_steps() == 0 {
            return None;
        }

        let index = self.clock.get();
        let floor = index.floor();
        let frac = index - floor;
        let floor = floor as usize;

        let points = dataset
            .bodies
            .iter()
            .filter(|b| !b.points.is_empty())
            .map(|body| {
                let last = body.points.len() - 1;
                let i = floor.min(last);
                let j = (i + 1).min(last);
                let point = if frac > 0.0 && i != j {
                    interpolate_point(&body.points[i], &body.points[j], frac)
                } else {
                    body.points[i].clone()
                };
                (body.body.clone(), point)
            })
            .collect();

        Some(PositionMap {
            points,
            aliases: Arc::clone(&self.aliases),
        })
    }

    /// Date of the reference body's sample at `floor(index)`.
    pub fn current_date(&self) -> Option<&str> {
        let reference = self.dataset.as_ref()?.reference_body()?;
        let i = (self.clock.get().floor() as usize).min(reference.points.len() - 1);
        Some(reference.points[i].date.as_str())
    }

    /// `index / (total_steps − 1) × 100`, or 0 with fewer than two steps.
    pub fn progress(&self) -> f64 {
        if self.total_steps() > 1 {
            self.clock.get() / self.last_index() * 100.0
        } else {
            0.0
        }
    }
}
