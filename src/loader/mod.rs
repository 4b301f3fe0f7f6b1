//! # Sequential multi-body loader
//!
//! Fetches the ephemeris of every catalog body **one at a time**, pausing between requests so
//! the upstream service is never hit by two requests of the same session at once.
//!
//! ## Body lifecycle
//!
//! ```text
//! waiting ──► loading ──┬──► done   (points populated)
//!                       └──► error  (message populated, no points)
//! ```
//!
//! A retry moves a `done`/`error` body back to `waiting` and runs the same transitions.
//!
//! ## Observability
//!
//! The current [`BodyData`] list is published through a [`tokio::sync::watch`] channel, so a
//! progress view can follow every transition ([`SequentialLoader::subscribe`]). The final
//! [`SpaceDataset`] is returned by the call that ran the session.
//!
//! ## Exclusion
//!
//! Only one session or retry runs at a time. A call made while another is in flight is a no-op
//! returning `None`; it is not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::bodies::{BodyDescriptor, BODIES};
use crate::config::OrreryConfig;
use crate::horizons::client::EphemerisSource;
use crate::horizons::space_point::SpacePoint;

pub mod timing;

use timing::{as_millis_u64, fmt_dur};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyStatus {
    Waiting,
    Loading,
    Done,
    Error,
}

/// Load state and data of one body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyData {
    /// Raw identifier (Horizons id or friendly name)
    pub body: String,
    pub label: String,
    /// Ascending by date, one point per requested step
    pub points: Vec<SpacePoint>,
    pub status: BodyStatus,
    pub points_count: usize,
    pub load_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BodyData {
    pub fn waiting(descriptor: &BodyDescriptor) -> Self {
        BodyData {
            body: descriptor.id.to_string(),
            label: descriptor.label.to_string(),
            points: Vec::new(),
            status: BodyStatus::Waiting,
            points_count: 0,
            load_time_ms: 0,
            error: None,
        }
    }

    /// `done` or `error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, BodyStatus::Done | BodyStatus::Error)
    }
}

/// Snapshot of all bodies once a session (or a retry) completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceDataset {
    pub bodies: Vec<BodyData>,
    pub start_date: String,
    pub end_date: String,
    pub total_points: usize,
    pub total_load_time_ms: u64,
}

impl SpaceDataset {
    pub fn new(bodies: Vec<BodyData>, start_date: &str, end_date: &str, elapsed: Duration) -> Self {
        let total_points = bodies.iter().map(|b| b.points_count).sum();
        SpaceDataset {
            bodies,
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            total_points,
            total_load_time_ms: as_millis_u64(elapsed),
        }
    }

    /// Length of the shared time axis: the longest point sequence of any body.
    pub fn total_steps(&self) -> usize {
        self.bodies.iter().map(|b| b.points.len()).max().unwrap_or(0)
    }

    /// The body whose dates define the time axis: the first one holding points.
    pub fn reference_body(&self) -> Option<&BodyData> {
        self.bodies.iter().find(|b| !b.points.is_empty())
    }

    pub fn body(&self, id: &str) -> Option<&BodyData> {
        self.bodies.iter().find(|b| b.body == id)
    }
}

/// Message left on bodies whose load never completed.
pub const CANCELLED_MESSAGE: &str = "load cancelled";

/// Held for the duration of a session or retry.
///
/// On drop, claimed bodies still `waiting` or `loading` are marked `error` (a dropped future
/// never reaches them), then the in-flight flag is cleared.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    bodies: &'a watch::Sender<Vec<BodyData>>,
    claimed: Vec<String>,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, bodies: &'a watch::Sender<Vec<BodyData>>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight {
                flag,
                bodies,
                claimed: Vec::new(),
            })
    }

    fn claim<'b, I>(&mut self, body_ids: I)
    where
        I: IntoIterator<Item = &'b str>,
    {
        self.claimed.extend(body_ids.into_iter().map(str::to_string));
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let claimed = &self.claimed;
        self.bodies.send_if_modified(|bodies| {
            let mut cancelled = 0;
            for body in bodies
                .iter_mut()
                .filter(|b| !b.is_terminal() && claimed.contains(&b.body))
            {
                body.status = BodyStatus::Error;
                body.points.clear();
                body.points_count = 0;
                body.error = Some(CANCELLED_MESSAGE.to_string());
                cancelled += 1;
            }
            if cancelled > 0 {
                warn!(cancelled, "load interrupted before completion");
            }
            cancelled > 0
        });
        self.flag.store(false, Ordering::Release);
    }
}

pub struct SequentialLoader<S> {
    source: S,
    catalog: Vec<BodyDescriptor>,
    request_delay: Duration,
    bodies: watch::Sender<Vec<BodyData>>,
    in_flight: AtomicBool,
}

impl<S: EphemerisSource> SequentialLoader<S> {
    /// Loader over the default ten-body catalog.
    pub fn new(source: S, config: &OrreryConfig) -> Self {
        Self::with_catalog(source, BODIES.to_vec(), config.request_delay())
    }

    pub fn with_catalog(source: S, catalog: Vec<BodyDescriptor>, request_delay: Duration) -> Self {
        let (bodies, _) = watch::channel(initial_bodies(&catalog));
        SequentialLoader {
            source,
            catalog,
            request_delay,
            bodies,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Receiver following every body-state change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<BodyData>> {
        self.bodies.subscribe()
    }

    /// Current state of every body.
    pub fn bodies(&self) -> Vec<BodyData> {
        self.bodies.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn set_body<F>(&self, body_id: &str, update: F)
    where
        F: FnOnce(&mut BodyData),
    {
        self.bodies.send_modify(|bodies| {
            if let Some(body) = bodies.iter_mut().find(|b| b.body == body_id) {
                update(body);
            }
        });
    }

    fn snapshot(&self, start_date: &str, end_date: &str, elapsed: Duration) -> SpaceDataset {
        SpaceDataset::new(self.bodies(), start_date, end_date, elapsed)
    }

    async fn load_body(&self, body_id: &str, start_date: &str, end_date: &str) {
        self.set_body(body_id, |b| b.status = BodyStatus::Loading);
        let t0 = Instant::now();

        let result = self
            .source
            .fetch_ephemeris(body_id, start_date, end_date)
            .await;
        let elapsed = t0.elapsed();

        match result {
            Ok(points) => {
                info!(
                    body = body_id,
                    points = points.len(),
                    elapsed = %fmt_dur(elapsed),
                    "body loaded"
                );
                self.set_body(body_id, |b| {
                    b.status = BodyStatus::Done;
                    b.points_count = points.len();
                    b.points = points;
                    b.load_time_ms = as_millis_u64(elapsed);
                    b.error = None;
                });
            }
            Err(err) => {
                warn!(body = body_id, elapsed = %fmt_dur(elapsed), error = %err, "body failed");
                self.set_body(body_id, |b| {
                    b.status = BodyStatus::Error;
                    b.points.clear();
                    b.points_count = 0;
                    b.load_time_ms = as_millis_u64(elapsed);
                    b.error = Some(err.to_string());
                });
            }
        }
    }

    /// Run a full session over the catalog.
    ///
    /// Every body is reset to `waiting`, then loaded in catalog order with a pause after each
    /// attempt. A failing body never stops the session.
    ///
    /// Return
    /// ------
    /// * The completed dataset, or `None` when another session or retry is in flight.
    pub async fn start_load(&self, start_date: &str, end_date: &str) -> Option<SpaceDataset> {
        let Some(mut guard) = InFlight::acquire(&self.in_flight, &self.bodies) else {
            debug!(start_date, end_date, "load already in flight, start_load ignored");
            return None;
        };
        guard.claim(self.catalog.iter().map(|d| d.id));

        self.bodies.send_replace(initial_bodies(&self.catalog));
        let t0 = Instant::now();

        for descriptor in &self.catalog {
            self.load_body(descriptor.id, start_date, end_date).await;
            tokio::time::sleep(self.request_delay).await;
        }

        let dataset = self.snapshot(start_date, end_date, t0.elapsed());
        info!(
            bodies = dataset.bodies.len(),
            failed = dataset.bodies.iter().filter(|b| b.status == BodyStatus::Error).count(),
            total_points = dataset.total_points,
            elapsed = %fmt_dur(t0.elapsed()),
            "load session complete"
        );
        Some(dataset)
    }

    /// Re-fetch exactly one body, leaving the others untouched.
    ///
    /// Return
    /// ------
    /// * The refreshed dataset, or `None` when a load is in flight or the body is unknown.
    pub async fn retry_body(
        &self,
        body_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Option<SpaceDataset> {
        let Some(mut guard) = InFlight::acquire(&self.in_flight, &self.bodies) else {
            debug!(body = body_id, "load already in flight, retry ignored");
            return None;
        };

        if !self.bodies.borrow().iter().any(|b| b.body == body_id) {
            warn!(body = body_id, "retry requested for an unknown body");
            return None;
        }
        guard.claim([body_id]);

        self.set_body(body_id, |b| {
            b.status = BodyStatus::Waiting;
            b.points.clear();
            b.points_count = 0;
            b.error = None;
        });

        let t0 = Instant::now();
        self.load_body(body_id, start_date, end_date).await;
        Some(self.snapshot(start_date, end_date, t0.elapsed()))
    }
}

fn initial_bodies(catalog: &[BodyDescriptor]) -> Vec<BodyData> {
    catalog.iter().map(BodyData::waiting).collect()
}
