use std::future::Future;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::parser::{parse_horizons_text, START_MARKER};
use super::space_point::{to_space_point, NonFinitePolicy, SpacePoint};
use crate::bodies::horizons_command;
use crate::config::OrreryConfig;
use crate::orrery_errors::OrreryError;
use crate::time::DateRange;

/// Anything able to produce the enriched points of one body over a date range.
///
/// The sequential loader is generic over this seam; [`HorizonsClient`] is the production
/// implementation.
pub trait EphemerisSource {
    fn fetch_ephemeris(
        &self,
        body_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> impl Future<Output = Result<Vec<SpacePoint>, OrreryError>> + Send;
}

/// Shape of the Horizons `format=json` envelope.
#[derive(Debug, Deserialize)]
struct HorizonsApiResponse {
    result: Option<String>,
    error: Option<String>,
}

/// HTTP client for the JPL Horizons `VECTORS` endpoint.
///
/// Requests heliocentric (`CENTER=500@10`) ecliptic J2000 state vectors in AU and AU/day with
/// light time and range (`VEC_TABLE=3`), which is the layout the parser expects.
#[derive(Debug, Clone)]
pub struct HorizonsClient {
    http_client: reqwest::Client,
    base_url: String,
    step_size: String,
    non_finite_policy: NonFinitePolicy,
}

impl HorizonsClient {
    pub fn new(config: &OrreryConfig) -> Result<Self, OrreryError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(HorizonsClient {
            http_client,
            base_url: config.horizons_url.clone(),
            step_size: config.step_size.clone(),
            non_finite_policy: config.non_finite_policy,
        })
    }

    /// Query string of a vectors request.
    ///
    /// Arguments
    /// ---------
    /// * `body_id`: catalog identifier (`"599"`, `"Voyager_1"`, …)
    /// * `range`: the requested dates
    ///
    /// Return
    /// ------
    /// * The `(key, value)` pairs, `COMMAND` first.
    pub(crate) fn query_params(
        &self,
        body_id: &str,
        range: &DateRange,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("COMMAND", horizons_command(body_id)),
            ("format", "json".into()),
            ("OBJ_DATA", "NO".into()),
            ("MAKE_EPHEM", "YES".into()),
            ("EPHEM_TYPE", "VECTORS".into()),
            ("CENTER", "500@10".into()),
            ("START_TIME", range.start_date.clone()),
            ("STOP_TIME", range.end_date.clone()),
            ("STEP_SIZE", self.step_size.clone()),
            ("VEC_TABLE", "3".into()),
            ("REF_PLANE", "ECLIPTIC".into()),
            ("REF_SYSTEM", "J2000".into()),
            ("VEC_CORR", "NONE".into()),
            ("VEC_LABELS", "YES".into()),
            ("OUT_UNITS", "AU-D".into()),
        ]
    }

    /// Request the raw ephemeris text of one body.
    ///
    /// Return
    /// ------
    /// * The `result` text of the Horizons response, or an error for a non-success HTTP status,
    ///   an `error` field in the JSON envelope, or a transport failure.
    pub async fn fetch_raw(
        &self,
        body_id: &str,
        range: &DateRange,
    ) -> Result<String, OrreryError> {
        info!(
            body = body_id,
            command = %horizons_command(body_id),
            start = %range.start_date,
            end = %range.end_date,
            step = %self.step_size,
            "horizons request"
        );

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&self.query_params(body_id, range))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OrreryError::HorizonsHttp {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let envelope: HorizonsApiResponse = response.json().await?;
        if let Some(error) = envelope.error {
            return Err(OrreryError::HorizonsApi(error));
        }

        let text = envelope.result.unwrap_or_default();
        debug!(
            preview = %text.chars().take(500).collect::<String>(),
            "horizons raw result"
        );
        Ok(text)
    }
}

/// Turn the raw ephemeris text into policy-checked public points.
pub(crate) fn points_from_text(
    text: &str,
    policy: NonFinitePolicy,
) -> Result<Vec<SpacePoint>, OrreryError> {
    if !text.contains(START_MARKER) {
        warn!(
            preview = %text.chars().take(1000).collect::<String>(),
            "ephemeris start marker not found"
        );
        return Err(OrreryError::MissingEphemerisMarkers);
    }
    let points = parse_horizons_text(text)
        .iter()
        .map(to_space_point)
        .collect();
    policy.apply(points)
}

impl EphemerisSource for HorizonsClient {
    async fn fetch_ephemeris(
        &self,
        body_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<SpacePoint>, OrreryError> {
        let range = DateRange::new(start_date, end_date)?;
        let text = self.fetch_raw(body_id, &range).await?;
        let points = points_from_text(&text, self.non_finite_policy)?;
        info!(body = body_id, points = points.len(), "horizons points parsed");
        Ok(points)
    }
}
