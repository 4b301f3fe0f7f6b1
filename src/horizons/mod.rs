//! # JPL Horizons ephemerides
//!
//! Everything between the Horizons `VECTORS` endpoint and the typed per-body point arrays:
//!
//! * [`client`] – HTTP request ([`client::HorizonsClient`]) and the [`client::EphemerisSource`]
//!   seam used by the loader,
//! * [`parser`] – lenient parser of the `$$SOE … $$EOE` text block,
//! * [`space_point`] – conversion of raw AU / AU-per-day state vectors into public units.
//!
//! ```text
//! HorizonsClient::fetch_raw ──► parse_horizons_text ──► to_space_point ──► NonFinitePolicy
//! ```

pub mod client;
pub mod parser;
pub mod space_point;
