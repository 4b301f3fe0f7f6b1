//! # Body catalog and identity aliases
//!
//! The dashboard loads a fixed, ordered list of bodies from Horizons: the eight major planets
//! and the two Voyager probes. Each body is known under several names:
//!
//! | key kind       | example       |
//! |----------------|---------------|
//! | raw identifier | `"599"`       |
//! | display label  | `"Юпитер"`    |
//! | English name   | `"Jupiter"`   |
//!
//! [`AliasTable`] resolves any of these to the canonical raw identifier, so per-body data is
//! stored once and looked up by whichever key the caller holds.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::planets::Planet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BodyKind {
    Planet,
    Probe,
}

/// Static description of one loadable body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyDescriptor {
    /// Identifier sent to the ephemeris collaborator (Horizons id or friendly name)
    pub id: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Canonical English name
    pub name_en: &'static str,
    pub kind: BodyKind,
}

impl BodyDescriptor {
    /// The planet this body corresponds to, if any.
    pub fn planet(&self) -> Option<Planet> {
        self.name_en.parse().ok()
    }

    /// Command string for the Horizons `COMMAND` parameter.
    ///
    /// Friendly probe names map to their NAIF ids; negative ids are wrapped in single quotes,
    /// otherwise Horizons may read them as asteroid designations.
    pub fn horizons_command(&self) -> String {
        horizons_command(self.id)
    }
}

/// Default load order.
pub const BODIES: [BodyDescriptor; 10] = [
    planet("199", "Меркурий", "Mercury"),
    planet("299", "Венера", "Venus"),
    planet("399", "Земля", "Earth"),
    planet("499", "Марс", "Mars"),
    planet("599", "Юпитер", "Jupiter"),
    planet("699", "Сатурн", "Saturn"),
    planet("799", "Уран", "Uranus"),
    planet("899", "Нептун", "Neptune"),
    BodyDescriptor {
        id: "Voyager_1",
        label: "Voyager 1",
        name_en: "Voyager 1",
        kind: BodyKind::Probe,
    },
    BodyDescriptor {
        id: "Voyager_2",
        label: "Voyager 2",
        name_en: "Voyager 2",
        kind: BodyKind::Probe,
    },
];

const fn planet(id: &'static str, label: &'static str, name_en: &'static str) -> BodyDescriptor {
    BodyDescriptor {
        id,
        label,
        name_en,
        kind: BodyKind::Planet,
    }
}

/// Friendly names that Horizons only knows by NAIF id.
const NAIF_IDS: [(&str, &str); 2] = [("Voyager_1", "-31"), ("Voyager_2", "-32")];

/// Build the Horizons `COMMAND` value for a body identifier.
pub fn horizons_command(body_id: &str) -> String {
    let naif = NAIF_IDS
        .iter()
        .find(|(name, _)| *name == body_id)
        .map_or(body_id, |(_, id)| *id);

    if naif.starts_with('-') {
        format!("'{naif}'")
    } else {
        naif.to_string()
    }
}

/// Look up a catalog entry by raw identifier.
pub fn descriptor(body_id: &str) -> Option<&'static BodyDescriptor> {
    BODIES.iter().find(|b| b.id == body_id)
}

/// Alias → canonical identifier lookup.
///
/// Built once from the static catalog; datasets may extend it with their own
/// `(id, label)` pairs through [`AliasTable::with_bodies`].
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    to_canonical: HashMap<String, String>,
}

impl AliasTable {
    pub fn from_catalog(catalog: &[BodyDescriptor]) -> Self {
        let mut table = AliasTable::default();
        for body in catalog {
            table.insert_body(body.id, body.label);
            table.insert_alias(body.name_en, body.id);
        }
        table
    }

    /// A copy of this table extended with `(id, label)` pairs.
    pub fn with_bodies<'a, I>(&self, bodies: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = self.clone();
        for (id, label) in bodies {
            table.insert_body(id, label);
        }
        table
    }

    fn insert_body(&mut self, id: &str, label: &str) {
        self.insert_alias(id, id);
        self.insert_alias(label, id);
    }

    fn insert_alias(&mut self, alias: &str, canonical: &str) {
        self.to_canonical
            .entry(alias.to_string())
            .or_insert_with(|| canonical.to_string());
    }

    /// Canonical identifier for any known key.
    pub fn canonical(&self, key: &str) -> Option<&str> {
        self.to_canonical.get(key).map(String::as_str)
    }

    /// Every key resolving to `canonical`, in no particular order.
    pub fn aliases_of<'a>(&'a self, canonical: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.to_canonical
            .iter()
            .filter(move |(_, c)| c.as_str() == canonical)
            .map(|(alias, _)| alias.as_str())
    }

    pub fn len(&self) -> usize {
        self.to_canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Alias table of the default catalog.
pub static CATALOG_ALIASES: Lazy<AliasTable> = Lazy::new(|| AliasTable::from_catalog(&BODIES));
