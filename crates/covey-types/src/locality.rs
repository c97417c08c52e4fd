//! Hierarchical placement descriptor for peers and set filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LocalityError;

/// Unit value that matches any unit within the same name and region.
pub const WILDCARD_UNIT: &str = "*";

/// Where a peer lives, as a three-level hierarchy.
///
/// Localities render as `name/region/unit` (for example
/// `payments/us-west/cell-3`). A filter locality may use [`WILDCARD_UNIT`]
/// as its unit to accept every unit in the region; peer localities are
/// expected to be concrete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locality {
    /// Deployment or service name.
    pub name: String,
    /// Geographic or failure-domain region.
    pub region: String,
    /// Finest-grained grouping, typically a cell or rack.
    pub unit: String,
}

impl Locality {
    /// Create a fully specified locality.
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            unit: unit.into(),
        }
    }

    /// Create a filter locality that accepts any unit in `region`.
    pub fn with_wildcard_unit(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self::new(name, region, WILDCARD_UNIT)
    }

    /// Whether a peer at `candidate` belongs to the set this locality
    /// describes. Name and region must match exactly; the unit must match
    /// unless this locality's unit is [`WILDCARD_UNIT`].
    pub fn matches(&self, candidate: &Locality) -> bool {
        self.name == candidate.name
            && self.region == candidate.region
            && (self.unit == WILDCARD_UNIT || self.unit == candidate.unit)
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.name, self.region, self.unit)
    }
}

impl FromStr for Locality {
    type Err = LocalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let (Some(name), Some(region), Some(unit), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(LocalityError::SegmentCount(s.to_string()));
        };
        if name.is_empty() || region.is_empty() || unit.is_empty() {
            return Err(LocalityError::EmptySegment(s.to_string()));
        }
        Ok(Self::new(name, region, unit))
    }
}
