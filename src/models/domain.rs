use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Officer primary key
    OfficerId
);
id_type!(
    /// Specific police agency (e.g. one state's military police)
    ForceId
);
id_type!(UnitId);
id_type!(MunicipalityId);
id_type!(StateId);

/// An officer as seen by the matching engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    pub id: OfficerId,
    pub name: String,
    #[serde(rename = "currentUnitId", default)]
    pub current_unit_id: Option<UnitId>,
    #[serde(rename = "forceId")]
    pub force_id: ForceId,
    #[serde(rename = "forceAcronym", default)]
    pub force_acronym: String,
    /// Broad agency class shared across states (e.g. "PM", "PC", "BM")
    #[serde(rename = "scopeCategory")]
    pub scope_category: String,
    #[serde(rename = "acceptsInterstateTransfer", default)]
    pub accepts_interstate_transfer: bool,
    #[serde(default)]
    pub verified: bool,
}

impl Officer {
    /// Only verified officers with a known posting may show up as someone else's match
    pub fn is_match_candidate(&self) -> bool {
        self.verified && self.current_unit_id.is_some()
    }
}

/// Specificity level of a desired location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Granularity {
    Unit,
    Municipality,
    State,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Unit => "UNIT",
            Granularity::Municipality => "MUNICIPALITY",
            Granularity::State => "STATE",
        }
    }
}

/// The place an intention points at; exactly one level is ever set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "granularity", content = "targetId", rename_all = "UPPERCASE")]
pub enum IntentionTarget {
    Unit(UnitId),
    Municipality(MunicipalityId),
    State(StateId),
}

impl IntentionTarget {
    pub fn granularity(&self) -> Granularity {
        match self {
            IntentionTarget::Unit(_) => Granularity::Unit,
            IntentionTarget::Municipality(_) => Granularity::Municipality,
            IntentionTarget::State(_) => Granularity::State,
        }
    }

    /// Whether an officer posted at `location` satisfies this target
    #[inline]
    pub fn is_satisfied_by(&self, location: &LocationTriple) -> bool {
        match *self {
            IntentionTarget::Unit(id) => id == location.unit_id,
            IntentionTarget::Municipality(id) => id == location.municipality_id,
            IntentionTarget::State(id) => id == location.state_id,
        }
    }
}

/// One ranked wishlist entry (priority 1 = most preferred)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intention {
    #[serde(rename = "officerId")]
    pub officer_id: OfficerId,
    pub priority: u32,
    #[serde(flatten)]
    pub target: IntentionTarget,
}

impl Intention {
    pub fn new(officer_id: OfficerId, priority: u32, target: IntentionTarget) -> Self {
        Self {
            officer_id,
            priority,
            target,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.target.granularity()
    }
}

/// Fully resolved posting: unit, its municipality and that municipality's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationTriple {
    #[serde(rename = "unitId")]
    pub unit_id: UnitId,
    #[serde(rename = "municipalityId")]
    pub municipality_id: MunicipalityId,
    #[serde(rename = "stateId")]
    pub state_id: StateId,
}

/// Unit reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub municipality_id: Option<MunicipalityId>,
}

/// Municipality reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    pub id: MunicipalityId,
    pub name: String,
    pub state_id: Option<StateId>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// State reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub acronym: String,
}

/// Raw reference tables, the cacheable form of the location hierarchy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationTables {
    pub units: Vec<Unit>,
    pub municipalities: Vec<Municipality>,
    pub states: Vec<State>,
}

/// Transfer scope in effect for one query, fixed from the requesting officer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScopeMode {
    /// Any agency of the same broad category, in any state
    Interstate {
        #[serde(rename = "scopeCategory")]
        scope_category: String,
    },
    /// Only the requester's exact agency
    SameForce {
        #[serde(rename = "forceId")]
        force_id: ForceId,
        #[serde(rename = "forceAcronym")]
        force_acronym: String,
    },
}

/// Result limits applied by the matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimits {
    pub max_direct_results: usize,
    pub max_triangular_results: usize,
    pub candidate_ceiling: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            max_direct_results: 100,
            max_triangular_results: 100,
            candidate_ceiling: 5000,
        }
    }
}
