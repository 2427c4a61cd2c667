use serde::{Deserialize, Serialize};
use validator::Validate;

/// Path parameters for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchesPath {
    #[validate(range(min = 1))]
    pub officer_id: i64,
}

/// Which side of the demand map to aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Officers currently posted in a municipality
    #[default]
    Leaving,
    /// Intentions pointing at a municipality
    Arriving,
    Balance,
}

/// Query string for the demand map endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FlowMapQuery {
    #[serde(default)]
    pub kind: FlowKind,
    #[validate(range(min = 1))]
    #[serde(alias = "state_id", rename = "stateId", default)]
    pub state_id: Option<i64>,
    #[validate(range(min = 1))]
    #[serde(alias = "force_id", rename = "forceId", default)]
    pub force_id: Option<i64>,
}
