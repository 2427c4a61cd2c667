// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ForceId, Granularity, Intention, IntentionTarget, LocationTables, LocationTriple, MatchLimits,
    Municipality, MunicipalityId, Officer, OfficerId, ScopeMode, State, StateId, Unit, UnitId,
};
pub use requests::{FlowKind, FlowMapQuery, MatchesPath};
pub use responses::{
    CacheStatus, DirectSwapMatch, ErrorResponse, FlowMapResponse, FlowPoint, HealthResponse, InterestMatch,
    MatchConfig, MatchReport, OfficerSummary, SwapLegs, TriangularSwapMatch,
};
