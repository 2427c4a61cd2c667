use serde::{Deserialize, Serialize};
use crate::models::domain::{Granularity, MunicipalityId, OfficerId, ScopeMode};
use crate::models::requests::FlowKind;

/// Display-ready view of an officer appearing in a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficerSummary {
    pub id: OfficerId,
    pub name: String,
    #[serde(rename = "forceAcronym")]
    pub force_acronym: String,
    pub unit: Option<String>,
    pub municipality: Option<String>,
    pub state: Option<String>,
}

/// Someone who wants the requester's current post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestMatch {
    pub officer: OfficerSummary,
    #[serde(rename = "matchedPriority")]
    pub matched_priority: u32,
    #[serde(rename = "matchedGranularity")]
    pub matched_granularity: Granularity,
    pub description: String,
}

/// Mutual two-party exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectSwapMatch {
    pub officer: OfficerSummary,
    /// Sum of both sides' matched priorities; lower is better
    #[serde(rename = "combinedScore")]
    pub combined_score: u64,
}

/// What each participant of a three-way cycle gets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapLegs {
    pub a_to_b: String,
    pub b_to_c: String,
    pub c_to_a: String,
}

/// Three-party exchange cycle A -> B -> C -> A
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangularSwapMatch {
    #[serde(rename = "officerB")]
    pub officer_b: OfficerSummary,
    #[serde(rename = "officerC")]
    pub officer_c: OfficerSummary,
    pub legs: SwapLegs,
}

/// Scope in effect plus the rule shown to the officer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeMode>,
    #[serde(rename = "ruleDescription")]
    pub rule_description: String,
}

/// Full result of one match computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub config: MatchConfig,
    pub interested: Vec<InterestMatch>,
    pub direct: Vec<DirectSwapMatch>,
    pub triangular: Vec<TriangularSwapMatch>,
}

/// One municipality on the demand map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowPoint {
    pub id: MunicipalityId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub leaving: u64,
    pub arriving: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

/// Response for the demand map endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowMapResponse {
    pub kind: FlowKind,
    pub points: Vec<FlowPoint>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Reference-data cache state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatus {
    #[serde(rename = "l1Entries")]
    pub l1_entries: u64,
    #[serde(rename = "l2Enabled")]
    pub l2_enabled: bool,
    #[serde(rename = "ttlSecs")]
    pub ttl_secs: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cache: CacheStatus,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
