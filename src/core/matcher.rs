use thiserror::Error;
use crate::core::describe::Presenter;
use crate::core::direct::find_direct;
use crate::core::directory::{DirectoryError, MatchSource};
use crate::core::eligibility::is_scoped_candidate;
use crate::core::graph::{is_usable_intention, DesireGraph};
use crate::core::interest::find_interested;
use crate::core::triangular::find_triangular;
use crate::models::{MatchConfig, MatchLimits, MatchReport, Officer, OfficerId, ScopeMode};

pub const INCOMPLETE_PROFILE_RULE: &str = "Complete your current posting to see matches.";
pub const NO_INTENTIONS_RULE: &str = "Add your destination intentions to find matches.";

/// Errors surfaced by a match computation
#[derive(Debug, Clone, Error)]
pub enum MatchError {
    #[error("officer {0} not found")]
    OfficerNotFound(OfficerId),

    #[error("{count} officers in scope exceeds the limit of {ceiling}; narrow your criteria")]
    CandidateSetTooLarge { count: usize, ceiling: usize },

    #[error("match computation failed: {0}")]
    ComputationFailed(String),
}

impl From<DirectoryError> for MatchError {
    fn from(value: DirectoryError) -> Self {
        MatchError::ComputationFailed(value.to_string())
    }
}

impl MatchReport {
    /// Empty result for an officer with no current posting
    pub fn incomplete_profile() -> Self {
        Self {
            config: MatchConfig {
                scope: None,
                rule_description: INCOMPLETE_PROFILE_RULE.to_string(),
            },
            interested: Vec::new(),
            direct: Vec::new(),
            triangular: Vec::new(),
        }
    }
}

/// Match aggregator - orchestrates one officer's match query
///
/// # Pipeline Stages
/// 1. Fix the scope mode from the requester
/// 2. Scope the candidate population (and enforce the ceiling)
/// 3. Build the desire graph once
/// 4. Run the interest, direct and triangular finders on that same graph
/// 5. Map structural results onto response models
#[derive(Debug, Clone)]
pub struct Matcher {
    limits: MatchLimits,
}

impl Matcher {
    pub fn new(limits: MatchLimits) -> Self {
        Self { limits }
    }

    pub fn with_default_limits() -> Self {
        Self {
            limits: MatchLimits::default(),
        }
    }

    pub fn limits(&self) -> MatchLimits {
        self.limits
    }

    /// Compute interested officers, direct swaps and triangular swaps
    ///
    /// # Arguments
    /// * `officer_id` - The requesting officer
    /// * `source` - Officers, intentions and reference data, read from one snapshot
    ///
    /// # Returns
    /// A report, or `OfficerNotFound` / `CandidateSetTooLarge`; collaborator
    /// failures come back as `ComputationFailed`
    pub fn compute_matches<S: MatchSource + ?Sized>(
        &self,
        officer_id: OfficerId,
        source: &S,
    ) -> Result<MatchReport, MatchError> {
        let requester = source
            .get_by_id(officer_id)?
            .ok_or(MatchError::OfficerNotFound(officer_id))?;

        if requester.current_unit_id.is_none() {
            tracing::debug!("Officer {} has no current posting", officer_id);
            return Ok(MatchReport::incomplete_profile());
        }

        // Stage 1: scope mode
        let mode = ScopeMode::for_requester(&requester);

        // Stage 2: candidate population
        let candidates: Vec<Officer> = source
            .list_eligible_candidates(&mode)?
            .into_iter()
            .filter(|candidate| is_scoped_candidate(&requester, candidate, &mode))
            .collect();

        if candidates.len() > self.limits.candidate_ceiling {
            tracing::warn!(
                "Officer {} has {} candidates in scope, above ceiling {}",
                officer_id,
                candidates.len(),
                self.limits.candidate_ceiling
            );
            return Err(MatchError::CandidateSetTooLarge {
                count: candidates.len(),
                ceiling: self.limits.candidate_ceiling,
            });
        }

        let mut ids: Vec<OfficerId> = candidates.iter().map(|c| c.id).collect();
        ids.push(requester.id);
        let intentions = source.get_by_officers(&ids)?;
        let has_intentions = intentions
            .get(&requester.id)
            .is_some_and(|wishes| wishes.iter().any(|i| is_usable_intention(requester.id, i)));

        // Stage 3: graph
        let graph = DesireGraph::build(&requester, &candidates, &intentions, source, &mode);
        let stats = graph.stats();
        if stats.unresolved_locations > 0 {
            tracing::warn!(
                "{} candidates skipped as targets for officer {}: posting does not resolve",
                stats.unresolved_locations,
                officer_id
            );
        }

        // Stage 4: finders
        let interested = find_interested(requester.id, &graph);
        let direct = find_direct(requester.id, &graph, self.limits.max_direct_results);
        let triangular = find_triangular(requester.id, &graph, self.limits.max_triangular_results);

        tracing::info!(
            "Officer {}: {} nodes, {} edges -> {} interested, {} direct, {} triangular",
            officer_id,
            stats.nodes,
            stats.edges,
            interested.len(),
            direct.len(),
            triangular.len()
        );

        // Stage 5: presentation
        let presenter = Presenter::new(&graph, source);
        let rule_description = if has_intentions {
            mode.rule_description()
        } else {
            NO_INTENTIONS_RULE.to_string()
        };

        Ok(MatchReport {
            config: MatchConfig {
                scope: Some(mode),
                rule_description,
            },
            interested: interested.iter().filter_map(|e| presenter.interest(e)).collect(),
            direct: direct.iter().filter_map(|s| presenter.direct(s)).collect(),
            triangular: triangular.iter().filter_map(|t| presenter.triangle(t)).collect(),
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_limits()
    }
}
