use crate::models::{Officer, ScopeMode};

impl ScopeMode {
    /// Fix the scope for a whole query from the requesting officer alone
    ///
    /// The candidate's own interstate flag never participates.
    pub fn for_requester(requester: &Officer) -> Self {
        if requester.accepts_interstate_transfer {
            ScopeMode::Interstate {
                scope_category: requester.scope_category.clone(),
            }
        } else {
            ScopeMode::SameForce {
                force_id: requester.force_id,
                force_acronym: requester.force_acronym.clone(),
            }
        }
    }

    /// Whether `candidate` falls inside this scope
    #[inline]
    pub fn admits(&self, candidate: &Officer) -> bool {
        match self {
            ScopeMode::Interstate { scope_category } => candidate.scope_category == *scope_category,
            ScopeMode::SameForce { force_id, .. } => candidate.force_id == *force_id,
        }
    }

    pub fn is_interstate(&self) -> bool {
        matches!(self, ScopeMode::Interstate { .. })
    }

    /// Rule shown to the requesting officer
    pub fn rule_description(&self) -> String {
        match self {
            ScopeMode::Interstate { scope_category } => {
                format!("You may exchange with any {} agency in any state.", scope_category)
            }
            ScopeMode::SameForce { force_acronym, .. } => {
                format!("You may only exchange within {}.", force_acronym)
            }
        }
    }
}

/// Check whether two officers may be matched when `requester` asks
#[inline]
pub fn eligible(requester: &Officer, candidate: &Officer) -> bool {
    ScopeMode::for_requester(requester).admits(candidate)
}

/// Stage 1 of a match query: keep verified, posted, in-scope officers other than the requester
#[inline]
pub fn is_scoped_candidate(requester: &Officer, candidate: &Officer, mode: &ScopeMode) -> bool {
    candidate.id != requester.id && candidate.is_match_candidate() && mode.admits(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForceId, OfficerId, UnitId};

    fn officer(id: i64, force: i64, category: &str, interstate: bool) -> Officer {
        Officer {
            id: OfficerId(id),
            name: format!("Officer {}", id),
            current_unit_id: Some(UnitId(id)),
            force_id: ForceId(force),
            force_acronym: format!("F{}", force),
            scope_category: category.to_string(),
            accepts_interstate_transfer: interstate,
            verified: true,
        }
    }

    #[test]
    fn test_same_force_mode() {
        let requester = officer(1, 10, "PM", false);

        assert!(eligible(&requester, &officer(2, 10, "PM", false)));
        assert!(!eligible(&requester, &officer(3, 11, "PM", true)));
    }

    #[test]
    fn test_interstate_mode_uses_category() {
        let requester = officer(1, 10, "PM", true);

        assert!(eligible(&requester, &officer(2, 11, "PM", false)));
        assert!(!eligible(&requester, &officer(3, 12, "PC", true)));
    }

    #[test]
    fn test_eligibility_is_asymmetric() {
        let interstate = officer(1, 10, "PM", true);
        let local = officer(2, 11, "PM", false);

        assert!(eligible(&interstate, &local));
        assert!(!eligible(&local, &interstate));
    }

    #[test]
    fn test_scoped_candidate_excludes_self_and_unverified() {
        let requester = officer(1, 10, "PM", false);
        let mode = ScopeMode::for_requester(&requester);

        assert!(!is_scoped_candidate(&requester, &requester, &mode));

        let mut unverified = officer(2, 10, "PM", false);
        unverified.verified = false;
        assert!(!is_scoped_candidate(&requester, &unverified, &mode));

        let mut unposted = officer(3, 10, "PM", false);
        unposted.current_unit_id = None;
        assert!(!is_scoped_candidate(&requester, &unposted, &mode));

        assert!(is_scoped_candidate(&requester, &officer(4, 10, "PM", false), &mode));
    }

    #[test]
    fn test_rule_description() {
        let local = ScopeMode::for_requester(&officer(1, 10, "PM", false));
        assert_eq!(local.rule_description(), "You may only exchange within F10.");

        let interstate = ScopeMode::for_requester(&officer(1, 10, "PM", true));
        assert!(interstate.is_interstate());
        assert_eq!(interstate.rule_description(), "You may exchange with any PM agency in any state.");
    }
}
