use crate::core::scoring::score_offering;
use crate::models::{InvestorProfile, MatchWeights, Offering, OfferingStatus, ScoredOffering};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Result of ranking one investor's candidate set
#[derive(Debug)]
pub struct MatchOutcome {
    pub matches: Vec<ScoredOffering>,
    pub total_candidates: usize,
}

/// Ranking orchestrator for the match endpoint.
///
/// # Pipeline
/// 1. Drop non-live offerings and everything in the investor's
///    prior-interest set (hard exclusion, before scoring)
/// 2. Score each remaining candidate
/// 3. Stable sort descending by score; ties keep candidate input order
/// 4. Truncate to the requested limit
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: MatchWeights,
}

impl Matcher {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: MatchWeights::default(),
        }
    }

    /// Rank a candidate set against an investor's preferences.
    ///
    /// `profile` is `None` when the investor has no preference record; the
    /// preference-driven tiers simply never trigger. `excluded` holds every
    /// offering id the investor has engaged with, in any interest status.
    /// `now` is the request's frozen clock.
    pub fn rank_offerings(
        &self,
        profile: Option<&InvestorProfile>,
        excluded: &HashSet<String>,
        candidates: Vec<Offering>,
        now: DateTime<Utc>,
        limit: usize,
    ) -> MatchOutcome {
        let total_candidates = candidates.len();

        let mut matches: Vec<ScoredOffering> = candidates
            .into_iter()
            .filter(|o| o.status == OfferingStatus::Live)
            .filter(|o| !excluded.contains(&o.id))
            .map(|offering| {
                let (match_score, match_reasons) =
                    score_offering(profile, &offering, now, &self.weights);
                ScoredOffering {
                    offering,
                    match_score,
                    match_reasons,
                }
            })
            .collect();

        // sort_by is stable: equal scores keep their candidate-set order
        matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        matches.truncate(limit);

        MatchOutcome {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompanySummary;
    use chrono::Duration;

    fn candidate(id: &str, sector: &str, interest_count: i64, now: DateTime<Utc>) -> Offering {
        Offering {
            id: id.to_string(),
            company_id: format!("co_{}", id),
            title: format!("Offering {}", id),
            description: None,
            status: OfferingStatus::Live,
            minimum_investment: 2_500_000,
            target_raise: 100_000_000,
            created_at: now - Duration::days(30),
            company: Some(CompanySummary {
                id: format!("co_{}", id),
                name: format!("Company {}", id),
                sector: Some(sector.to_string()),
                stage: Some("seed".to_string()),
            }),
            interest_count,
        }
    }

    fn profile() -> InvestorProfile {
        InvestorProfile {
            user_id: "inv_1".to_string(),
            accredited: true,
            investment_min: Some(1_000_000),
            investment_max: Some(10_000_000),
            sectors_of_interest: vec!["Fintech".to_string()],
            stages_of_interest: vec![],
        }
    }

    #[test]
    fn test_ranked_descending() {
        let now = Utc::now();
        let matcher = Matcher::with_default_weights();
        let candidates = vec![
            candidate("low", "Biotech", 0, now),
            candidate("high", "Fintech", 6, now),
        ];

        let outcome =
            matcher.rank_offerings(Some(&profile()), &HashSet::new(), candidates, now, 10);

        assert_eq!(outcome.matches[0].offering.id, "high");
        assert!(outcome.matches[0].match_score > outcome.matches[1].match_score);
    }

    #[test]
    fn test_excluded_never_scored() {
        let now = Utc::now();
        let matcher = Matcher::with_default_weights();
        let excluded: HashSet<String> = ["best".to_string()].into_iter().collect();
        let candidates = vec![
            candidate("best", "Fintech", 6, now),
            candidate("other", "Biotech", 0, now),
        ];

        let outcome = matcher.rank_offerings(Some(&profile()), &excluded, candidates, now, 10);

        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].offering.id, "other");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let now = Utc::now();
        let matcher = Matcher::with_default_weights();
        // Identical candidates apart from id: identical scores
        let candidates = vec![
            candidate("b", "Biotech", 0, now),
            candidate("a", "Biotech", 0, now),
        ];

        let outcome = matcher.rank_offerings(Some(&profile()), &HashSet::new(), candidates, now, 10);

        assert_eq!(outcome.matches[0].offering.id, "b");
        assert_eq!(outcome.matches[1].offering.id, "a");
    }

    #[test]
    fn test_non_live_filtered() {
        let now = Utc::now();
        let matcher = Matcher::with_default_weights();
        let mut closed = candidate("closed", "Fintech", 0, now);
        closed.status = OfferingStatus::Closed;
        let candidates = vec![closed, candidate("live", "Fintech", 0, now)];

        let outcome = matcher.rank_offerings(None, &HashSet::new(), candidates, now, 10);

        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].offering.id, "live");
        assert_eq!(outcome.total_candidates, 2);
    }

    #[test]
    fn test_respects_limit() {
        let now = Utc::now();
        let matcher = Matcher::with_default_weights();
        let candidates: Vec<Offering> = (0..20)
            .map(|i| candidate(&i.to_string(), "Fintech", i as i64 % 7, now))
            .collect();

        let outcome = matcher.rank_offerings(Some(&profile()), &HashSet::new(), candidates, now, 5);

        assert_eq!(outcome.matches.len(), 5);
        assert_eq!(outcome.total_candidates, 20);
    }

    #[test]
    fn test_empty_candidate_set_is_empty_result() {
        let now = Utc::now();
        let matcher = Matcher::with_default_weights();

        let outcome = matcher.rank_offerings(None, &HashSet::new(), vec![], now, 10);

        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.total_candidates, 0);
    }
}
