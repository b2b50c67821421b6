// End-to-end tests of the ranking pipeline

use chrono::{DateTime, Duration, Utc};
use equity_match::core::Matcher;
use equity_match::models::{CompanySummary, InvestorProfile, Offering, OfferingStatus};
use std::collections::HashSet;

fn make_offering(
    id: &str,
    sector: &str,
    stage: &str,
    minimum_investment: i64,
    interest_count: i64,
    age_days: i64,
    now: DateTime<Utc>,
) -> Offering {
    Offering {
        id: id.to_string(),
        company_id: format!("co_{}", id),
        title: format!("Offering {}", id),
        description: Some("A funding round".to_string()),
        status: OfferingStatus::Live,
        minimum_investment,
        target_raise: 500_000_000,
        created_at: now - Duration::days(age_days),
        company: Some(CompanySummary {
            id: format!("co_{}", id),
            name: format!("Company {}", id),
            sector: Some(sector.to_string()),
            stage: Some(stage.to_string()),
        }),
        interest_count,
    }
}

fn fintech_seed_investor() -> InvestorProfile {
    InvestorProfile {
        user_id: "inv_1".to_string(),
        accredited: true,
        investment_min: Some(1_000_000),  // $10,000
        investment_max: Some(10_000_000), // $100,000
        sectors_of_interest: vec!["Fintech".to_string()],
        stages_of_interest: vec!["seed".to_string()],
    }
}

#[test]
fn test_full_match_scores_110_with_all_reasons() {
    let now = Utc::now();
    let matcher = Matcher::with_default_weights();
    let investor = fintech_seed_investor();

    // $25k minimum, 6 interests, 1 day old
    let candidates = vec![make_offering("a", "Fintech", "seed", 2_500_000, 6, 1, now)];

    let outcome = matcher.rank_offerings(Some(&investor), &HashSet::new(), candidates, now, 10);

    assert_eq!(outcome.matches.len(), 1);
    let top = &outcome.matches[0];
    assert_eq!(top.match_score, 110);
    assert_eq!(
        top.match_reasons,
        vec![
            "Matches your interest in Fintech",
            "seed stage matches your preference",
            "Minimum investment fits your range",
            "Popular with other investors",
            "New listing",
        ]
    );
}

#[test]
fn test_complete_mismatch_scores_zero_but_is_returned() {
    let now = Utc::now();
    let matcher = Matcher::with_default_weights();
    let investor = fintech_seed_investor();

    // Wrong sector and stage, $150k minimum above max, quiet, 30 days old
    let candidates = vec![make_offering("a", "Biotech", "series-a", 15_000_000, 0, 30, now)];

    let outcome = matcher.rank_offerings(Some(&investor), &HashSet::new(), candidates, now, 10);

    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].match_score, 0);
    assert!(outcome.matches[0].match_reasons.is_empty());
}

#[test]
fn test_scores_are_integers_in_range() {
    let now = Utc::now();
    let matcher = Matcher::with_default_weights();
    let investor = fintech_seed_investor();

    let candidates: Vec<Offering> = (0..50)
        .map(|i| {
            make_offering(
                &i.to_string(),
                if i % 2 == 0 { "Fintech" } else { "Biotech" },
                if i % 3 == 0 { "seed" } else { "series-a" },
                500_000 * (i as i64 + 1),
                i as i64 % 8,
                i as i64 % 10,
                now,
            )
        })
        .collect();

    let outcome = matcher.rank_offerings(Some(&investor), &HashSet::new(), candidates, now, 50);

    for m in &outcome.matches {
        assert!(m.match_score <= 110, "Score {} out of range", m.match_score);
    }
}

#[test]
fn test_ordered_descending_with_stable_ties() {
    let now = Utc::now();
    let matcher = Matcher::with_default_weights();
    let investor = fintech_seed_investor();

    // "b" and "a" are identical apart from id and score equally; "b" comes
    // first in the candidate set and must stay first in the output.
    let candidates = vec![
        make_offering("b", "Biotech", "series-a", 15_000_000, 0, 30, now),
        make_offering("a", "Biotech", "series-a", 15_000_000, 0, 30, now),
        make_offering("winner", "Fintech", "seed", 2_500_000, 6, 1, now),
    ];

    let outcome = matcher.rank_offerings(Some(&investor), &HashSet::new(), candidates, now, 10);

    let ids: Vec<&str> = outcome.matches.iter().map(|m| m.offering.id.as_str()).collect();
    assert_eq!(ids, vec!["winner", "b", "a"]);

    for pair in outcome.matches.windows(2) {
        assert!(pair[0].match_score >= pair[1].match_score);
    }
}

#[test]
fn test_prior_interest_excluded_even_when_it_would_win() {
    let now = Utc::now();
    let matcher = Matcher::with_default_weights();
    let investor = fintech_seed_investor();

    // The excluded offering would score 110; a withdrawn interest still
    // counts as prior engagement.
    let excluded: HashSet<String> = ["withdrawn_interest".to_string()].into_iter().collect();
    let candidates = vec![
        make_offering("withdrawn_interest", "Fintech", "seed", 2_500_000, 6, 1, now),
        make_offering("other", "Biotech", "series-a", 15_000_000, 0, 30, now),
    ];

    let outcome = matcher.rank_offerings(Some(&investor), &excluded, candidates, now, 10);

    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].offering.id, "other");
    assert!(outcome
        .matches
        .iter()
        .all(|m| m.offering.id != "withdrawn_interest"));
}

#[test]
fn test_ranking_is_idempotent_under_fixed_now() {
    let now = Utc::now();
    let matcher = Matcher::with_default_weights();
    let investor = fintech_seed_investor();

    let candidates: Vec<Offering> = (0..10)
        .map(|i| make_offering(&i.to_string(), "Fintech", "seed", 2_500_000, i as i64, i as i64, now))
        .collect();

    let first = matcher.rank_offerings(Some(&investor), &HashSet::new(), candidates.clone(), now, 10);
    let second = matcher.rank_offerings(Some(&investor), &HashSet::new(), candidates, now, 10);

    let first_view: Vec<(&str, u32, &Vec<String>)> = first
        .matches
        .iter()
        .map(|m| (m.offering.id.as_str(), m.match_score, &m.match_reasons))
        .collect();
    let second_view: Vec<(&str, u32, &Vec<String>)> = second
        .matches
        .iter()
        .map(|m| (m.offering.id.as_str(), m.match_score, &m.match_reasons))
        .collect();

    assert_eq!(first_view, second_view);
}

#[test]
fn test_limit_truncates_after_ranking() {
    let now = Utc::now();
    let matcher = Matcher::with_default_weights();
    let investor = fintech_seed_investor();

    let mut candidates: Vec<Offering> = (0..30)
        .map(|i| make_offering(&i.to_string(), "Biotech", "series-a", 15_000_000, 0, 30, now))
        .collect();
    candidates.push(make_offering("best", "Fintech", "seed", 2_500_000, 6, 1, now));

    let outcome = matcher.rank_offerings(Some(&investor), &HashSet::new(), candidates, now, 5);

    assert_eq!(outcome.matches.len(), 5);
    // The winner survives truncation even though it entered last
    assert_eq!(outcome.matches[0].offering.id, "best");
    assert_eq!(outcome.total_candidates, 31);
}

#[test]
fn test_empty_candidate_set_is_not_an_error() {
    let now = Utc::now();
    let matcher = Matcher::with_default_weights();

    let outcome = matcher.rank_offerings(None, &HashSet::new(), vec![], now, 20);

    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.total_candidates, 0);
}

#[test]
fn test_match_response_total_tracks_data() {
    let now = Utc::now();
    let matcher = Matcher::with_default_weights();
    let investor = fintech_seed_investor();

    let candidates: Vec<Offering> = (0..7)
        .map(|i| make_offering(&i.to_string(), "Fintech", "seed", 2_500_000, 0, 20, now))
        .collect();

    let outcome = matcher.rank_offerings(Some(&investor), &HashSet::new(), candidates, now, 5);
    let response = equity_match::models::MatchResponse {
        total: outcome.matches.len(),
        data: outcome.matches,
        has_preferences: investor.has_preferences(),
    };

    assert_eq!(response.total, response.data.len());
    assert!(response.has_preferences);

    // Wire format carries the offering fields flattened next to the score
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["total"], 5);
    assert!(json["data"][0]["match_score"].is_u64());
    assert!(json["data"][0]["id"].is_string());
    assert!(json["data"][0]["match_reasons"].is_array());
}
