use crate::core::filters::{
    classify_investment_fit, first_matching_sector, stage_matches, InvestmentFit,
};
use crate::models::{InvestorProfile, MatchWeights, Offering};
use chrono::{DateTime, Utc};

/// Interest count at which an offering is considered popular
const POPULAR_INTEREST_COUNT: i64 = 5;
/// Interest count at which an offering is considered to be gaining traction
const TRACTION_INTEREST_COUNT: i64 = 2;
/// Listings younger than this many days get the full recency boost
const NEW_LISTING_MAX_DAYS: f64 = 3.0;
/// Listings younger than this many days get the reduced recency boost
const RECENT_LISTING_MAX_DAYS: f64 = 7.0;

/// Fractional days elapsed between an offering's creation and `now`
#[inline]
pub fn days_since(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created_at).num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0 * 24.0)
}

/// Score one (investor preferences, offering) pair.
///
/// Pure function: no I/O, identical output for identical input. `now` is
/// captured once per request and threaded through so recency scoring stays
/// consistent across a single response.
///
/// Tiers, applied independently and additively (reason strings are appended
/// in this order when a tier triggers):
/// 1. Sector match: case-insensitive substring in either direction, first
///    stated sector only
/// 2. Stage match: exact membership
/// 3. Investment-size fit: requires both investor bounds; in-range beats
///    within-capacity
/// 4. Social proof: tiered on current interest count
/// 5. Recency: tiered on days since creation; the reduced tier adds points
///    without a reason
pub fn score_offering(
    profile: Option<&InvestorProfile>,
    offering: &Offering,
    now: DateTime<Utc>,
    weights: &MatchWeights,
) -> (u32, Vec<String>) {
    let mut score = 0u32;
    let mut reasons = Vec::new();

    let sectors: &[String] = profile.map(|p| p.sectors_of_interest.as_slice()).unwrap_or(&[]);
    let stages: &[String] = profile.map(|p| p.stages_of_interest.as_slice()).unwrap_or(&[]);

    // Sector match
    if let Some(sector) = offering.sector() {
        if !sectors.is_empty() && first_matching_sector(sectors, sector).is_some() {
            score += weights.sector;
            reasons.push(format!("Matches your interest in {}", sector));
        }
    }

    // Stage match
    if let Some(stage) = offering.stage() {
        if !stages.is_empty() && stage_matches(stages, stage) {
            score += weights.stage;
            reasons.push(format!(
                "{} stage matches your preference",
                stage.replace('-', " ")
            ));
        }
    }

    // Investment-size fit: skipped entirely unless both bounds are set
    if let Some((investor_min, investor_max)) = profile.and_then(|p| p.investment_bounds()) {
        match classify_investment_fit(offering.minimum_investment, investor_min, investor_max) {
            InvestmentFit::InRange => {
                score += weights.range_fit;
                reasons.push("Minimum investment fits your range".to_string());
            }
            InvestmentFit::WithinCapacity => {
                score += weights.capacity_fit;
                reasons.push("Within your maximum investment capacity".to_string());
            }
            InvestmentFit::Outside => {}
        }
    }

    // Social proof
    if offering.interest_count >= POPULAR_INTEREST_COUNT {
        score += weights.popular;
        reasons.push("Popular with other investors".to_string());
    } else if offering.interest_count >= TRACTION_INTEREST_COUNT {
        score += weights.traction;
        reasons.push("Gaining traction".to_string());
    }

    // Recency boost, decaying over seven days
    let days = days_since(offering.created_at, now);
    if days < NEW_LISTING_MAX_DAYS {
        score += weights.new_listing;
        reasons.push("New listing".to_string());
    } else if days < RECENT_LISTING_MAX_DAYS {
        score += weights.recent;
    }

    (score, reasons)
}
