/// How an offering's minimum investment relates to an investor's check-size range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestmentFit {
    /// Offering minimum falls inside [investor min, investor max]
    InRange,
    /// Offering minimum is below the investor's usual floor but still affordable
    WithinCapacity,
    /// Offering minimum exceeds the investor's maximum
    Outside,
}

/// Case-insensitive substring match in either direction between a stated
/// sector of interest and an offering's sector.
///
/// Short sector names can substring-match unrelated sectors ("AI" inside
/// "Retail"); this mirrors the production behavior exactly.
#[inline]
pub fn sector_matches(stated: &str, offering_sector: &str) -> bool {
    let stated = stated.to_lowercase();
    let offering = offering_sector.to_lowercase();
    offering.contains(&stated) || stated.contains(&offering)
}

/// First stated sector that matches the offering's sector, if any.
/// At most one sector contributes to the score, even when several match.
#[inline]
pub fn first_matching_sector<'a>(stated: &'a [String], offering_sector: &str) -> Option<&'a str> {
    stated
        .iter()
        .find(|s| sector_matches(s, offering_sector))
        .map(String::as_str)
}

/// Exact membership test of the offering's stage in the stated stage set
#[inline]
pub fn stage_matches(stated: &[String], offering_stage: &str) -> bool {
    stated.iter().any(|s| s == offering_stage)
}

/// Classify an offering's minimum investment against both investor bounds.
/// Callers must only invoke this when both bounds are set; partial bounds
/// skip the tier entirely.
#[inline]
pub fn classify_investment_fit(
    minimum_investment: i64,
    investor_min: i64,
    investor_max: i64,
) -> InvestmentFit {
    if minimum_investment >= investor_min && minimum_investment <= investor_max {
        InvestmentFit::InRange
    } else if minimum_investment <= investor_max {
        InvestmentFit::WithinCapacity
    } else {
        InvestmentFit::Outside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_match_case_insensitive() {
        assert!(sector_matches("fintech", "Fintech"));
        assert!(sector_matches("FINTECH", "fintech"));
    }

    #[test]
    fn test_sector_match_substring_both_directions() {
        // Stated sector contained in the offering's sector
        assert!(sector_matches("AI", "AI / Machine Learning"));
        // Offering sector contained in the stated sector
        assert!(sector_matches("Consumer Hardware", "Hardware"));
    }

    #[test]
    fn test_sector_match_known_false_positive() {
        // "AI" is a substring of "Retail"; kept as-is
        assert!(sector_matches("AI", "Retail"));
    }

    #[test]
    fn test_sector_no_match() {
        assert!(!sector_matches("Biotech", "Fintech"));
    }

    #[test]
    fn test_first_matching_sector_picks_first() {
        let stated = vec!["HealthTech".to_string(), "SaaS".to_string(), "aaS".to_string()];
        assert_eq!(first_matching_sector(&stated, "SaaS"), Some("SaaS"));
    }

    #[test]
    fn test_stage_match_is_exact() {
        let stated = vec!["seed".to_string(), "series-a".to_string()];
        assert!(stage_matches(&stated, "seed"));
        assert!(!stage_matches(&stated, "pre-seed"));
    }

    #[test]
    fn test_investment_fit_in_range() {
        // $25k minimum against a [$10k, $100k] range
        assert_eq!(
            classify_investment_fit(2_500_000, 1_000_000, 10_000_000),
            InvestmentFit::InRange
        );
        // Inclusive at both bounds
        assert_eq!(
            classify_investment_fit(1_000_000, 1_000_000, 10_000_000),
            InvestmentFit::InRange
        );
        assert_eq!(
            classify_investment_fit(10_000_000, 1_000_000, 10_000_000),
            InvestmentFit::InRange
        );
    }

    #[test]
    fn test_investment_fit_below_floor_is_capacity() {
        // Cheaper than the investor normally commits
        assert_eq!(
            classify_investment_fit(500_000, 1_000_000, 10_000_000),
            InvestmentFit::WithinCapacity
        );
    }

    #[test]
    fn test_investment_fit_above_max_is_outside() {
        assert_eq!(
            classify_investment_fit(15_000_000, 1_000_000, 10_000_000),
            InvestmentFit::Outside
        );
    }
}
