use crate::models::CompetitorBenchmark;
use chrono::Utc;
use std::collections::HashMap;

/// Mock competitor listings; a live feed would replace this table but keep
/// the same shape.
const COMPETITOR_TABLE: &[(&str, &[(&str, f64)])] = &[
    (
        "TicketPort",
        &[
            ("vip", 45000.0),
            ("premium", 26000.0),
            ("standard", 12500.0),
            ("economy", 6800.0),
        ],
    ),
    (
        "SeatStream",
        &[
            ("vip", 42000.0),
            ("premium", 24500.0),
            ("standard", 11800.0),
            ("economy", 6200.0),
        ],
    ),
    (
        "BoxRow",
        &[
            ("vip", 47500.0),
            ("premium", 27500.0),
            ("standard", 13200.0),
            ("economy", 7100.0),
        ],
    ),
];

/// Hard-coded elasticity per section tier; deliberately independent of the
/// regression estimator, which needs observed samples this table does not.
pub(crate) fn section_elasticity(section_id: &str) -> f64 {
    match section_id {
        "vip" => 0.6,
        "premium" => 0.8,
        "standard" => 1.2,
        "economy" => 1.8,
        _ => 1.3,
    }
}

/// Average competitor price for a section tier, falling back to the average
/// across all tiers when the section is not listed.
pub(crate) fn competitor_average(section_id: &str) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0;
    for (_, sections) in COMPETITOR_TABLE {
        for (tier, price) in *sections {
            if *tier == section_id {
                sum += price;
                count += 1;
            }
        }
    }
    if count > 0 {
        return Some(sum / count as f64);
    }
    overall_average()
}

/// Average price across every competitor listing.
pub(crate) fn overall_average() -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0;
    for (_, sections) in COMPETITOR_TABLE {
        for (_, price) in *sections {
            sum += price;
            count += 1;
        }
    }
    if count > 0 {
        Some(sum / count as f64)
    } else {
        None
    }
}

/// Per-competitor average across their listed tiers.
pub(crate) fn competitor_averages() -> Vec<f64> {
    COMPETITOR_TABLE
        .iter()
        .filter(|(_, sections)| !sections.is_empty())
        .map(|(_, sections)| {
            sections.iter().map(|(_, price)| price).sum::<f64>() / sections.len() as f64
        })
        .collect()
}

/// Snapshot of the competitor table with a fresh `last_updated` stamp.
pub(crate) fn benchmarks() -> Vec<CompetitorBenchmark> {
    let now = Utc::now();
    COMPETITOR_TABLE
        .iter()
        .map(|(name, sections)| CompetitorBenchmark {
            competitor: name.to_string(),
            section_prices: sections
                .iter()
                .map(|(tier, price)| (tier.to_string(), *price))
                .collect::<HashMap<_, _>>(),
            last_updated: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_average_prefers_matching_tier() {
        let vip = competitor_average("vip").unwrap();
        assert!((vip - (45000.0 + 42000.0 + 47500.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_tier_falls_back_to_overall() {
        assert_eq!(competitor_average("pit"), overall_average());
    }

    #[test]
    fn test_unknown_tier_gets_default_elasticity() {
        assert_eq!(section_elasticity("pit"), 1.3);
        assert_eq!(section_elasticity("economy"), 1.8);
    }

    #[test]
    fn test_benchmarks_cover_every_competitor() {
        let benchmarks = benchmarks();
        assert_eq!(benchmarks.len(), 3);
        assert!(benchmarks.iter().all(|b| b.section_prices.len() == 4));
    }
}
