use crate::competitor;
use crate::elasticity;
use crate::models::{
    CompetitorBenchmark, PerformanceSample, PriceElasticity, PriceOptimizationReport,
    PricingRecommendation, RevenueOptimization, SectionPricePlan,
};
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use tessera_shared::{MarketConditions, SectionProfile};

/// Sales observations kept per section
const PERFORMANCE_WINDOW: usize = 30;

/// Heuristic pricing analytics for section-level revenue work.
///
/// Every method is total: malformed input yields a degenerate result (zero
/// confidence, empty list, `-1.0` elasticity) rather than an error, so a bad
/// recommendation can never take a caller down with it.
pub struct PricingAnalytics {
    performance: HashMap<String, VecDeque<PerformanceSample>>,
}

impl PricingAnalytics {
    pub fn new() -> Self {
        Self {
            performance: HashMap::new(),
        }
    }

    /// Elasticity from paired historical (price, demand) samples.
    pub fn price_elasticity(
        &self,
        section_id: &str,
        prices: &[f64],
        demands: &[f64],
    ) -> PriceElasticity {
        elasticity::estimate(section_id, prices, demands)
    }

    /// Propose per-section prices that should improve total revenue.
    ///
    /// Works off the static tier elasticity table, not the regression
    /// estimator: the optimizer runs without historical samples.
    pub fn optimize_revenue(
        &self,
        sections: &[SectionProfile],
        market: &MarketConditions,
    ) -> RevenueOptimization {
        let mut plans = Vec::with_capacity(sections.len());
        let mut current_revenue = 0.0;
        let mut optimized_revenue = 0.0;

        for section in sections {
            let tier_elasticity = competitor::section_elasticity(&section.section_id);
            let mut price = section.current_price;

            // Elastic sections respond to discounts, inelastic ones carry a premium
            if tier_elasticity > 1.0 {
                price *= 0.90;
            } else {
                price *= 1.15;
            }

            if let Some(average) = competitor::competitor_average(&section.section_id) {
                if price > average * 1.2 {
                    price *= 0.90;
                } else if price < average * 0.8 {
                    price *= 1.05;
                }
            }

            if market.current_demand > 0.8 {
                price *= 1.20;
            } else if market.current_demand < 0.3 {
                price *= 0.85;
            }

            let projected_demand = if section.current_price > 0.0 {
                (market.current_demand * (price / section.current_price).powf(-tier_elasticity))
                    .min(1.0)
            } else {
                market.current_demand
            };

            current_revenue += section.current_price * section.capacity as f64 * market.current_demand;
            optimized_revenue += price * section.capacity as f64 * projected_demand;

            tracing::debug!(
                "Section [{}] price {:.0} -> {:.0}, projected demand {:.2}",
                section.section_id,
                section.current_price,
                price,
                projected_demand
            );

            plans.push(SectionPricePlan {
                section_id: section.section_id.clone(),
                current_price: section.current_price,
                optimized_price: price,
                elasticity: tier_elasticity,
                projected_demand,
            });
        }

        let improvement_percentage = if current_revenue > 0.0 {
            (optimized_revenue - current_revenue) / current_revenue * 100.0
        } else {
            0.0
        };

        RevenueOptimization {
            current_revenue,
            optimized_revenue,
            improvement_percentage,
            section_plans: plans,
            confidence: 0.75,
        }
    }

    /// One recommendation per section; exactly one heuristic branch applies,
    /// checked in fixed order with the first match winning. Results come back
    /// sorted by confidence, strongest first.
    pub fn pricing_recommendations(
        &self,
        sections: &[SectionProfile],
        market: &MarketConditions,
    ) -> Vec<PricingRecommendation> {
        let mut recommendations: Vec<PricingRecommendation> = sections
            .iter()
            .map(|section| self.recommend_for_section(section, market))
            .collect();

        recommendations.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        recommendations
    }

    fn recommend_for_section(
        &self,
        section: &SectionProfile,
        market: &MarketConditions,
    ) -> PricingRecommendation {
        let tier_elasticity = competitor::section_elasticity(&section.section_id);

        let (change, reason, confidence) = if market.current_demand > 0.8 {
            (0.25, "High demand supports a premium", 0.85)
        } else if market.current_demand < 0.3 {
            (-0.20, "Soft demand, discount to move inventory", 0.80)
        } else if market.time_to_event < 7.0 && market.current_demand > 0.5 {
            (0.40, "Last-minute window with healthy demand", 0.90)
        } else if market.time_to_event > 60.0 && market.current_demand < 0.4 {
            (-0.15, "Far from event with slow sales, early-bird discount", 0.70)
        } else {
            match competitor::competitor_average(&section.section_id) {
                Some(average) if section.current_price > average * 1.15 => {
                    (-0.10, "Priced well above competitors", 0.65)
                }
                Some(average) if section.current_price < average * 0.85 => {
                    (0.15, "Priced well below competitors", 0.60)
                }
                _ => (0.0, "Price in line with the market, hold", 0.50),
            }
        };

        let expected_demand_change = -change * tier_elasticity;
        let expected_revenue_change = (1.0 + change) * (1.0 + expected_demand_change) - 1.0;

        PricingRecommendation {
            section_id: section.section_id.clone(),
            current_price: section.current_price,
            recommended_price: section.current_price * (1.0 + change),
            price_change_percentage: change * 100.0,
            expected_demand_change: expected_demand_change * 100.0,
            expected_revenue_change: expected_revenue_change * 100.0,
            reason: reason.to_string(),
            confidence,
        }
    }

    /// Competitor price table snapshot; the table is static, only the
    /// `last_updated` stamp is live.
    pub fn competitor_benchmarks(&self) -> Vec<CompetitorBenchmark> {
        competitor::benchmarks()
    }

    /// Estimated market share at our average price, using inverse-price
    /// attractiveness against the competitor averages. Returns 0.0 for a
    /// non-positive price.
    pub fn market_share(&self, our_average_price: f64) -> f64 {
        if our_average_price <= 0.0 {
            return 0.0;
        }

        let ours = 1.0 / our_average_price;
        let field: f64 = competitor::competitor_averages()
            .iter()
            .filter(|average| **average > 0.0)
            .map(|average| 1.0 / average)
            .sum();

        ours / (ours + field)
    }

    /// Project demand at a proposed price from the current price, scaled by
    /// tier elasticity with a lift inside the final week. Clamped to [0, 1].
    pub fn predict_demand(
        &self,
        section_id: &str,
        proposed_price: f64,
        current_price: f64,
        market: &MarketConditions,
    ) -> f64 {
        if current_price <= 0.0 || proposed_price <= 0.0 {
            return market.current_demand.clamp(0.0, 1.0);
        }

        let tier_elasticity = competitor::section_elasticity(section_id);
        let ratio = proposed_price / current_price;
        let mut demand = market.current_demand * ratio.powf(-tier_elasticity);

        if market.time_to_event < 7.0 {
            demand *= 1.15;
        }

        demand.clamp(0.0, 1.0)
    }

    /// Record a sales observation for a section; informational only. Each
    /// section keeps the trailing 30 observations, oldest evicted first.
    pub fn track_price_performance(&mut self, section_id: &str, price: f64, sales_count: u32) {
        let samples = self.performance.entry(section_id.to_string()).or_default();
        if samples.len() >= PERFORMANCE_WINDOW {
            samples.pop_front();
        }
        samples.push_back(PerformanceSample {
            recorded_at: Utc::now(),
            price,
            sales_count,
        });
    }

    /// Tracked observations for a section, oldest first.
    pub fn performance_window(&self, section_id: &str) -> Vec<PerformanceSample> {
        self.performance
            .get(section_id)
            .map(|samples| samples.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Full optimization report: revenue plan, recommendations, benchmarks
    /// and an estimated market share at current average prices.
    pub fn optimization_report(
        &self,
        sections: &[SectionProfile],
        market: &MarketConditions,
    ) -> PriceOptimizationReport {
        let average_price = if sections.is_empty() {
            0.0
        } else {
            sections.iter().map(|s| s.current_price).sum::<f64>() / sections.len() as f64
        };

        PriceOptimizationReport {
            generated_at: Utc::now(),
            revenue: self.optimize_revenue(sections, market),
            recommendations: self.pricing_recommendations(sections, market),
            benchmarks: self.competitor_benchmarks(),
            market_share: self.market_share(average_price),
        }
    }
}

impl Default for PricingAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(demand: f64, time_to_event: f64) -> MarketConditions {
        MarketConditions {
            current_demand: demand,
            time_to_event,
            ..Default::default()
        }
    }

    #[test]
    fn test_high_demand_branch_beats_last_minute() {
        let analytics = PricingAnalytics::new();
        let sections = [SectionProfile::new("standard", "Standard", 12000.0, 500)];

        // Both the high-demand and last-minute branches match; the first wins
        let recs = analytics.pricing_recommendations(&sections, &market(0.9, 3.0));

        assert_eq!(recs.len(), 1);
        assert!((recs[0].price_change_percentage - 25.0).abs() < 1e-9);
        assert!((recs[0].recommended_price - 15000.0).abs() < 1e-9);
    }

    #[test]
    fn test_recommendations_sorted_by_confidence() {
        let analytics = PricingAnalytics::new();
        let sections = [
            // In line with the market: hold, low confidence
            SectionProfile::new("standard", "Standard", 12000.0, 500),
            // Well above the premium competitor average: discount, higher confidence
            SectionProfile::new("premium", "Premium", 40000.0, 200),
        ];

        let recs = analytics.pricing_recommendations(&sections, &market(0.5, 30.0));

        assert_eq!(recs[0].section_id, "premium");
        assert!((recs[0].price_change_percentage + 10.0).abs() < 1e-9);
        assert_eq!(recs[1].section_id, "standard");
        assert_eq!(recs[1].price_change_percentage, 0.0);
    }

    #[test]
    fn test_demand_change_follows_elasticity() {
        let analytics = PricingAnalytics::new();
        let sections = [SectionProfile::new("economy", "Economy", 6500.0, 1000)];

        let recs = analytics.pricing_recommendations(&sections, &market(0.9, 30.0));

        // +25% on a 1.8-elastic tier: demand expected to drop 45%
        assert!((recs[0].expected_demand_change + 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_optimizer_reports_improvement_for_hot_inelastic_tier() {
        let analytics = PricingAnalytics::new();
        let sections = [SectionProfile::new("vip", "VIP Boxes", 45000.0, 80)];

        let result = analytics.optimize_revenue(&sections, &market(0.85, 14.0));

        assert_eq!(result.section_plans.len(), 1);
        assert!(result.section_plans[0].optimized_price > 45000.0);
        assert!(result.section_plans[0].projected_demand <= 1.0);
        assert!(result.optimized_revenue > result.current_revenue);
        assert_eq!(result.confidence, 0.75);
    }

    #[test]
    fn test_optimizer_empty_sections_is_inert() {
        let analytics = PricingAnalytics::new();
        let result = analytics.optimize_revenue(&[], &market(0.5, 30.0));

        assert_eq!(result.current_revenue, 0.0);
        assert_eq!(result.improvement_percentage, 0.0);
        assert!(result.section_plans.is_empty());
    }

    #[test]
    fn test_market_share_bounds() {
        let analytics = PricingAnalytics::new();

        let share = analytics.market_share(20000.0);
        assert!(share > 0.0 && share < 1.0);

        assert_eq!(analytics.market_share(0.0), 0.0);
        assert_eq!(analytics.market_share(-5.0), 0.0);
    }

    #[test]
    fn test_predict_demand_moves_against_price() {
        let analytics = PricingAnalytics::new();
        let conditions = market(0.6, 30.0);

        let held = analytics.predict_demand("standard", 12000.0, 12000.0, &conditions);
        assert!((held - 0.6).abs() < 1e-9);

        let raised = analytics.predict_demand("standard", 15000.0, 12000.0, &conditions);
        assert!(raised < held);

        let cut = analytics.predict_demand("standard", 9000.0, 12000.0, &conditions);
        assert!(cut > held);
        assert!(cut <= 1.0);
    }

    #[test]
    fn test_performance_window_capped() {
        let mut analytics = PricingAnalytics::new();

        for day in 0..45 {
            analytics.track_price_performance("floor", 12000.0, day);
        }

        let window = analytics.performance_window("floor");
        assert_eq!(window.len(), 30);
        assert_eq!(window[0].sales_count, 15);
        assert_eq!(window[29].sales_count, 44);
    }

    #[test]
    fn test_report_aggregates_and_serializes() {
        let analytics = PricingAnalytics::new();
        let sections = [
            SectionProfile::new("vip", "VIP Boxes", 45000.0, 80),
            SectionProfile::new("standard", "Standard", 12000.0, 500),
        ];

        let report = analytics.optimization_report(&sections, &market(0.6, 21.0));

        assert_eq!(report.recommendations.len(), 2);
        assert_eq!(report.benchmarks.len(), 3);
        assert!(report.market_share > 0.0 && report.market_share < 1.0);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["revenue"]["section_plans"].is_array());
        assert!(json["market_share"].is_number());
    }
}
