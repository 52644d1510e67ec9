use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Elasticity estimate derived from historical (price, demand) samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceElasticity {
    pub section_id: String,

    /// (min, max) of the observed prices
    pub price_range: (f64, f64),

    /// Absolute elasticity; -1.0 marks a degenerate estimate
    pub elasticity: f64,

    /// R² of the regression, clamped to [0, 1]
    pub confidence: f64,

    pub sample_size: usize,
}

/// Per-section outcome of a revenue optimization pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionPricePlan {
    pub section_id: String,
    pub current_price: f64,
    pub optimized_price: f64,
    pub elasticity: f64,

    /// Demand projected at the optimized price, capped at 1.0
    pub projected_demand: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueOptimization {
    pub current_revenue: f64,
    pub optimized_revenue: f64,
    pub improvement_percentage: f64,
    pub section_plans: Vec<SectionPricePlan>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRecommendation {
    pub section_id: String,
    pub current_price: f64,
    pub recommended_price: f64,
    pub price_change_percentage: f64,

    /// Expected relative demand move, as a percentage
    pub expected_demand_change: f64,

    /// Expected relative revenue move, as a percentage
    pub expected_revenue_change: f64,

    pub reason: String,
    pub confidence: f64,
}

/// One competitor's listed prices per section tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorBenchmark {
    pub competitor: String,
    pub section_prices: HashMap<String, f64>,
    pub last_updated: DateTime<Utc>,
}

/// One tracked sales observation for a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub recorded_at: DateTime<Utc>,
    pub price: f64,
    pub sales_count: u32,
}

/// Aggregate view combining the optimizer, recommendations and benchmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceOptimizationReport {
    pub generated_at: DateTime<Utc>,
    pub revenue: RevenueOptimization,
    pub recommendations: Vec<PricingRecommendation>,
    pub benchmarks: Vec<CompetitorBenchmark>,

    /// Estimated share of the market at current average prices, in [0, 1]
    pub market_share: f64,
}
