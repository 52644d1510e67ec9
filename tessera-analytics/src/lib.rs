pub mod analytics;
mod competitor;
pub mod elasticity;
pub mod models;

pub use analytics::PricingAnalytics;
pub use models::{
    CompetitorBenchmark, PerformanceSample, PriceElasticity, PriceOptimizationReport,
    PricingRecommendation, RevenueOptimization, SectionPricePlan,
};
