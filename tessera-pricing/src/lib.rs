pub mod config;
pub mod engine;
pub mod history;
pub mod rule;

pub use config::{ConfigError, EngineConfig};
pub use engine::{PriceQuote, PricingEngine};
pub use history::PriceHistoryEntry;
pub use rule::{
    AdjustmentKind, CurveShape, DemandConditions, HourWindow, PriceAdjustment, PriceRange,
    PricingRule, RulePatch, RuleScope, RuleTrigger, TimeConditions,
};
