use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tessera_shared::MarketConditions;
use uuid::Uuid;

/// A named, prioritized, togglable pricing policy.
///
/// Rules are evaluated in ascending priority order and each rule's effect
/// compounds onto the price as adjusted by the rules before it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: Uuid,
    pub name: String,
    pub trigger: RuleTrigger,
    pub adjustment: PriceAdjustment,
    #[serde(default)]
    pub applies_to: RuleScope,
    pub priority: i32,
    pub is_active: bool,

    /// Subjective weight in [0, 1], not a probability
    pub confidence: f64,

    pub created_at: DateTime<Utc>,
    pub last_applied: Option<DateTime<Utc>>,
}

/// Conditions that decide whether a rule fires.
///
/// Within a variant every present condition is an independent trigger: any
/// one of them firing makes the rule apply, and the reasons of all firing
/// conditions are reported together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleTrigger {
    TimeBased(TimeConditions),
    DemandBased(DemandConditions),
    Hybrid {
        time: TimeConditions,
        demand: DemandConditions,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeConditions {
    /// Fires once `time_to_event` is at or below this many days
    pub days_before_event: Option<f64>,

    /// Fires while the wall-clock hour is inside this window
    pub time_of_day: Option<HourWindow>,

    /// Fires on these weekdays
    pub days_of_week: Option<Vec<Weekday>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemandConditions {
    /// Fires once `current_demand` reaches this threshold
    pub demand_threshold: Option<f64>,

    /// Fires once the sold share of inventory reaches this value
    pub sales_percentage: Option<f64>,

    /// Fires while `current_demand` sits inside [min, max]
    pub demand_range: Option<(f64, f64)>,
}

/// Inclusive hour-of-day window; minutes are ignored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

/// How a firing rule moves the price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAdjustment {
    #[serde(flatten)]
    pub kind: AdjustmentKind,

    /// Absolute cap on the increase, relative to the original price
    pub max_increase: Option<f64>,

    /// Floor the adjusted price is raised to if it drops below
    pub min_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "adjustment", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentKind {
    /// Percent of the running price, negative for a discount
    Percentage { value: f64 },

    /// Flat amount added verbatim
    Fixed { value: f64 },

    /// Percent of the running price scaled by a demand/time curve
    Curve { rate: f64, shape: CurveShape },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurveShape {
    Linear,
    Exponential,
    Logarithmic,
}

/// Section/seat/price filters; a rule applies only when ALL present filters
/// match. An empty filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleScope {
    #[serde(default)]
    pub section_ids: Vec<String>,
    #[serde(default)]
    pub seat_types: Vec<String>,
    #[serde(default)]
    pub price_ranges: Vec<PriceRange>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Partial update for a rule; unset fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulePatch {
    pub name: Option<String>,
    pub trigger: Option<RuleTrigger>,
    pub adjustment: Option<PriceAdjustment>,
    pub applies_to: Option<RuleScope>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
    pub confidence: Option<f64>,
}

impl RuleScope {
    /// The price checked here is the running adjusted price, not the
    /// original: earlier rules can move a seat in or out of a later rule's
    /// price range.
    pub fn matches(&self, section_id: &str, seat_type: &str, price: f64) -> bool {
        if !self.section_ids.is_empty() && !self.section_ids.iter().any(|s| s == section_id) {
            return false;
        }
        if !self.seat_types.is_empty() && !self.seat_types.iter().any(|s| s == seat_type) {
            return false;
        }
        if !self.price_ranges.is_empty()
            && !self.price_ranges.iter().any(|r| price >= r.min && price <= r.max)
        {
            return false;
        }
        true
    }
}

impl PricingRule {
    /// Evaluate the trigger against the market; returns the reasons of every
    /// firing condition, empty when the rule does not fire.
    pub fn firing_reasons(&self, market: &MarketConditions, now: DateTime<Utc>) -> Vec<String> {
        match &self.trigger {
            RuleTrigger::TimeBased(time) => time_reasons(time, market, now),
            RuleTrigger::DemandBased(demand) => demand_reasons(demand, market),
            RuleTrigger::Hybrid { time, demand } => {
                let mut reasons = time_reasons(time, market, now);
                reasons.extend(demand_reasons(demand, market));
                reasons
            }
        }
    }

    /// Raw amount (not a rate) this rule adds to the running price.
    pub fn adjustment_amount(&self, current_price: f64, market: &MarketConditions) -> f64 {
        match &self.adjustment.kind {
            AdjustmentKind::Percentage { value } => current_price * value / 100.0,
            AdjustmentKind::Fixed { value } => *value,
            AdjustmentKind::Curve { rate, shape } => {
                let demand_factor = market.current_demand;
                let time_factor = (1.0 - market.time_to_event / 365.0).max(0.0);
                let multiplier = match shape {
                    CurveShape::Linear => demand_factor + time_factor,
                    CurveShape::Exponential => (demand_factor + time_factor).powi(2),
                    CurveShape::Logarithmic => {
                        (1.0 + (demand_factor + time_factor) * std::f64::consts::E).ln()
                    }
                };
                current_price * rate * multiplier / 100.0
            }
        }
    }

    /// Shallow-merge a patch into this rule.
    pub fn apply_patch(&mut self, patch: RulePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(trigger) = patch.trigger {
            self.trigger = trigger;
        }
        if let Some(adjustment) = patch.adjustment {
            self.adjustment = adjustment;
        }
        if let Some(scope) = patch.applies_to {
            self.applies_to = scope;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(confidence) = patch.confidence {
            self.confidence = confidence;
        }
    }
}

fn time_reasons(
    conditions: &TimeConditions,
    market: &MarketConditions,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if let Some(days) = conditions.days_before_event {
        if market.time_to_event <= days {
            reasons.push(format!("within {} days of event", days));
        }
    }
    if let Some(window) = conditions.time_of_day {
        let hour = now.hour();
        if hour >= window.start && hour <= window.end {
            reasons.push(format!(
                "inside {:02}:00-{:02}:59 window",
                window.start, window.end
            ));
        }
    }
    if let Some(days) = &conditions.days_of_week {
        if days.contains(&now.weekday()) {
            reasons.push(format!("{} pricing day", now.weekday()));
        }
    }

    reasons
}

fn demand_reasons(conditions: &DemandConditions, market: &MarketConditions) -> Vec<String> {
    let mut reasons = Vec::new();

    if let Some(threshold) = conditions.demand_threshold {
        if market.current_demand >= threshold {
            reasons.push(format!(
                "demand {:.0}% at or above {:.0}% threshold",
                market.current_demand * 100.0,
                threshold * 100.0
            ));
        }
    }
    if let Some(sales) = conditions.sales_percentage {
        if market.current_demand >= sales {
            reasons.push(format!("sales past {:.0}% of inventory", sales * 100.0));
        }
    }
    if let Some((min, max)) = conditions.demand_range {
        if market.current_demand >= min && market.current_demand <= max {
            reasons.push(format!(
                "demand inside {:.0}%-{:.0}% band",
                min * 100.0,
                max * 100.0
            ));
        }
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn percentage_rule(value: f64, trigger: RuleTrigger) -> PricingRule {
        PricingRule {
            id: Uuid::new_v4(),
            name: "test".to_string(),
            trigger,
            adjustment: PriceAdjustment {
                kind: AdjustmentKind::Percentage { value },
                max_increase: None,
                min_price: None,
            },
            applies_to: RuleScope::default(),
            priority: 1,
            is_active: true,
            confidence: 0.8,
            created_at: Utc::now(),
            last_applied: None,
        }
    }

    #[test]
    fn test_time_trigger_or_semantics() {
        // Thursday 2026-03-05 20:00 UTC
        let now = Utc.with_ymd_and_hms(2026, 3, 5, 20, 0, 0).unwrap();
        let market = MarketConditions {
            time_to_event: 90.0,
            ..Default::default()
        };

        let rule = percentage_rule(
            10.0,
            RuleTrigger::TimeBased(TimeConditions {
                days_before_event: Some(7.0), // does not fire: 90 > 7
                time_of_day: Some(HourWindow { start: 18, end: 22 }), // fires
                days_of_week: Some(vec![Weekday::Thu]), // fires
            }),
        );

        let reasons = rule.firing_reasons(&market, now);
        assert_eq!(reasons.len(), 2);
    }

    #[test]
    fn test_demand_range_trigger() {
        let market = MarketConditions {
            current_demand: 0.45,
            ..Default::default()
        };

        let rule = percentage_rule(
            5.0,
            RuleTrigger::DemandBased(DemandConditions {
                demand_range: Some((0.4, 0.6)),
                ..Default::default()
            }),
        );

        assert!(!rule.firing_reasons(&market, Utc::now()).is_empty());

        let cold = MarketConditions {
            current_demand: 0.2,
            ..Default::default()
        };
        assert!(rule.firing_reasons(&cold, Utc::now()).is_empty());
    }

    #[test]
    fn test_scope_matches_running_price() {
        let scope = RuleScope {
            section_ids: vec!["floor".to_string()],
            seat_types: vec![],
            price_ranges: vec![PriceRange {
                min: 50000.0,
                max: 150000.0,
            }],
        };

        assert!(scope.matches("floor", "seated", 100000.0));
        assert!(!scope.matches("balcony", "seated", 100000.0));
        assert!(!scope.matches("floor", "seated", 200000.0));
    }

    #[test]
    fn test_linear_curve_amount() {
        let market = MarketConditions {
            current_demand: 0.6,
            time_to_event: 365.0, // time factor bottoms out at 0
            ..Default::default()
        };

        let mut rule = percentage_rule(0.0, RuleTrigger::DemandBased(DemandConditions::default()));
        rule.adjustment.kind = AdjustmentKind::Curve {
            rate: 10.0,
            shape: CurveShape::Linear,
        };

        let amount = rule.adjustment_amount(100000.0, &market);
        assert!((amount - 6000.0).abs() < 1e-6);
    }

    #[test]
    fn test_rule_round_trips_through_json() {
        let rule = percentage_rule(
            -20.0,
            RuleTrigger::Hybrid {
                time: TimeConditions {
                    days_before_event: Some(30.0),
                    ..Default::default()
                },
                demand: DemandConditions {
                    demand_threshold: Some(0.7),
                    ..Default::default()
                },
            },
        );

        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["trigger"]["type"], "HYBRID");

        let back: PricingRule = serde_json::from_value(json).unwrap();
        assert_eq!(back.name, rule.name);
    }
}
