use crate::config::{ConfigError, EngineConfig};
use crate::history::{HistoryLedger, PriceHistoryEntry};
use crate::rule::{
    AdjustmentKind, DemandConditions, PriceAdjustment, PricingRule, RulePatch, RuleScope,
    RuleTrigger, TimeConditions,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tessera_shared::{MarketConditions, MarketUpdate};
use uuid::Uuid;

/// Result of one price calculation, including the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub original_price: f64,

    /// Final price, rounded to the nearest minor currency unit
    pub adjusted_price: i64,

    /// Names of the rules that fired, in application order
    pub applied_rules: Vec<String>,

    /// Sum of the raw per-rule adjustments relative to the original price.
    /// Clamps are applied after this is accumulated, so it can diverge from
    /// the net change once a cap or the global band kicks in.
    pub adjustment_percentage: f64,

    /// Mean confidence of the rules that fired, 0 when none did
    pub confidence: f64,

    pub reason: String,

    /// History for the supplied seat id; empty when no seat id was given
    pub price_history: Vec<PriceHistoryEntry>,
}

/// Rule-based dynamic pricing engine.
///
/// Owns its rule set, market snapshot and per-seat history. Not internally
/// synchronized: callers sharing one instance across threads must serialize
/// access themselves.
pub struct PricingEngine {
    rules: Vec<PricingRule>,
    history: HistoryLedger,
    market: MarketConditions,
    config: EngineConfig,
}

impl PricingEngine {
    pub fn new(market: MarketConditions) -> Self {
        let config = EngineConfig::default();
        Self {
            rules: Vec::new(),
            history: HistoryLedger::new(config.history_capacity),
            market,
            config,
        }
    }

    pub fn with_config(market: MarketConditions, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rules: Vec::new(),
            history: HistoryLedger::new(config.history_capacity),
            market,
            config,
        })
    }

    /// Register a rule and re-sort the set ascending by priority. Duplicate
    /// ids are kept; both copies may apply.
    pub fn add_rule(&mut self, rule: PricingRule) {
        tracing::info!("Registering pricing rule [{}] at priority {}", rule.name, rule.priority);
        self.rules.push(rule);
        self.rules.sort_by_key(|r| r.priority);
    }

    /// Shallow-merge a patch into the first rule with the given id; silently
    /// does nothing for unknown ids. The rule set is NOT re-sorted even when
    /// the patch changes priority: ordering is fixed at registration.
    pub fn update_rule(&mut self, id: Uuid, patch: RulePatch) {
        if let Some(rule) = self.rules.iter_mut().find(|r| r.id == id) {
            rule.apply_patch(patch);
        }
    }

    pub fn remove_rule(&mut self, id: Uuid) {
        self.rules.retain(|r| r.id != id);
    }

    /// Compute the adjusted price for one seat.
    ///
    /// Active rules are walked in priority order; each firing rule's
    /// adjustment compounds onto the running price, then per-rule caps and
    /// finally the global band clamp apply. When `seat_id` is given the
    /// result is appended to that seat's history.
    pub fn calculate_price(
        &mut self,
        original_price: f64,
        section_id: &str,
        seat_type: &str,
        seat_id: Option<&str>,
    ) -> PriceQuote {
        let now = Utc::now();
        let mut adjusted = original_price;
        let mut total_adjustment = 0.0;
        let mut applied_rules = Vec::new();
        let mut reasons = Vec::new();
        let mut confidence_sum = 0.0;

        for rule in self.rules.iter_mut() {
            if !rule.is_active {
                continue;
            }
            // Scope is checked against the running price: earlier rules can
            // move the seat in or out of a later rule's price range.
            if !rule.applies_to.matches(section_id, seat_type, adjusted) {
                continue;
            }

            let fired = rule.firing_reasons(&self.market, now);
            if fired.is_empty() {
                continue;
            }

            let amount = rule.adjustment_amount(adjusted, &self.market);
            adjusted += amount;

            if let Some(max_increase) = rule.adjustment.max_increase {
                if amount > max_increase {
                    // Cap is anchored to the original price, not the running one
                    adjusted = original_price + max_increase;
                }
            }
            if let Some(min_price) = rule.adjustment.min_price {
                if adjusted < min_price {
                    adjusted = min_price;
                }
            }

            total_adjustment += amount;
            confidence_sum += rule.confidence;
            applied_rules.push(rule.name.clone());
            reasons.push(fired.join(", "));
            rule.last_applied = Some(now);

            tracing::debug!(
                "Rule [{}] moved price by {:.2} to {:.2}",
                rule.name,
                amount,
                adjusted
            );
        }

        let floor = original_price * self.config.min_multiplier;
        let ceiling = original_price * self.config.max_multiplier;
        adjusted = adjusted.max(floor).min(ceiling);

        let adjusted_price = adjusted.round() as i64;
        let adjustment_percentage = if original_price > 0.0 {
            total_adjustment / original_price * 100.0
        } else {
            0.0
        };
        let confidence = if applied_rules.is_empty() {
            0.0
        } else {
            confidence_sum / applied_rules.len() as f64
        };
        let reason = reasons.join("; ");

        let price_history = match seat_id {
            Some(seat) => {
                self.history.record(
                    seat,
                    PriceHistoryEntry {
                        timestamp: now,
                        price: adjusted_price,
                        reason: reason.clone(),
                        rule_id: None,
                    },
                );
                self.history.entries(seat)
            }
            None => Vec::new(),
        };

        PriceQuote {
            original_price,
            adjusted_price,
            applied_rules,
            adjustment_percentage,
            confidence,
            reason,
            price_history,
        }
    }

    pub fn update_market_conditions(&mut self, update: MarketUpdate) {
        self.market.apply(update);
    }

    pub fn market_conditions(&self) -> &MarketConditions {
        &self.market
    }

    /// Active rules in evaluation order.
    pub fn active_rules(&self) -> Vec<&PricingRule> {
        self.rules.iter().filter(|r| r.is_active).collect()
    }

    pub fn price_history(&self, seat_id: &str) -> Vec<PriceHistoryEntry> {
        self.history.entries(seat_id)
    }

    /// Discount applied once the event is at most `days_before_event` away.
    pub fn early_bird_rule(discount_percentage: f64, days_before_event: f64) -> PricingRule {
        PricingRule {
            id: Uuid::new_v4(),
            name: "Early Bird Discount".to_string(),
            trigger: RuleTrigger::TimeBased(TimeConditions {
                days_before_event: Some(days_before_event),
                ..Default::default()
            }),
            adjustment: PriceAdjustment {
                kind: AdjustmentKind::Percentage {
                    value: -discount_percentage,
                },
                max_increase: None,
                min_price: None,
            },
            applies_to: RuleScope::default(),
            priority: 10,
            is_active: true,
            confidence: 0.9,
            created_at: Utc::now(),
            last_applied: None,
        }
    }

    /// Premium applied once demand crosses `demand_threshold`.
    pub fn surge_rule(increase_percentage: f64, demand_threshold: f64) -> PricingRule {
        PricingRule {
            id: Uuid::new_v4(),
            name: "Demand Surge".to_string(),
            trigger: RuleTrigger::DemandBased(DemandConditions {
                demand_threshold: Some(demand_threshold),
                ..Default::default()
            }),
            adjustment: PriceAdjustment {
                kind: AdjustmentKind::Percentage {
                    value: increase_percentage,
                },
                max_increase: None,
                min_price: None,
            },
            applies_to: RuleScope::default(),
            priority: 20,
            is_active: true,
            confidence: 0.85,
            created_at: Utc::now(),
            last_applied: None,
        }
    }

    /// Premium applied inside the final days before the event.
    pub fn last_minute_rule(increase_percentage: f64, days_before_event: f64) -> PricingRule {
        PricingRule {
            id: Uuid::new_v4(),
            name: "Last Minute Premium".to_string(),
            trigger: RuleTrigger::TimeBased(TimeConditions {
                days_before_event: Some(days_before_event),
                ..Default::default()
            }),
            adjustment: PriceAdjustment {
                kind: AdjustmentKind::Percentage {
                    value: increase_percentage,
                },
                max_increase: None,
                min_price: None,
            },
            applies_to: RuleScope::default(),
            priority: 30,
            is_active: true,
            confidence: 0.8,
            created_at: Utc::now(),
            last_applied: None,
        }
    }
}
