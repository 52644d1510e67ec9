use serde::{Deserialize, Serialize};

/// Snapshot of demand and timing signals used to evaluate pricing rules.
///
/// One snapshot is held per engine instance; there is no versioning, the
/// last update wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConditions {
    /// Share of inventory moving, 0.0 = no interest, 1.0 = sellout pace
    pub current_demand: f64,

    /// Days until the event starts (fractional)
    pub time_to_event: f64,

    /// Tickets sold per hour over the trailing window
    pub sales_velocity: f64,

    /// Known competitor prices for comparable inventory
    pub competitor_prices: Option<Vec<f64>>,

    /// Seasonal multiplier hint (1.0 = neutral)
    pub seasonality: Option<f64>,

    /// Popularity score for the event itself
    pub event_popularity: Option<f64>,
}

impl Default for MarketConditions {
    fn default() -> Self {
        Self {
            current_demand: 0.5,
            time_to_event: 30.0,
            sales_velocity: 0.0,
            competitor_prices: None,
            seasonality: None,
            event_popularity: None,
        }
    }
}

/// Partial update for [`MarketConditions`]; unset fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketUpdate {
    pub current_demand: Option<f64>,
    pub time_to_event: Option<f64>,
    pub sales_velocity: Option<f64>,
    pub competitor_prices: Option<Vec<f64>>,
    pub seasonality: Option<f64>,
    pub event_popularity: Option<f64>,
}

impl MarketConditions {
    /// Shallow-merge an update into the current snapshot.
    pub fn apply(&mut self, update: MarketUpdate) {
        if let Some(demand) = update.current_demand {
            self.current_demand = demand;
        }
        if let Some(days) = update.time_to_event {
            self.time_to_event = days;
        }
        if let Some(velocity) = update.sales_velocity {
            self.sales_velocity = velocity;
        }
        if let Some(prices) = update.competitor_prices {
            self.competitor_prices = Some(prices);
        }
        if let Some(seasonality) = update.seasonality {
            self.seasonality = Some(seasonality);
        }
        if let Some(popularity) = update.event_popularity {
            self.event_popularity = Some(popularity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update_keeps_unset_fields() {
        let mut market = MarketConditions {
            current_demand: 0.7,
            time_to_event: 14.0,
            sales_velocity: 3.5,
            ..Default::default()
        };

        market.apply(MarketUpdate {
            current_demand: Some(0.9),
            ..Default::default()
        });

        assert_eq!(market.current_demand, 0.9);
        assert_eq!(market.time_to_event, 14.0);
        assert_eq!(market.sales_velocity, 3.5);
        assert!(market.competitor_prices.is_none());
    }
}
