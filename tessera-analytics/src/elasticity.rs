use crate::models::PriceElasticity;

/// Estimate price elasticity for a section from paired (price, demand)
/// observations via ordinary least squares.
///
/// Total by design: mismatched or short inputs yield the degenerate
/// `elasticity = -1.0, confidence = 0` estimate instead of an error.
pub fn estimate(section_id: &str, prices: &[f64], demands: &[f64]) -> PriceElasticity {
    if prices.len() != demands.len() || prices.len() < 2 {
        return degenerate(section_id);
    }

    let n = prices.len() as f64;
    let mean_price = prices.iter().sum::<f64>() / n;
    let mean_demand = demands.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut price_variance = 0.0;
    for (price, demand) in prices.iter().zip(demands) {
        covariance += (price - mean_price) * (demand - mean_demand);
        price_variance += (price - mean_price) * (price - mean_price);
    }

    if price_variance <= 0.0 || mean_demand <= 0.0 {
        return degenerate(section_id);
    }

    let slope = covariance / price_variance;
    let elasticity = (slope * mean_price / mean_demand).abs();

    // R² against the fitted line
    let intercept = mean_demand - slope * mean_price;
    let mut residual_sum = 0.0;
    let mut total_sum = 0.0;
    for (price, demand) in prices.iter().zip(demands) {
        let fitted = intercept + slope * price;
        residual_sum += (demand - fitted) * (demand - fitted);
        total_sum += (demand - mean_demand) * (demand - mean_demand);
    }
    let confidence = if total_sum > 0.0 {
        (1.0 - residual_sum / total_sum).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let min_price = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_price = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    PriceElasticity {
        section_id: section_id.to_string(),
        price_range: (min_price, max_price),
        elasticity,
        confidence,
        sample_size: prices.len(),
    }
}

fn degenerate(section_id: &str) -> PriceElasticity {
    PriceElasticity {
        section_id: section_id.to_string(),
        price_range: (0.0, 0.0),
        elasticity: -1.0,
        confidence: 0.0,
        sample_size: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sample_is_degenerate() {
        let result = estimate("x", &[100.0], &[0.5]);

        assert_eq!(result.sample_size, 0);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.elasticity, -1.0);
    }

    #[test]
    fn test_mismatched_lengths_are_degenerate() {
        let result = estimate("x", &[100.0, 110.0], &[0.5]);
        assert_eq!(result.elasticity, -1.0);
    }

    #[test]
    fn test_perfect_line_has_full_confidence() {
        // demand = 1.8 - 0.01 * price
        let prices = [100.0, 110.0, 120.0, 130.0];
        let demands = [0.8, 0.7, 0.6, 0.5];

        let result = estimate("floor", &prices, &demands);

        assert_eq!(result.sample_size, 4);
        assert!((result.confidence - 1.0).abs() < 1e-9);
        // |(-0.01) * 115 / 0.65|
        assert!((result.elasticity - 0.01 * 115.0 / 0.65).abs() < 1e-9);
        assert_eq!(result.price_range, (100.0, 130.0));
    }

    #[test]
    fn test_flat_prices_are_degenerate() {
        let result = estimate("x", &[100.0, 100.0, 100.0], &[0.5, 0.6, 0.7]);
        assert_eq!(result.elasticity, -1.0);
    }
}
