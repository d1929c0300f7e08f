//! Body-mass index.

use crate::shared::round_to;
use crate::{AnalyticsError, AnalyticsResult};

/// Body-mass index from weight and height, rounded to two decimals.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidInput`] if either measurement is not a positive, finite
/// number.
pub fn calculate_bmi(weight_kg: f64, height_m: f64) -> AnalyticsResult<f64> {
    let usable = |x: f64| x.is_finite() && x > 0.0;
    if !usable(weight_kg) || !usable(height_m) {
        return Err(AnalyticsError::InvalidInput(
            "weight and height must be positive".into(),
        ));
    }
    Ok(round_to(weight_kg / (height_m * height_m), 2))
}
