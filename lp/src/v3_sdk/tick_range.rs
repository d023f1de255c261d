use super::tick_math::{self, TickMathError};

/// Tick boundaries of a position, both multiples of the pool's tick spacing
/// with `tick_lower < tick_upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRange {
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Brackets `price` with a symmetric percentage band and snaps the bounds to
/// the tick grid, lower bound down and upper bound up.
pub fn calculate_tick_range(
    price: f64,
    percentage: f64,
    tick_spacing: i32,
) -> Result<TickRange, TickMathError> {
    if !percentage.is_finite() || percentage <= 0.0 || percentage >= 1.0 {
        return Err(TickMathError::InvalidPercentage(percentage));
    }
    if tick_spacing <= 0 {
        return Err(TickMathError::InvalidTickSpacing(tick_spacing));
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(TickMathError::NonPositivePrice(price));
    }

    let lower_bound = price * (1.0 - percentage);
    let upper_bound = price * (1.0 + percentage);

    let tick_lower =
        tick_math::round_tick_down(tick_math::price_to_tick(lower_bound)?, tick_spacing)?;
    let mut tick_upper =
        tick_math::round_tick_up(tick_math::price_to_tick(upper_bound)?, tick_spacing)?;

    // a band narrower than one spacing step still has to span one
    if tick_lower == tick_upper {
        tick_upper += tick_spacing;
    }

    Ok(TickRange {
        tick_lower,
        tick_upper,
    })
}
