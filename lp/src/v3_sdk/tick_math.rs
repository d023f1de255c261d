/// Tick bounds shared by every v3 pool, floor(log_1.0001(2^-128)) and its
/// negation.
pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = 887272;

const TICK_BASE: f64 = 1.0001;

#[derive(Debug, thiserror::Error)]
pub enum TickMathError {
    #[error("price must be positive and finite, got {0}")]
    NonPositivePrice(f64),

    #[error("tick spacing must be positive, got {0}")]
    InvalidTickSpacing(i32),

    #[error("percentage must be inside (0, 1), got {0}")]
    InvalidPercentage(f64),

    #[error("tick {0} is outside the supported range")]
    TickOutOfBounds(i32),
}

/// Maps a price onto the tick grid: `floor(ln(price) / ln(1.0001))`.
pub fn price_to_tick(price: f64) -> Result<i32, TickMathError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(TickMathError::NonPositivePrice(price));
    }
    // |ln(price)| <= ~745 for any finite positive f64, so the quotient
    // always fits an i32
    let tick = (price.ln() / TICK_BASE.ln()).floor() as i32;
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(TickMathError::TickOutOfBounds(tick));
    }
    Ok(tick)
}

/// Largest multiple of `tick_spacing` at or below `tick`. Negative ticks
/// round away from zero, so euclidean division, not truncation.
pub fn round_tick_down(tick: i32, tick_spacing: i32) -> Result<i32, TickMathError> {
    if tick_spacing <= 0 {
        return Err(TickMathError::InvalidTickSpacing(tick_spacing));
    }
    Ok(tick.div_euclid(tick_spacing) * tick_spacing)
}

/// Smallest multiple of `tick_spacing` at or above `tick`. Exact multiples
/// stay where they are.
pub fn round_tick_up(tick: i32, tick_spacing: i32) -> Result<i32, TickMathError> {
    if tick_spacing <= 0 {
        return Err(TickMathError::InvalidTickSpacing(tick_spacing));
    }
    if tick.rem_euclid(tick_spacing) == 0 {
        Ok(tick)
    } else {
        Ok((tick.div_euclid(tick_spacing) + 1) * tick_spacing)
    }
}
