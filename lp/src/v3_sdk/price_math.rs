use alloy::primitives::{utils::format_units, U256, U512};

/// Fractional digits carried through the big integer division before the
/// result is narrowed to f64.
const PRICE_SCALE: u8 = 18;

#[derive(Debug, thiserror::Error)]
pub enum PriceMathError {
    #[error("price must be positive and finite, got {0}")]
    NonPositivePrice(f64),

    #[error("scaled price does not fit into 256 bits")]
    PriceOverflow,

    #[error("sqrt price exceeds the uint160 range")]
    SqrtPriceOverflow,

    #[error("price is too small for the X96 representation")]
    SqrtPriceUnderflow,
}

/// Converts the pool's sqrt price into a human readable token1/token0 price:
/// `(sqrtPriceX96^2 / 2^192) * 10^(decimals0 - decimals1)`.
///
/// sqrtPriceX96 comes out of a uint160 slot, so the square needs up to 320
/// bits. The whole computation stays on integers and only the final
/// 18-fractional-digit value is parsed into f64.
pub fn sqrt_price_to_price(
    sqrt_price_x96: U256,
    decimals0: u8,
    decimals1: u8,
) -> Result<f64, PriceMathError> {
    let squared = U512::from(sqrt_price_x96) * U512::from(sqrt_price_x96);

    let shift0 = decimals0.saturating_sub(decimals1);
    let shift1 = decimals1.saturating_sub(decimals0);
    let numerator = squared
        .checked_mul(pow10(PRICE_SCALE as u32 + shift0 as u32))
        .ok_or(PriceMathError::PriceOverflow)?;
    let denominator = (U512::from(1u8) << 192) * pow10(shift1 as u32);

    let scaled = narrow_to_u256(numerator / denominator).ok_or(PriceMathError::PriceOverflow)?;
    let rendered =
        format_units(scaled, PRICE_SCALE).map_err(|_| PriceMathError::PriceOverflow)?;
    rendered
        .parse::<f64>()
        .map_err(|_| PriceMathError::PriceOverflow)
}

/// Inverse transform, used when initializing a fresh pool:
/// `sqrt(price / 10^(decimals0 - decimals1)) * 2^96`.
pub fn price_to_sqrt_price(
    price: f64,
    decimals0: u8,
    decimals1: u8,
) -> Result<U256, PriceMathError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(PriceMathError::NonPositivePrice(price));
    }
    let adjusted = price / 10f64.powi(decimals0 as i32 - decimals1 as i32);
    // Q.32 mantissa first, the remaining 2^64 is an exact shift
    let mantissa = (adjusted.sqrt() * (1u64 << 32) as f64).floor();
    if mantissa < 1.0 {
        return Err(PriceMathError::SqrtPriceUnderflow);
    }
    if !mantissa.is_finite() || mantissa >= (1u128 << 96) as f64 {
        return Err(PriceMathError::SqrtPriceOverflow);
    }
    Ok(U256::from(mantissa as u128) << 64)
}

fn pow10(exp: u32) -> U512 {
    U512::from(10u8).pow(U512::from(exp))
}

fn narrow_to_u256(value: U512) -> Option<U256> {
    let limbs = value.as_limbs();
    if limbs[4..].iter().any(|limb| *limb != 0) {
        return None;
    }
    Some(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_sqrt_price_is_price_one() {
        let sqrt_price = U256::from(1u8) << 96;
        assert_eq!(sqrt_price_to_price(sqrt_price, 18, 18).unwrap(), 1.0);
    }

    #[test]
    fn doubling_the_sqrt_price_quadruples_the_price() {
        let sqrt_price = U256::from(1u8) << 97;
        assert_eq!(sqrt_price_to_price(sqrt_price, 18, 18).unwrap(), 4.0);
    }

    #[test]
    fn decimal_adjustment_scales_both_directions() {
        let sqrt_price = U256::from(1u8) << 96;
        assert_eq!(sqrt_price_to_price(sqrt_price, 6, 18).unwrap(), 1e-12);
        assert_eq!(sqrt_price_to_price(sqrt_price, 18, 6).unwrap(), 1e12);
    }

    #[test]
    fn zero_sqrt_price_is_price_zero() {
        assert_eq!(sqrt_price_to_price(U256::ZERO, 18, 18).unwrap(), 0.0);
    }

    #[test]
    fn sqrt_price_wider_than_uint160_is_rejected() {
        let res = sqrt_price_to_price(U256::MAX, 18, 18);
        assert!(matches!(res, Err(PriceMathError::PriceOverflow)));
    }

    #[test]
    fn round_trips_a_representative_price() {
        let sqrt_price = price_to_sqrt_price(2000.0, 18, 18).unwrap();
        let price = sqrt_price_to_price(sqrt_price, 18, 18).unwrap();
        assert!(((price - 2000.0) / 2000.0).abs() < 1e-9);
    }

    #[test]
    fn round_trips_with_uneven_decimals() {
        let sqrt_price = price_to_sqrt_price(0.000649, 6, 18).unwrap();
        let price = sqrt_price_to_price(sqrt_price, 6, 18).unwrap();
        assert!(((price - 0.000649) / 0.000649).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_prices() {
        assert!(matches!(
            price_to_sqrt_price(0.0, 18, 18),
            Err(PriceMathError::NonPositivePrice(_))
        ));
        assert!(matches!(
            price_to_sqrt_price(-1.0, 18, 18),
            Err(PriceMathError::NonPositivePrice(_))
        ));
        assert!(matches!(
            price_to_sqrt_price(f64::NAN, 18, 18),
            Err(PriceMathError::NonPositivePrice(_))
        ));
    }

    #[test]
    fn rejects_prices_outside_the_x96_range() {
        assert!(matches!(
            price_to_sqrt_price(1e60, 18, 18),
            Err(PriceMathError::SqrtPriceOverflow)
        ));
        assert!(matches!(
            price_to_sqrt_price(1e-30, 18, 18),
            Err(PriceMathError::SqrtPriceUnderflow)
        ));
    }
}
