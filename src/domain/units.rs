//! Wei/TARA conversion and hex quantity parsing

use alloy_primitives::U256;
use thiserror::Error;

/// Number of wei in one TARA (10^18)
pub const WEI_PER_TARA: u64 = 1_000_000_000_000_000_000;

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("expected a 0x-prefixed hex quantity, got {0:?}")]
    MissingPrefix(String),
    #[error("empty hex quantity")]
    Empty,
    #[error("invalid hex quantity {0:?}")]
    InvalidDigits(String),
    #[error("hex quantity {0:?} does not fit in {1} bits")]
    Overflow(String, u32),
}

/// Parse a JSON-RPC hex quantity such as `"0xde0b6b3a7640000"`.
pub fn parse_quantity(s: &str) -> Result<U256, QuantityError> {
    let digits = hex_digits(s)?;
    if digits.len() > 64 {
        return Err(QuantityError::Overflow(s.to_string(), 256));
    }
    U256::from_str_radix(digits, 16).map_err(|_| QuantityError::InvalidDigits(s.to_string()))
}

/// Parse a hex quantity that must fit in a u64 (block numbers).
pub fn parse_block_number(s: &str) -> Result<u64, QuantityError> {
    let digits = hex_digits(s)?;
    u64::from_str_radix(digits, 16).map_err(|_| QuantityError::Overflow(s.to_string(), 64))
}

fn hex_digits(s: &str) -> Result<&str, QuantityError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| QuantityError::MissingPrefix(s.to_string()))?;
    if digits.is_empty() {
        return Err(QuantityError::Empty);
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(QuantityError::InvalidDigits(s.to_string()));
    }
    Ok(digits)
}

/// Wei to TARA as f64.
///
/// The integer and fractional parts are converted separately so whole-TARA
/// amounts keep full f64 precision instead of going through one huge division.
pub fn wei_to_tara(wei: U256) -> f64 {
    let unit = U256::from(WEI_PER_TARA);
    let whole = wei / unit;
    let frac = (wei % unit).to::<u64>();

    u256_to_f64(whole) + frac as f64 / WEI_PER_TARA as f64
}

/// TARA to wei, rounded down. Negative and non-finite amounts map to zero;
/// amounts beyond the U256 range saturate.
pub fn tara_to_wei(tara: f64) -> U256 {
    if !tara.is_finite() || tara <= 0.0 {
        return if tara == f64::INFINITY { U256::MAX } else { U256::ZERO };
    }
    f64_to_u256((tara * WEI_PER_TARA as f64).floor())
}

fn u256_to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, &limb| acc * TWO_POW_64 + limb as f64)
}

fn f64_to_u256(value: f64) -> U256 {
    if value < 1.0 {
        return U256::ZERO;
    }
    let bits = value.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i64 - 1075;
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);

    if exponent >= 0 {
        U256::from(mantissa)
            .checked_shl(exponent as usize)
            .unwrap_or(U256::MAX)
    } else {
        U256::from(mantissa >> (-exponent) as u32)
    }
}
