/// Nearest whole number of thousandths to `value`, ties to even.
///
/// Works on the exact binary value of the float rather than on `value * 1000`,
/// so `1.0005` (stored just below the tie) gives 1000 and the exact tie
/// `2.0625` gives 2062. `None` for non-finite input or a result outside `i64`.
pub fn to_thousandths(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }

    let bits = value.abs().to_bits();
    let biased_exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    // value = mantissa * 2^exponent exactly.
    let (mantissa, exponent) = if biased_exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exponent - 1075)
    };
    let scaled = u128::from(mantissa) * 1000;

    let magnitude = if exponent >= 0 {
        let shift = exponent as u32;
        if shift >= 64 {
            return None;
        }
        scaled << shift
    } else {
        let shift = exponent.unsigned_abs();
        if shift >= 128 {
            0
        } else {
            let quotient = scaled >> shift;
            let remainder = scaled - (quotient << shift);
            let half = 1u128 << (shift - 1);
            if remainder > half || (remainder == half && quotient & 1 == 1) {
                quotient + 1
            } else {
                quotient
            }
        }
    };

    let magnitude = i64::try_from(magnitude).ok()?;
    Some(if value.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    })
}

pub fn from_thousandths(count: i64) -> f64 {
    count as f64 / 1000.0
}

/// Round to 3 decimal places. Non-finite values pass through unchanged.
pub fn round3(value: f64) -> f64 {
    to_thousandths(value).map_or(value, from_thousandths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0.0, 0)]
    #[case::whole(3.0, 3000)]
    #[case::below_tie(1.0005, 1000)]
    #[case::tie_to_even_down(2.0625, 2062)]
    #[case::tie_to_even_up(0.1875, 188)]
    #[case::plain(0.12345, 123)]
    #[case::round_up(1.98765, 1988)]
    #[case::stored_above(1.3, 1300)]
    #[case::negative_tie(-2.0625, -2062)]
    #[case::negative(-0.4567, -457)]
    #[case::subnormal(f64::MIN_POSITIVE / 4.0, 0)]
    #[case::large(1.0e12, 1_000_000_000_000_000)]
    fn test_to_thousandths(#[case] value: f64, #[case] expected: i64) {
        assert_eq!(to_thousandths(value), Some(expected));
    }

    #[rstest]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    #[case::negative_infinite(f64::NEG_INFINITY)]
    #[case::overflow(1.0e300)]
    fn test_to_thousandths_rejects(#[case] value: f64) {
        assert_eq!(to_thousandths(value), None);
    }

    #[test]
    fn test_round3_matches_decimal_rounding() {
        assert_eq!(round3(1.0005), 1.0);
        assert_eq!(round3(2.0625), 2.062);
        assert_eq!(round3(0.8363636363), 0.836);
        assert_eq!(round3(2.0 / 3.0), 0.667);
    }

    #[test]
    fn test_round3_passes_non_finite_through() {
        assert!(round3(f64::NAN).is_nan());
        assert_eq!(round3(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_round_trip_is_stable() {
        for count in [0, 1, 299, 300, 2300, 255_711, 600_000] {
            assert_eq!(to_thousandths(from_thousandths(count)), Some(count));
        }
    }
}
