//! Money arithmetic shared by carts, reports and the pricing commands.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::CoreError;

/// `quantity × unit_cost`.
///
/// # Errors
///
/// Returns `CoreError::Validation` when the product does not fit in a `Decimal`.
pub fn line_total(quantity: i64, unit_cost: Decimal) -> Result<Decimal, CoreError> {
    Decimal::from(quantity)
        .checked_mul(unit_cost)
        .ok_or_else(|| CoreError::Validation(format!("line total overflows: {quantity} x {unit_cost}")))
}

/// Retail price after applying a markup percentage to a cost.
#[must_use]
pub fn retail_price(cost: Decimal, markup_percentage: Decimal) -> Decimal {
    cost * (Decimal::ONE + markup_percentage / Decimal::ONE_HUNDRED)
}

/// Markup percentage implied by a cost and a retail price.
///
/// # Errors
///
/// Returns `CoreError::Validation` when `cost` is zero.
pub fn markup_percentage(cost: Decimal, retail: Decimal) -> Result<Decimal, CoreError> {
    if cost.is_zero() {
        return Err(CoreError::Validation(
            "cannot compute markup from a zero cost".into(),
        ));
    }
    Ok((retail - cost) / cost * Decimal::ONE_HUNDRED)
}

/// Round to cents, half away from zero.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Render as `$1234.50`.
#[must_use]
pub fn format_money(value: Decimal) -> String {
    format!("${:.2}", round_money(value))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[rstest]
    #[case("10.00", "25", "12.50")]
    #[case("8.40", "0", "8.40")]
    #[case("19.99", "100", "39.98")]
    fn retail_from_markup(#[case] cost: &str, #[case] markup: &str, #[case] expected: &str) {
        assert_eq!(round_money(retail_price(dec(cost), dec(markup))), dec(expected));
    }

    #[rstest]
    #[case("10", "12.5", "25")]
    #[case("20", "15", "-25")]
    fn markup_from_prices(#[case] cost: &str, #[case] retail: &str, #[case] expected: &str) {
        assert_eq!(markup_percentage(dec(cost), dec(retail)).unwrap(), dec(expected));
    }

    #[test]
    fn markup_rejects_zero_cost() {
        assert!(matches!(
            markup_percentage(Decimal::ZERO, dec("5")),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn line_total_multiplies() {
        assert_eq!(line_total(3, dec("42.75")).unwrap(), dec("128.25"));
    }

    #[test]
    fn line_total_rejects_overflow() {
        assert!(matches!(
            line_total(i64::MAX, Decimal::MAX),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(dec("3")), "$3.00");
        assert_eq!(format_money(dec("2.345")), "$2.35");
    }
}
