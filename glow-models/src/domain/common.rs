use glow_error::validation::FieldErrors;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serializer};
use validator::Validate;

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct PathId {
    #[validate(range(min = 1))]
    pub id: i32,
}

/// Rounds to cents, halves away from zero: `45.125` -> `45.13`
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders a decimal amount with exactly two fractional digits, `45` -> `"45.00"`
pub fn format_price(value: &Decimal) -> String {
    let mut rounded = round_price(*value);
    rounded.rescale(2);
    rounded.to_string()
}

/// Form and query flag: `1/true/on/yes` or `0/false/off/no`, any case
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

pub(crate) fn serialize_price<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_price(value))
}

/// Records `"The <field> field is required."` when a required field is missing or null.
///
/// `Option<Option<T>>` reads as: `None` absent, `Some(None)` explicit null.
pub(crate) fn require<T>(
    errors: &mut FieldErrors,
    field: &str,
    value: &Option<Option<T>>,
    present_required: bool,
) {
    let missing = match value {
        None => present_required,
        Some(None) => true,
        Some(Some(_)) => false,
    };
    if missing && !errors.contains(field) {
        errors.add(
            field,
            format!("The {} field is required.", field.replace('_', " ")),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(&Decimal::new(45, 0)), "45.00");
        assert_eq!(format_price(&Decimal::new(325, 1)), "32.50");
        assert_eq!(format_price(&Decimal::new(19999, 3)), "20.00");
        assert_eq!(format_price(&Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_round_price_halves_away_from_zero() {
        assert_eq!(round_price(Decimal::new(45125, 3)), Decimal::new(4513, 2));
        assert_eq!(round_price(Decimal::new(5, 3)), Decimal::new(1, 2));
        assert_eq!(round_price(Decimal::new(45124, 3)), Decimal::new(4512, 2));
        assert_eq!(format_price(&Decimal::new(45125, 3)), "45.13");
        assert_eq!(format_price(&Decimal::new(5, 3)), "0.01");
    }

    #[test]
    fn test_require() {
        let mut errors = FieldErrors::new();
        require::<String>(&mut errors, "name", &None, false);
        assert!(errors.is_empty());

        require::<String>(&mut errors, "name", &None, true);
        assert_eq!(
            errors.get("name"),
            Some(&["The name field is required.".to_string()][..])
        );

        let mut errors = FieldErrors::new();
        require::<String>(&mut errors, "stock_quantity", &Some(None), false);
        assert_eq!(
            errors.get("stock_quantity"),
            Some(&["The stock quantity field is required.".to_string()][..])
        );
    }
}
