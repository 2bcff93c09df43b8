//! Unit tests for the Money module
//!
//! Tests cover rounding, display formatting used in calculation notes,
//! currency handling, and rate application.

use core_kernel::{Money, Currency, MoneyError, Rate, round_money, sum_in};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_keeps_full_precision() {
        let m = Money::new(dec!(68.123456789), Currency::EUR);
        assert_eq!(m.amount(), dec!(68.123456789));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::EUR);
        assert!(m.is_zero());
        assert!(!m.is_positive());
        assert_eq!(m.currency(), Currency::EUR);
    }

    #[test]
    fn test_default_currency_is_eur() {
        assert_eq!(Currency::default(), Currency::EUR);
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_rounded_applies_commercial_rounding() {
        let m = Money::new(dec!(10.005), Currency::EUR);
        assert_eq!(m.rounded().amount(), dec!(10.01));
    }

    #[test]
    fn test_round_money_leaves_whole_cents_untouched() {
        assert_eq!(round_money(dec!(43.00)), dec!(43.00));
        assert_eq!(round_money(dec!(0)), dec!(0));
    }

    #[test]
    fn test_round_money_truncates_sub_cent_noise() {
        assert_eq!(round_money(dec!(36.4000000001)), dec!(36.40));
        assert_eq!(round_money(dec!(36.3999999999)), dec!(36.40));
    }
}

mod display {
    use super::*;

    #[test]
    fn test_eur_display() {
        assert_eq!(Money::new(dec!(85), Currency::EUR).to_string(), "€85.00");
    }

    #[test]
    fn test_display_rounds_unrounded_amounts() {
        assert_eq!(Money::new(dec!(12.345), Currency::EUR).to_string(), "€12.35");
    }

    #[test]
    fn test_other_currencies() {
        assert_eq!(Money::new(dec!(1), Currency::USD).to_string(), "$1.00");
        assert_eq!(Money::new(dec!(1), Currency::CHF).to_string(), "CHF 1.00");
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("eur".parse::<Currency>(), Ok(Currency::EUR));
        assert_eq!(
            "XYZ".parse::<Currency>(),
            Err(MoneyError::UnknownCurrency("XYZ".to_string()))
        );
    }
}

mod totals {
    use super::*;

    #[test]
    fn test_sum_in_currency() {
        let total = sum_in(Currency::EUR, [dec!(85.00), dec!(45.50)]);
        assert_eq!(total.amount(), dec!(130.50));
        assert_eq!(total.currency(), Currency::EUR);
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total = sum_in(Currency::EUR, std::iter::empty());
        assert!(total.is_zero());
        assert_eq!(total.to_string(), "€0.00");
    }
}

mod rates {
    use super::*;

    #[test]
    fn test_rate_round_trip_percentage() {
        let rate = Rate::from_percentage(dec!(80));
        assert_eq!(rate.as_decimal(), dec!(0.8));
        assert_eq!(rate.as_percentage(), dec!(80));
    }

    #[test]
    fn test_zero_rate_applies_to_zero() {
        assert_eq!(Rate::zero().apply(dec!(500)), Decimal::ZERO);
        assert_eq!(Rate::zero().to_string(), "0%");
    }
}
