// Transaction hash properties
//
// md5(lower(md5(passphrase) + merchant_id + amount + currency))

use guestpay::core::Currency;
use guestpay::gateways::compute_hash;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn test_known_vectors() {
    assert_eq!(
        compute_hash("passphrase", "5d6dbee2a1a7c", "50.00", "AUD"),
        "f9ced163c27a805cf0866125feaa2254"
    );
    assert_eq!(
        compute_hash("passphrase", "5d6dbee2a1a7c", "600.00", "AUD"),
        "8eb0dd84e8b8b33b0a3f0d7eb0a44e30"
    );
}

#[test]
fn test_rounded_amount_feeds_the_hash() {
    let amount = Currency::AUD
        .parse_amount("49.999")
        .expect("amount should parse");
    let formatted = Currency::AUD.format_amount(amount);

    assert_eq!(formatted, "50.00");
    assert_eq!(
        compute_hash("passphrase", "5d6dbee2a1a7c", &formatted, "AUD"),
        "f9ced163c27a805cf0866125feaa2254"
    );
}

proptest! {
    #[test]
    fn test_hash_is_deterministic(
        passphrase in "[a-zA-Z0-9]{1,32}",
        merchant in "[a-z0-9]{8,16}",
        cents in 1u64..100_000_000u64,
    ) {
        let amount = Currency::AUD.format_amount(Decimal::new(cents as i64, 2));

        let first = compute_hash(&passphrase, &merchant, &amount, "AUD");
        let second = compute_hash(&passphrase, &merchant, &amount, "AUD");

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 32);
    }

    #[test]
    fn test_amount_change_changes_hash(
        cents in 1u64..100_000_000u64,
        delta in 1u64..1_000u64,
    ) {
        let a = Currency::AUD.format_amount(Decimal::new(cents as i64, 2));
        let b = Currency::AUD.format_amount(Decimal::new((cents + delta) as i64, 2));

        prop_assert_ne!(
            compute_hash("passphrase", "5d6dbee2a1a7c", &a, "AUD"),
            compute_hash("passphrase", "5d6dbee2a1a7c", &b, "AUD")
        );
    }

    #[test]
    fn test_passphrase_change_changes_hash(
        passphrase in "[a-z]{4,16}",
        suffix in "[0-9]{1,4}",
    ) {
        let other = format!("{}{}", passphrase, suffix);

        prop_assert_ne!(
            compute_hash(&passphrase, "5d6dbee2a1a7c", "600.00", "AUD"),
            compute_hash(&other, "5d6dbee2a1a7c", "600.00", "AUD")
        );
    }

    #[test]
    fn test_merchant_id_change_changes_hash(
        prefix in "[a-z0-9]{4,12}",
        a in 0u8..10u8,
        b in 0u8..10u8,
    ) {
        prop_assume!(a != b);
        let first = format!("{}{}", prefix, a);
        let second = format!("{}{}", prefix, b);

        prop_assert_ne!(
            compute_hash("passphrase", &first, "600.00", "AUD"),
            compute_hash("passphrase", &second, "600.00", "AUD")
        );
    }

    #[test]
    fn test_currency_change_changes_hash(cents in 1u64..100_000_000u64) {
        let amount = Currency::AUD.format_amount(Decimal::new(cents as i64, 2));
        let aud = compute_hash("passphrase", "5d6dbee2a1a7c", &amount, "AUD");
        let nzd = compute_hash("passphrase", "5d6dbee2a1a7c", &amount, "NZD");
        let usd = compute_hash("passphrase", "5d6dbee2a1a7c", &amount, "USD");

        prop_assert_ne!(&aud, &nzd);
        prop_assert_ne!(&aud, &usd);
        prop_assert_ne!(&nzd, &usd);
    }

    #[test]
    fn test_case_only_change_keeps_hash(merchant in "[a-z0-9]{8,16}") {
        prop_assert_eq!(
            compute_hash("passphrase", &merchant, "600.00", "aud"),
            compute_hash("passphrase", &merchant.to_uppercase(), "600.00", "AUD")
        );
    }

    #[test]
    fn test_formatted_amount_always_has_two_decimals(raw in 1u64..10_000_000u64, scale in 0u32..5u32) {
        let amount = Decimal::new(raw as i64, scale);
        let formatted = Currency::AUD.format_amount(amount);
        let (_, decimals) = formatted.split_once('.').expect("two decimal places");

        prop_assert_eq!(decimals.len(), 2);
        prop_assert!(Decimal::from_str(&formatted).is_ok());
    }
}
