// Gateway XML decoding

#[path = "../helpers/mod.rs"]
mod helpers;

use guestpay::gateways::services::{parse, ParseError, ACCEPTED_ROOTS};
use helpers::*;

#[test]
fn test_both_roots_yield_equal_fields() {
    let fields = [
        ("responseCode", "0"),
        ("responseMessage", "Transaction approved"),
        ("transactionID", TEST_TRANSACTION_ID),
    ];

    let mw = parse(xml_response("mwResponse", &fields).as_bytes()).unwrap();
    let plain = parse(xml_response("Response", &fields).as_bytes()).unwrap();

    assert_eq!(mw, plain);
    assert_eq!(mw.response_code(), Some("0"));
    assert_eq!(mw.get("transactionID"), Some(TEST_TRANSACTION_ID));
    assert_eq!(ACCEPTED_ROOTS, ["mwResponse", "Response"]);
}

#[test]
fn test_other_roots_rejected() {
    let body = xml_response("error", &[("responseCode", "0")]);
    assert_eq!(
        parse(body.as_bytes()),
        Err(ParseError::UnexpectedRoot("error".to_string()))
    );
}

#[test]
fn test_html_error_page_rejected() {
    let body = "<html><body><h1>502 Bad Gateway</h1></body></html>";
    assert!(parse(body.as_bytes()).is_err());
}

#[test]
fn test_empty_body_rejected() {
    assert_eq!(parse(b""), Err(ParseError::MissingRoot));
    assert_eq!(parse(b"   \n"), Err(ParseError::MissingRoot));
}

#[test]
fn test_truncated_body_rejected() {
    let body = access_token_xml();
    let truncated = &body.as_bytes()[..body.len() - 8];
    assert!(matches!(parse(truncated), Err(ParseError::Malformed(_))));
}

#[test]
fn test_card_info_fields_are_kept() {
    let fields = parse(card_info_xml(TEST_CARD_TOKEN).as_bytes()).unwrap();

    assert_eq!(fields.get("cardID"), Some(TEST_CARD_TOKEN));
    assert_eq!(fields.get("cardNumberFirst"), Some("4111"));
    assert_eq!(fields.get("cardAdded"), Some("2024-05-01 10:00:00"));
    assert_eq!(fields.len(), 9);
}

#[test]
fn test_declined_charge_keeps_empty_fields() {
    let fields = parse(declined_charge_xml().as_bytes()).unwrap();

    assert_eq!(fields.response_code(), Some("1"));
    assert_eq!(fields.response_message(), Some("Transaction declined"));
    assert_eq!(fields.get("authCode"), Some(""));
}
