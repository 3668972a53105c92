//! Unit tests for left/right balance decoding and rescaling.

use fitlap::analyzer::AnalyzerOptions;
use fitlap::ingest::decode::decode_balance;
use fitlap::ingest::fit::extract_session;
use fitlap::ingest::SessionMessage;

#[test]
fn test_masked_raw_decodes_to_percentage() {
    let balance = decode_balance(0x8000 | 5230).unwrap();
    assert!((balance - 52.3).abs() < 1e-4);
}

#[test]
fn test_zero_raw_is_absent() {
    assert_eq!(decode_balance(0), None);
    assert_eq!(decode_balance(0x8000), None);
}

#[test]
fn test_session_rescales_percentage_to_fraction() {
    let msg = SessionMessage {
        sport: Some("cycling".to_string()),
        left_right_balance: Some(62.0),
        ..Default::default()
    };

    let session = extract_session(&msg, AnalyzerOptions::default().offset());
    let left = session.left_balance.unwrap();
    assert!((left - 0.62).abs() < 1e-6);
}

#[test]
fn test_session_zero_balance_stays_absent() {
    let msg = SessionMessage {
        sport: Some("cycling".to_string()),
        left_right_balance: Some(0.0),
        ..Default::default()
    };

    let session = extract_session(&msg, AnalyzerOptions::default().offset());
    // Never fabricate a 50/50 split from "no data"
    assert_eq!(session.left_balance, None);
}
