//! End-to-end verification tests.
//!
//! These tests feed real EXIF containers (minimal handcrafted TIFFs)
//! through the metadata extractor, the capture-time validator, and the
//! ledger, verifying the complete classification pipeline.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use reveille_core::{
    capture_timestamp, Attachment, Outcome, StatusLedger, Submission, SubmissionValidator,
    ValidationStrategy, VerificationWindow,
};

const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;
const TAG_EXIF_IFD: u16 = 0x8769;
const TAG_DATETIME: u16 = 0x0132;
const TAG_DATETIME_ORIGINAL: u16 = 0x9003;
const TAG_DATETIME_DIGITIZED: u16 = 0x9004;

/// Append an ASCII value to the data area, returning (count, offset).
fn place(s: &str, values: &mut Vec<u8>, value_off: &mut usize) -> (u32, u32) {
    let count = s.len() + 1;
    let off = *value_off;
    values.extend_from_slice(s.as_bytes());
    values.push(0);
    *value_off += count;
    (count as u32, off as u32)
}

fn write_ifd(out: &mut Vec<u8>, entries: &[(u16, u16, u32, u32)]) {
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, ty, count, value) in entries {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&ty.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&0u32.to_le_bytes());
}

/// Build a minimal little-endian TIFF: ASCII entries in IFD0 plus, when
/// any are supplied, an Exif sub-IFD holding more ASCII entries.
fn build_tiff(ifd0: &[(u16, &str)], exif_ifd: &[(u16, &str)]) -> Vec<u8> {
    let has_sub = !exif_ifd.is_empty();
    let n0 = ifd0.len() + usize::from(has_sub);
    let ifd0_len = 2 + n0 * 12 + 4;
    let sub_off = 8 + ifd0_len;
    let sub_len = if has_sub {
        2 + exif_ifd.len() * 12 + 4
    } else {
        0
    };
    let mut value_off = sub_off + sub_len;
    let mut values = Vec::new();

    let mut entries0: Vec<(u16, u16, u32, u32)> = ifd0
        .iter()
        .map(|(tag, s)| {
            let (count, off) = place(s, &mut values, &mut value_off);
            (*tag, TYPE_ASCII, count, off)
        })
        .collect();
    if has_sub {
        entries0.push((TAG_EXIF_IFD, TYPE_LONG, 1, sub_off as u32));
    }
    entries0.sort_by_key(|e| e.0);

    let mut sub_entries: Vec<(u16, u16, u32, u32)> = exif_ifd
        .iter()
        .map(|(tag, s)| {
            let (count, off) = place(s, &mut values, &mut value_off);
            (*tag, TYPE_ASCII, count, off)
        })
        .collect();
    sub_entries.sort_by_key(|e| e.0);

    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());
    write_ifd(&mut out, &entries0);
    if has_sub {
        write_ifd(&mut out, &sub_entries);
    }
    out.extend_from_slice(&values);
    out
}

fn photo_taken_at(timestamp: &str) -> Attachment {
    Attachment::new(
        "proof.jpg",
        build_tiff(&[], &[(TAG_DATETIME_ORIGINAL, timestamp)]),
    )
}

fn submission_of(attachments: Vec<Attachment>) -> Submission {
    Submission {
        user_id: "101".into(),
        arrival: Utc::now(),
        attachments,
    }
}

fn capture_validator(ledger: Option<Arc<StatusLedger>>) -> SubmissionValidator {
    SubmissionValidator::new(
        VerificationWindow::default(),
        ValidationStrategy::CaptureTime,
        ledger,
    )
}

#[test]
fn extractor_prefers_the_capture_time_tag() {
    let tiff = build_tiff(
        &[(TAG_DATETIME, "2024:03:03 10:00:00")],
        &[
            (TAG_DATETIME_ORIGINAL, "2024:03:01 08:00:00"),
            (TAG_DATETIME_DIGITIZED, "2024:03:02 09:00:00"),
        ],
    );
    assert_eq!(
        capture_timestamp(&tiff).as_deref(),
        Some("2024:03:01 08:00:00")
    );
}

#[test]
fn extractor_falls_back_to_digitized_time() {
    let tiff = build_tiff(
        &[(TAG_DATETIME, "2024:03:03 10:00:00")],
        &[(TAG_DATETIME_DIGITIZED, "2024:03:02 09:00:00")],
    );
    assert_eq!(
        capture_timestamp(&tiff).as_deref(),
        Some("2024:03:02 09:00:00")
    );
}

#[test]
fn extractor_falls_back_to_modification_time() {
    let tiff = build_tiff(&[(TAG_DATETIME, "2024:03:03 10:00:00")], &[]);
    assert_eq!(
        capture_timestamp(&tiff).as_deref(),
        Some("2024:03:03 10:00:00")
    );
}

#[test]
fn capture_inside_window_confirms() {
    let verdict =
        capture_validator(None).validate(&submission_of(vec![photo_taken_at("2024:03:01 08:00:00")]));
    assert_eq!(verdict.outcome, Outcome::Confirmed);
    assert_eq!(
        verdict.verified_at.unwrap().date_naive(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    );
}

#[test]
fn capture_outside_window_fails() {
    let verdict =
        capture_validator(None).validate(&submission_of(vec![photo_taken_at("2024:03:01 09:00:00")]));
    assert_eq!(verdict.outcome, Outcome::Failed);
}

#[test]
fn window_boundaries_confirm_inclusively() {
    let validator = capture_validator(None);
    for timestamp in ["2024:03:01 07:30:00", "2024:03:01 08:30:00"] {
        let verdict = validator.validate(&submission_of(vec![photo_taken_at(timestamp)]));
        assert_eq!(verdict.outcome, Outcome::Confirmed, "at {timestamp}");
    }
    for timestamp in ["2024:03:01 07:29:59", "2024:03:01 08:30:01"] {
        let verdict = validator.validate(&submission_of(vec![photo_taken_at(timestamp)]));
        assert_eq!(verdict.outcome, Outcome::Failed, "at {timestamp}");
    }
}

#[test]
fn unparseable_capture_value_is_invalid_format() {
    let verdict =
        capture_validator(None).validate(&submission_of(vec![photo_taken_at("yesterday morning")]));
    assert_eq!(verdict.outcome, Outcome::InvalidDateFormat);
}

#[test]
fn photo_without_metadata_is_invalid() {
    let verdict = capture_validator(None).validate(&submission_of(vec![Attachment::new(
        "proof.jpg",
        b"\x89PNG\r\n\x1a\njust pixels".to_vec(),
    )]));
    assert_eq!(verdict.outcome, Outcome::InvalidMetadata);
}

#[test]
fn only_verified_outcomes_reach_the_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Arc::new(StatusLedger::open(dir.path().join("ledger.json")).unwrap());
    let validator = capture_validator(Some(Arc::clone(&ledger)));

    let confirmed =
        validator.validate(&submission_of(vec![photo_taken_at("2024:03:01 08:00:00")]));
    assert!(confirmed.ledger_error.is_none());
    let failed = validator.validate(&submission_of(vec![photo_taken_at("2024:03:02 12:00:00")]));
    assert!(failed.ledger_error.is_none());
    validator.validate(&submission_of(vec![Attachment::new("proof.gif", vec![])]));
    validator.validate(&submission_of(vec![Attachment::new(
        "proof.jpg",
        b"no metadata".to_vec(),
    )]));
    validator.validate(&submission_of(vec![]));

    let history = ledger.read("101").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].outcome, Outcome::Confirmed);
    assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(history[1].outcome, Outcome::Failed);
    assert_eq!(history[1].date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
}
