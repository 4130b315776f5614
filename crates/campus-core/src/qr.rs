// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Attendance QR payload codec.
//!
//! The payload is a small JSON document carried inside a QR image. The
//! image codec itself is an external collaborator behind [`QrImageCodec`];
//! this module owns only the payload format.
//!
//! Decoding is tolerant by contract: malformed or foreign payloads resolve
//! to [`QrScan::Unknown`] rather than erroring, and the attendance
//! check-in flow treats an unknown scan as a no-op.

use serde::{Deserialize, Serialize};

/// Payload type tag for attendance check-in codes.
pub const ATTENDANCE_TYPE: &str = "attendance";

// =============================================================================
// AttendancePayload
// =============================================================================

/// The JSON document embedded in an attendance QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePayload {
    /// Payload type tag; always [`ATTENDANCE_TYPE`] for this document.
    #[serde(rename = "type")]
    pub kind: String,
    /// The student checking in.
    pub student_id: String,
    /// The student's school.
    pub school_id: String,
    /// Issue sequence number, distinguishing reissued codes.
    pub sequence: u64,
}

impl AttendancePayload {
    /// Creates a new attendance payload.
    pub fn new(student_id: impl Into<String>, school_id: impl Into<String>, sequence: u64) -> Self {
        Self {
            kind: ATTENDANCE_TYPE.to_string(),
            student_id: student_id.into(),
            school_id: school_id.into(),
            sequence,
        }
    }

    /// Serializes the payload to its JSON wire form.
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "type": self.kind,
            "student_id": self.student_id,
            "school_id": self.school_id,
            "sequence": self.sequence,
        })
        .to_string()
    }
}

// =============================================================================
// QrScan
// =============================================================================

/// The result of parsing a scanned string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrScan {
    /// A well-formed attendance payload.
    Attendance(AttendancePayload),
    /// Anything else: malformed JSON, a foreign document, or a payload
    /// with a different type tag.
    Unknown,
}

/// Parses a scanned string into a typed payload.
///
/// Never errors; callers treat [`QrScan::Unknown`] as a no-op scan.
pub fn parse(raw: &str) -> QrScan {
    match serde_json::from_str::<AttendancePayload>(raw) {
        Ok(payload) if payload.kind == ATTENDANCE_TYPE => QrScan::Attendance(payload),
        Ok(payload) => {
            tracing::debug!(kind = %payload.kind, "scanned payload with foreign type tag");
            QrScan::Unknown
        }
        Err(_) => QrScan::Unknown,
    }
}

/// Generates a scannable image and its JSON payload for a student.
pub fn generate(
    codec: &dyn QrImageCodec,
    student_id: &str,
    school_id: &str,
    sequence: u64,
) -> (QrImage, String) {
    let payload = AttendancePayload::new(student_id, school_id, sequence);
    let json = payload.to_json();
    let image = codec.encode(&json);
    (image, json)
}

// =============================================================================
// QrImageCodec
// =============================================================================

/// A rendered QR image handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// MIME type of the rendered image.
    pub mime: &'static str,
}

/// Collaborator contract for rendering payload text into a QR image.
///
/// The underlying image library is out of scope for this core; deployments
/// plug in a real renderer, tests and the CLI use [`TextQrCodec`].
pub trait QrImageCodec: Send + Sync {
    /// Renders payload text into an image.
    fn encode(&self, payload: &str) -> QrImage;
}

/// A pass-through codec that carries the payload text as the image body.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextQrCodec;

impl QrImageCodec for TextQrCodec {
    fn encode(&self, payload: &str) -> QrImage {
        QrImage {
            data: payload.as_bytes().to_vec(),
            mime: "text/plain",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_exact() {
        let (_, json) = generate(&TextQrCodec, "st-42", "s1", 7);

        match parse(&json) {
            QrScan::Attendance(payload) => {
                assert_eq!(payload.student_id, "st-42");
                assert_eq!(payload.school_id, "s1");
                assert_eq!(payload.sequence, 7);
                assert_eq!(payload.kind, ATTENDANCE_TYPE);
            }
            QrScan::Unknown => panic!("round trip lost the payload"),
        }
    }

    #[test]
    fn test_parse_not_json() {
        assert_eq!(parse("not json"), QrScan::Unknown);
        assert_eq!(parse(""), QrScan::Unknown);
    }

    #[test]
    fn test_parse_foreign_json() {
        assert_eq!(parse(r#"{"hello": "world"}"#), QrScan::Unknown);
        assert_eq!(
            parse(r#"{"type": "ticket", "student_id": "a", "school_id": "b", "sequence": 1}"#),
            QrScan::Unknown
        );
    }

    #[test]
    fn test_text_codec_carries_payload() {
        let (image, json) = generate(&TextQrCodec, "st-1", "s1", 1);
        assert_eq!(image.data, json.as_bytes());
        assert_eq!(image.mime, "text/plain");
    }
}
