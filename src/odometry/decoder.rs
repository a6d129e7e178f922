// Encoder line decoding
//
// Wire format: comma-separated fields, each a marker ("L:" or "R:")
// followed by a signed base-10 tick count. Field order is not
// significant and unrecognized fields are ignored.
// Example: "L: -1 , R: 3"

use thiserror::Error;

const LEFT_MARKER: &str = "L:";
const RIGHT_MARKER: &str = "R:";

/// One decoded encoder reading (absolute tick counts).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncoderSample {
    pub left_ticks: i32,
    pub right_ticks: i32,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("encoder field {field:?} has a malformed tick count")]
    MalformedField { field: String },

    #[error("record is missing the {wheel} wheel field")]
    MissingWheel { wheel: &'static str },

    #[error("record carries no encoder fields")]
    NoEncoderFields,
}

/// Decode one text record into an encoder sample.
///
/// A record with a recognizable marker but an unparsable tick count is
/// rejected as a whole; corrupted counts must never reach the
/// integrator. Likewise a record carrying only one wheel is rejected,
/// since the counts are absolute and a defaulted side would show up as
/// a full-scale delta.
pub fn decode_line(line: &str) -> Result<EncoderSample, DecodeError> {
    let mut left = None;
    let mut right = None;

    for field in line.split(',') {
        let field = field.trim();
        if let Some(rest) = field.strip_prefix(LEFT_MARKER) {
            left = Some(parse_ticks(field, rest)?);
        } else if let Some(rest) = field.strip_prefix(RIGHT_MARKER) {
            right = Some(parse_ticks(field, rest)?);
        }
    }

    match (left, right) {
        (Some(left_ticks), Some(right_ticks)) => Ok(EncoderSample {
            left_ticks,
            right_ticks,
        }),
        (None, None) => Err(DecodeError::NoEncoderFields),
        (None, Some(_)) => Err(DecodeError::MissingWheel { wheel: "left" }),
        (Some(_), None) => Err(DecodeError::MissingWheel { wheel: "right" }),
    }
}

fn parse_ticks(field: &str, rest: &str) -> Result<i32, DecodeError> {
    rest.trim().parse().map_err(|_| DecodeError::MalformedField {
        field: field.to_string(),
    })
}
