//! # Telemetry Line Decoder
//!
//! Decodes one raw ASCII line into tagged fields.

use super::protocol::*;

/// Check a raw line against the structural pre-filter
///
/// Truncated or garbled serial frames are rejected before field decoding:
/// the line must be between [`MIN_LINE_LEN`] and [`MAX_LINE_LEN`] characters
/// and start with the frame marker `S`.
///
/// # Arguments
///
/// * `line` - Raw line with the newline already stripped
///
/// # Returns
///
/// * `bool` - True if the line is structurally plausible
pub fn prefilter(line: &str) -> bool {
    let len = line.chars().count();
    len >= MIN_LINE_LEN && len <= MAX_LINE_LEN && line.starts_with(FRAME_MARKER)
}

/// Decode one raw telemetry line into named fields
///
/// The line is split on commas; each token must be a single-letter key
/// followed by a signed integer payload, e.g. `V4106` or `r-58`. The key is
/// looked up in the static field table:
///
/// | Key | Field                 | Transform        |
/// |-----|-----------------------|------------------|
/// | `V` | battery_voltage       | mV → V (÷ 1000)  |
/// | `s` | solar_voltage         | mV → V (÷ 1000)  |
/// | `S` | sensor_id             | as-is            |
/// | `C` | msg_count             | as-is            |
/// | `U` | ultrasonic_range      | as-is            |
/// | `r` | rssi                  | as-is (signed)   |
/// | `n` | signal_to_noise_ratio | as-is            |
///
/// Unrecognized keys and malformed payloads are skipped silently; a
/// duplicated key keeps its last occurrence. A line failing the structural
/// pre-filter decodes to no fields at all.
///
/// Pure function of its input: no side effects, deterministic.
///
/// # Arguments
///
/// * `line` - Raw line with the newline already stripped
///
/// # Returns
///
/// * `DecodedFields` - Fields present only where decoding succeeded
///
/// # Examples
///
/// ```
/// use solar_telemetry::frame::decoder::decode_line;
///
/// let fields = decode_line("S1,V4106,C55,U841,s6835,r-58,n12");
/// assert_eq!(fields.battery_voltage, Some(4.106));
/// assert_eq!(fields.rssi, Some(-58));
/// ```
pub fn decode_line(line: &str) -> DecodedFields {
    let mut fields = DecodedFields::default();

    if !prefilter(line) {
        return fields;
    }

    for token in line.split(',') {
        if let Some((key, value)) = split_token(token) {
            apply_field(&mut fields, key, value);
        }
    }

    fields
}

/// Split one token into its key letter and integer payload
///
/// Returns `None` for empty tokens, tokens whose first character is not an
/// ASCII letter, or tokens whose payload is not a well-formed signed integer.
fn split_token(token: &str) -> Option<(char, i64)> {
    let mut chars = token.chars();
    let key = chars.next()?;

    if !key.is_ascii_alphabetic() {
        return None;
    }

    let value: i64 = chars.as_str().parse().ok()?;
    Some((key, value))
}

/// Static key table: assign one decoded value to its field
///
/// Last occurrence wins by construction, since tokens are applied in line
/// order. Unknown keys fall through.
fn apply_field(fields: &mut DecodedFields, key: char, value: i64) {
    match key {
        'V' => fields.battery_voltage = Some(value as f64 / MILLIVOLTS_PER_VOLT),
        's' => fields.solar_voltage = Some(value as f64 / MILLIVOLTS_PER_VOLT),
        'S' => fields.sensor_id = Some(value),
        'C' => fields.msg_count = Some(value),
        'U' => fields.ultrasonic_range = Some(value),
        'r' => fields.rssi = Some(value),
        'n' => fields.signal_to_noise_ratio = Some(value),
        _ => {}
    }
}
