//! # Line Protocol Constants and Types
//!
//! Core definitions for the sensor node's tagged-field line protocol.
//!
//! A raw line is a comma-separated list of `<letter><integer>` pairs, e.g.
//! `S1,V4106,C55,U841,s6835,r-58,n12`. Voltages arrive in millivolts and are
//! converted to volts at decode time.

use chrono::NaiveDateTime;

/// Frame marker: every valid line starts with the sensor-id field
pub const FRAME_MARKER: char = 'S';

/// Minimum plausible line length (shorter lines are truncated frames)
pub const MIN_LINE_LEN: usize = 10;

/// Maximum plausible line length (longer lines are garbled frames)
pub const MAX_LINE_LEN: usize = 40;

/// Millivolts per volt, for the V and s field conversions
pub const MILLIVOLTS_PER_VOLT: f64 = 1000.0;

/// Which subset of decoded fields is required to materialize a sample.
///
/// The node firmware emits one of two message formats; the format is fixed
/// per deployment and never auto-detected, since the structural pre-filter
/// cannot reliably tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// Battery and solar voltage only
    Basic,

    /// Battery, solar, ultrasonic range and RSSI
    Extended,
}

/// Fields decoded from one raw line.
///
/// Every field is optional: a field is present only when its key appeared in
/// the line with a well-formed integer payload. Which fields are *required*
/// is the caller's decision, via [`Schema`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DecodedFields {
    /// Battery voltage in volts (key `V`, sent as millivolts)
    pub battery_voltage: Option<f64>,

    /// Solar panel voltage in volts (key `s`, sent as millivolts)
    pub solar_voltage: Option<f64>,

    /// Sensor node identifier (key `S`)
    pub sensor_id: Option<i64>,

    /// Message counter since node boot (key `C`)
    pub msg_count: Option<i64>,

    /// Ultrasonic range in raw sensor units (key `U`)
    pub ultrasonic_range: Option<i64>,

    /// Received signal strength in dBm, usually negative (key `r`)
    pub rssi: Option<i64>,

    /// Signal-to-noise ratio in dB (key `n`)
    pub signal_to_noise_ratio: Option<i64>,
}

impl DecodedFields {
    /// True if no field decoded at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One decoded telemetry reading.
///
/// Materialized only when every field required by the active [`Schema`]
/// decoded successfully; immutable afterwards. The timestamp is assigned at
/// decode time, not carried in the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    /// Local wall-clock time at decode
    pub timestamp: NaiveDateTime,

    /// Battery voltage in volts
    pub battery_voltage: f64,

    /// Solar panel voltage in volts
    pub solar_voltage: f64,

    /// Ultrasonic range in raw sensor units (extended schema only)
    pub ultrasonic_range: Option<i64>,

    /// RSSI in dBm (extended schema only)
    pub rssi: Option<i64>,

    /// Sensor node identifier, when present in the line
    pub sensor_id: Option<i64>,

    /// Message counter, when present in the line
    pub msg_count: Option<i64>,

    /// Signal-to-noise ratio, when present in the line
    pub signal_to_noise_ratio: Option<i64>,
}

impl TelemetrySample {
    /// Materialize a sample from decoded fields against a schema
    ///
    /// # Arguments
    ///
    /// * `fields` - Output of the line decoder
    /// * `schema` - Active message schema for this session
    /// * `timestamp` - Decode-time wall clock
    ///
    /// # Returns
    ///
    /// * `Option<TelemetrySample>` - `None` if any required field is absent
    pub fn from_fields(
        fields: &DecodedFields,
        schema: Schema,
        timestamp: NaiveDateTime,
    ) -> Option<Self> {
        let battery_voltage = fields.battery_voltage?;
        let solar_voltage = fields.solar_voltage?;

        let (ultrasonic_range, rssi) = match schema {
            Schema::Basic => (fields.ultrasonic_range, fields.rssi),
            Schema::Extended => (Some(fields.ultrasonic_range?), Some(fields.rssi?)),
        };

        Some(Self {
            timestamp,
            battery_voltage,
            solar_voltage,
            ultrasonic_range,
            rssi,
            sensor_id: fields.sensor_id,
            msg_count: fields.msg_count,
            signal_to_noise_ratio: fields.signal_to_noise_ratio,
        })
    }
}
