//! Instrument snapshot model and the decoding contract for `/god-mode` payloads.
//!
//! Raw records are decoded exactly once here: verdict strings become [`BreakoutSignal`]s and
//! reference levels become `Option<f64>`s. Everything downstream works on the decoded model.

use crate::{
    breakout::BreakoutSignal,
    error::SnapshotError,
    timeframe::{TIMEFRAMES, Timeframe, TimeframeConfig},
};
use chrono::{DateTime, Utc};
use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smol_str::{SmolStr, ToSmolStr};
use tracing::{debug, warn};

/// Decoded breakout verdict and reference levels of one instrument for one timeframe.
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize)]
pub struct TimeframeStats {
    pub signal: BreakoutSignal,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

impl TimeframeStats {
    pub fn new(signal: BreakoutSignal, high: Option<f64>, low: Option<f64>) -> Self {
        Self { signal, high, low }
    }

    /// Decode the verdict and levels named by `config` from a raw record's fields.
    ///
    /// A verdict that is not a string decodes as absent. Levels that are null, non-numeric
    /// or non-finite decode as `None`; numeric strings are accepted.
    pub fn decode(fields: &Map<String, Value>, config: &TimeframeConfig) -> Self {
        let level = |field: &str| {
            fields
                .get(field)
                .and_then(|value| match value {
                    Value::String(text) => text.trim().parse::<f64>().ok(),
                    other => other.as_f64(),
                })
                .filter(|level| level.is_finite())
        };

        Self {
            signal: BreakoutSignal::decode(
                fields.get(config.verdict_field).and_then(Value::as_str),
            ),
            high: level(config.high_field),
            low: level(config.low_field),
        }
    }
}

/// One tradable instrument at a point in time.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Instrument {
    /// Stable key, unique within a [`Snapshot`].
    pub token: SmolStr,
    /// Display symbol only, not assumed unique across snapshots.
    pub symbol: SmolStr,
    pub last_price: f64,
    /// Signed percentage change versus the reference close.
    pub change_pct: f64,
    /// Bounded strength indicator (0-100), used for display hints only.
    pub strength_score: f64,
    timeframes: [TimeframeStats; Timeframe::COUNT],
}

impl Instrument {
    /// Construct an [`Instrument`] with no breakouts and a zero strength score.
    pub fn new(
        token: impl Into<SmolStr>,
        symbol: impl Into<SmolStr>,
        last_price: f64,
        change_pct: f64,
    ) -> Self {
        Self {
            token: token.into(),
            symbol: symbol.into(),
            last_price,
            change_pct,
            strength_score: 0.0,
            timeframes: Default::default(),
        }
    }

    pub fn with_strength_score(mut self, strength_score: f64) -> Self {
        self.strength_score = strength_score;
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe, stats: TimeframeStats) -> Self {
        self.timeframes[timeframe.index()] = stats;
        self
    }

    pub fn timeframe(&self, timeframe: Timeframe) -> &TimeframeStats {
        &self.timeframes[timeframe.index()]
    }

    /// Decode a raw `/god-mode` record.
    pub fn from_record(record: Value) -> Result<Self, String> {
        let raw = serde_json::from_value::<RawInstrument>(record)
            .map_err(|error| error.to_string())?;

        let last_price = match raw.ltp.as_f64() {
            Some(ltp) if ltp.is_finite() && ltp > 0.0 => ltp,
            _ => return Err(format!("invalid ltp {} for {}", raw.ltp, raw.symbol)),
        };

        let mut timeframes = <[TimeframeStats; Timeframe::COUNT]>::default();
        for config in TIMEFRAMES.iter() {
            timeframes[config.timeframe.index()] = TimeframeStats::decode(&raw.fields, config);
        }

        Ok(Self {
            token: raw.token.into_smol_str(),
            symbol: raw.symbol,
            last_price,
            change_pct: finite_or_zero(raw.change_pct.and_then(|value| value.as_f64())),
            strength_score: finite_or_zero(raw.strength_score.and_then(|value| value.as_f64())),
            timeframes,
        })
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|value| value.is_finite()).unwrap_or(0.0)
}

/// Instrument record as emitted by the market data service.
#[derive(Debug, Deserialize)]
struct RawInstrument {
    token: RawToken,
    symbol: SmolStr,
    ltp: RawNumber,
    #[serde(default)]
    change_pct: Option<RawNumber>,
    #[serde(default)]
    strength_score: Option<RawNumber>,
    /// Per-timeframe verdicts and levels, plus indicator fields the console ignores.
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// Instrument tokens are usually strings, but some feeds emit them as bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawToken {
    Text(SmolStr),
    Number(serde_json::Number),
}

/// Prices and scores are numbers, but some feeds quote them as strings, eg/ `"12.5"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(SmolStr),
}

impl RawNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            RawNumber::Number(value) => Some(*value),
            RawNumber::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }
}

impl std::fmt::Display for RawNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawNumber::Number(value) => write!(f, "{value}"),
            RawNumber::Text(text) => write!(f, "{text:?}"),
        }
    }
}

impl RawToken {
    fn into_smol_str(self) -> SmolStr {
        match self {
            RawToken::Text(token) => token,
            RawToken::Number(token) => token.to_smolstr(),
        }
    }
}

/// Background scanner state reported alongside a snapshot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize, Serialize)]
pub enum ScannerStatus {
    Running,
    Stopped,
    #[default]
    Unknown,
}

impl ScannerStatus {
    fn decode(status: Option<&str>) -> Self {
        match status {
            Some(status) if status.eq_ignore_ascii_case("running") => ScannerStatus::Running,
            Some(status) if status.eq_ignore_ascii_case("stopped") => ScannerStatus::Stopped,
            _ => ScannerStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScannerStatus::Running => "Running",
            ScannerStatus::Stopped => "Stopped",
            ScannerStatus::Unknown => "Unknown",
        }
    }
}

/// Envelope returned by `GET /god-mode`.
#[derive(Debug, Deserialize)]
struct GodModeResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    scanner_status: Option<String>,
}

/// One complete, immutable batch of instruments at a point in time.
///
/// Each refresh replaces the whole [`Snapshot`]; it is never patched in place.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Snapshot {
    instruments: Vec<Instrument>,
    scanner_status: ScannerStatus,
    received_at: DateTime<Utc>,
}

impl Snapshot {
    /// Construct a [`Snapshot`], keeping the first [`Instrument`] seen for each token.
    pub fn new(instruments: Vec<Instrument>, received_at: DateTime<Utc>) -> Self {
        let mut seen = FnvHashSet::default();
        let instruments = instruments
            .into_iter()
            .filter(|instrument| {
                let unique = seen.insert(instrument.token.clone());
                if !unique {
                    warn!(
                        token = %instrument.token,
                        symbol = %instrument.symbol,
                        "dropping instrument with duplicate token"
                    );
                }
                unique
            })
            .collect();

        Self {
            instruments,
            scanner_status: ScannerStatus::Unknown,
            received_at,
        }
    }

    pub fn with_scanner_status(mut self, scanner_status: ScannerStatus) -> Self {
        self.scanner_status = scanner_status;
        self
    }

    /// Decode a `/god-mode` response body into a [`Snapshot`].
    ///
    /// Any record that fails to decode fails the whole payload, so callers never observe a
    /// partial snapshot.
    pub fn from_json(payload: &str, received_at: DateTime<Utc>) -> Result<Self, SnapshotError> {
        let response = serde_json::from_str::<GodModeResponse>(payload)?;

        if response.status != "success" {
            return Err(SnapshotError::Rejected {
                status: response.status,
                message: response.message,
            });
        }

        let instruments = response
            .data
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                Instrument::from_record(record)
                    .map_err(|reason| SnapshotError::Record { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(instruments = instruments.len(), "decoded snapshot payload");

        Ok(Self::new(instruments, received_at)
            .with_scanner_status(ScannerStatus::decode(response.scanner_status.as_deref())))
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn get(&self, token: &str) -> Option<&Instrument> {
        self.instruments
            .iter()
            .find(|instrument| instrument.token == token)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn scanner_status(&self) -> ScannerStatus {
        self.scanner_status
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn received_at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_734_000_000, 0).unwrap()
    }

    #[test]
    fn test_instrument_from_record() {
        let record = json!({
            "symbol": "SBIN",
            "token": "3045",
            "ltp": 812.4,
            "change_pct": 1.25,
            "strength_score": 75.0,
            "rsi": 61.2,
            "sentiment": "Bullish",
            "breakout_1d": "Consolidating",
            "breakout_10d": "Bullish Breakout",
            "high_10d": 805.0,
            "low_10d": 770.5,
            "breakout_52w": "Bearish Breakout",
            "high_52w": null,
            "low_52w": 830.0,
        });

        let instrument = Instrument::from_record(record).unwrap();

        assert_eq!(instrument.token, "3045");
        assert_eq!(instrument.symbol, "SBIN");
        assert_eq!(instrument.last_price, 812.4);
        assert_eq!(instrument.change_pct, 1.25);
        assert_eq!(instrument.strength_score, 75.0);
        assert_eq!(
            *instrument.timeframe(Timeframe::Day1),
            TimeframeStats::new(BreakoutSignal::NoBreakout, None, None)
        );
        assert_eq!(
            *instrument.timeframe(Timeframe::Day10),
            TimeframeStats::new(BreakoutSignal::Bullish, Some(805.0), Some(770.5))
        );
        assert_eq!(
            *instrument.timeframe(Timeframe::Week52),
            TimeframeStats::new(BreakoutSignal::Bearish, None, Some(830.0))
        );
        assert_eq!(
            instrument.timeframe(Timeframe::Day30).signal,
            BreakoutSignal::NoBreakout
        );
    }

    #[test]
    fn test_instrument_from_record_edge_cases() {
        struct TestCase {
            input: Value,
            expected: Result<(SmolStr, f64, f64), ()>,
        }

        let tests = vec![
            TestCase {
                // TC0: numeric token and missing change/strength
                input: json!({"symbol": "NIFTY", "token": 99926000, "ltp": 24000.5}),
                expected: Ok((SmolStr::new("99926000"), 0.0, 0.0)),
            },
            TestCase {
                // TC1: null change and strength
                input: json!({
                    "symbol": "TCS", "token": "11536", "ltp": 4100.0,
                    "change_pct": null, "strength_score": null
                }),
                expected: Ok((SmolStr::new("11536"), 0.0, 0.0)),
            },
            TestCase {
                // TC2: missing ltp
                input: json!({"symbol": "INFY", "token": "1594"}),
                expected: Err(()),
            },
            TestCase {
                // TC3: zero ltp
                input: json!({"symbol": "INFY", "token": "1594", "ltp": 0.0}),
                expected: Err(()),
            },
            TestCase {
                // TC4: missing symbol
                input: json!({"token": "1594", "ltp": 1500.0}),
                expected: Err(()),
            },
            TestCase {
                // TC5: quoted change and strength
                input: json!({
                    "symbol": "SBIN", "token": "3045", "ltp": "812.5",
                    "change_pct": " -1.25 ", "strength_score": "64"
                }),
                expected: Ok((SmolStr::new("3045"), -1.25, 64.0)),
            },
            TestCase {
                // TC6: quoted ltp that is not a number
                input: json!({"symbol": "SBIN", "token": "3045", "ltp": "n/a"}),
                expected: Err(()),
            },
            TestCase {
                // TC7: unparsable change falls back to zero
                input: json!({
                    "symbol": "SBIN", "token": "3045", "ltp": 812.5, "change_pct": "--"
                }),
                expected: Ok((SmolStr::new("3045"), 0.0, 0.0)),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = Instrument::from_record(test.input)
                .map(|instrument| {
                    (
                        instrument.token,
                        instrument.change_pct,
                        instrument.strength_score,
                    )
                })
                .map_err(|_| ());
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_timeframe_stats_decode_tolerates_bad_levels() {
        let fields = json!({
            "breakout_30d": 42,
            "high_30d": "n/a",
            "low_30d": null,
        });
        let Value::Object(fields) = fields else {
            unreachable!()
        };

        let actual = TimeframeStats::decode(&fields, Timeframe::Day30.config());
        assert_eq!(actual, TimeframeStats::default());
    }

    #[test]
    fn test_timeframe_stats_decode_quoted_levels() {
        let fields = json!({
            "breakout_30d": "Bullish Breakout",
            "high_30d": "812.0",
            "low_30d": 790.5,
        });
        let Value::Object(fields) = fields else {
            unreachable!()
        };

        let actual = TimeframeStats::decode(&fields, Timeframe::Day30.config());
        let expected = TimeframeStats::new(BreakoutSignal::Bullish, Some(812.0), Some(790.5));
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_snapshot_from_json_accepts_quoted_prices() {
        let payload = json!({
            "status": "success",
            "data": [
                {"symbol": "ABC", "token": "1", "ltp": 100.0, "change_pct": 5.0},
                {"symbol": "DEF", "token": "2", "ltp": "12.5", "change_pct": "-0.8"},
            ],
        })
        .to_string();

        let snapshot = Snapshot::from_json(&payload, received_at()).unwrap();

        let def = snapshot.get("2").unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(def.last_price, 12.5);
        assert_eq!(def.change_pct, -0.8);
    }

    #[test]
    fn test_snapshot_new_drops_duplicate_tokens() {
        let snapshot = Snapshot::new(
            vec![
                Instrument::new("1", "ABC", 100.0, 1.0),
                Instrument::new("2", "DEF", 50.0, -1.0),
                Instrument::new("1", "ABC-OLD", 99.0, 0.5),
            ],
            received_at(),
        );

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("1").map(|i| i.symbol.as_str()), Some("ABC"));
        assert_eq!(snapshot.get("2").map(|i| i.symbol.as_str()), Some("DEF"));
        assert!(snapshot.get("3").is_none());
    }

    #[test]
    fn test_snapshot_from_json() {
        let payload = json!({
            "status": "success",
            "count": 2,
            "scanner_status": "Running",
            "debug_cache_len": 2,
            "data": [
                {"symbol": "ABC", "token": "1", "ltp": 100.0, "change_pct": 5.0,
                 "strength_score": 80.0, "breakout_10d": "Bullish Breakout", "high_10d": 95.0},
                {"symbol": "DEF", "token": "2", "ltp": 40.0, "change_pct": -3.0,
                 "strength_score": 20.0},
            ]
        })
        .to_string();

        let snapshot = Snapshot::from_json(&payload, received_at()).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.scanner_status(), ScannerStatus::Running);
        assert_eq!(snapshot.received_at(), received_at());
        assert_eq!(snapshot.instruments()[0].symbol, "ABC");
        assert_eq!(snapshot.instruments()[1].symbol, "DEF");
    }

    #[test]
    fn test_snapshot_from_json_errors() {
        struct TestCase {
            input: String,
            expected: SnapshotError,
        }

        let tests = vec![
            TestCase {
                // TC0: upstream error envelope
                input: json!({"status": "error", "message": "Invalid Token"}).to_string(),
                expected: SnapshotError::Rejected {
                    status: "error".to_string(),
                    message: Some("Invalid Token".to_string()),
                },
            },
            TestCase {
                // TC1: one undecodable record fails the whole payload
                input: json!({
                    "status": "success",
                    "data": [
                        {"symbol": "ABC", "token": "1", "ltp": 100.0},
                        {"symbol": "DEF", "token": "2"},
                    ]
                })
                .to_string(),
                expected: SnapshotError::Record {
                    index: 1,
                    reason: String::new(),
                },
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = Snapshot::from_json(&test.input, received_at()).unwrap_err();
            match (&actual, &test.expected) {
                (
                    SnapshotError::Record { index: actual, .. },
                    SnapshotError::Record { index: expected, .. },
                ) => assert_eq!(actual, expected, "TC{} failed", index),
                _ => assert_eq!(actual, test.expected, "TC{} failed", index),
            }
        }

        assert!(matches!(
            Snapshot::from_json("<html>502 Bad Gateway</html>", received_at()),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn test_snapshot_from_json_empty_data() {
        let payload = json!({"status": "success", "data": [], "scanner_status": "Stopped"});
        let snapshot = Snapshot::from_json(&payload.to_string(), received_at()).unwrap();

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.scanner_status(), ScannerStatus::Stopped);
    }
}
