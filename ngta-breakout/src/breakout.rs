use crate::{snapshot::Instrument, timeframe::TimeframeConfig};
use serde::{Deserialize, Serialize};

/// Tag every breakout verdict string carries, eg/ "Bullish Breakout".
pub const BREAKOUT_TAG: &str = "Breakout";

/// Marker that makes a breakout verdict Bullish. Any other breakout verdict is Bearish.
pub const BULLISH_MARKER: &str = "Bullish";

/// Direction of a breakout.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Deserialize, Serialize)]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Bullish => "Bullish",
            Direction::Bearish => "Bearish",
        }
    }

    /// Arrow glyph shown on the breakout badge.
    pub fn glyph(&self) -> &'static str {
        match self {
            Direction::Bullish => "▲",
            Direction::Bearish => "▼",
        }
    }

    /// Comparison word used in the "Breaks above/below X" phrase.
    pub fn comparison(&self) -> &'static str {
        match self {
            Direction::Bullish => "above",
            Direction::Bearish => "below",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Breakout verdict for one instrument and timeframe, decoded once at the snapshot boundary.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize, Serialize)]
pub enum BreakoutSignal {
    #[default]
    NoBreakout,
    Bullish,
    Bearish,
}

impl BreakoutSignal {
    /// Decode a raw verdict string reported by the market data service.
    ///
    /// An absent verdict, or one without the [`BREAKOUT_TAG`] (eg/ "Consolidating"), is
    /// [`BreakoutSignal::NoBreakout`]. Otherwise the verdict is Bullish iff it contains the
    /// [`BULLISH_MARKER`], else Bearish.
    pub fn decode(verdict: Option<&str>) -> Self {
        match verdict {
            Some(verdict) if verdict.contains(BREAKOUT_TAG) => {
                if verdict.contains(BULLISH_MARKER) {
                    BreakoutSignal::Bullish
                } else {
                    BreakoutSignal::Bearish
                }
            }
            _ => BreakoutSignal::NoBreakout,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            BreakoutSignal::NoBreakout => None,
            BreakoutSignal::Bullish => Some(Direction::Bullish),
            BreakoutSignal::Bearish => Some(Direction::Bearish),
        }
    }

    pub fn is_breakout(&self) -> bool {
        !matches!(self, BreakoutSignal::NoBreakout)
    }
}

/// Classifier output: the breakout verdict plus the pivot level relevant to it.
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize)]
pub struct Classification {
    pub signal: BreakoutSignal,
    /// Timeframe high for a Bullish breakout, timeframe low for a Bearish one. `None` when
    /// there is no breakout or the service did not report the level.
    pub pivot: Option<f64>,
}

impl Classification {
    pub fn direction(&self) -> Option<Direction> {
        self.signal.direction()
    }
}

/// Classify an [`Instrument`] for one timeframe.
///
/// Direction is taken solely from the decoded verdict; neither price relative to the level
/// nor the sign of the day's change can override it.
pub fn classify(instrument: &Instrument, config: &TimeframeConfig) -> Classification {
    let stats = instrument.timeframe(config.timeframe);

    let pivot = match stats.signal {
        BreakoutSignal::NoBreakout => None,
        BreakoutSignal::Bullish => stats.high,
        BreakoutSignal::Bearish => stats.low,
    };

    Classification {
        signal: stats.signal,
        pivot,
    }
}
