use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Breakout window the market data service reports a verdict for.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Deserialize, Serialize,
)]
pub enum Timeframe {
    #[display("1d")]
    #[serde(rename = "1d")]
    Day1,
    #[display("10d")]
    #[serde(rename = "10d")]
    Day10,
    #[display("30d")]
    #[serde(rename = "30d")]
    Day30,
    #[display("50d")]
    #[serde(rename = "50d")]
    Day50,
    #[display("100d")]
    #[serde(rename = "100d")]
    Day100,
    #[display("52w")]
    #[serde(rename = "52w")]
    Week52,
}

impl Timeframe {
    /// Number of timeframes carried by every [`Instrument`](crate::snapshot::Instrument).
    pub const COUNT: usize = 6;

    /// All timeframes, shortest window first.
    pub const ALL: [Timeframe; Self::COUNT] = [
        Timeframe::Day1,
        Timeframe::Day10,
        Timeframe::Day30,
        Timeframe::Day50,
        Timeframe::Day100,
        Timeframe::Week52,
    ];

    /// Position of this timeframe in [`Timeframe::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Timeframe::Day1 => 0,
            Timeframe::Day10 => 1,
            Timeframe::Day30 => 2,
            Timeframe::Day50 => 3,
            Timeframe::Day100 => 4,
            Timeframe::Week52 => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Day1 => "1d",
            Timeframe::Day10 => "10d",
            Timeframe::Day30 => "30d",
            Timeframe::Day50 => "50d",
            Timeframe::Day100 => "100d",
            Timeframe::Week52 => "52w",
        }
    }

    /// Static [`TimeframeConfig`] describing this timeframe.
    pub fn config(&self) -> &'static TimeframeConfig {
        &TIMEFRAMES[self.index()]
    }
}

/// Console section a breakout table is grouped under.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Deserialize, Serialize)]
pub enum SectionGroup {
    /// Breaks of the previous session's high/low.
    Today,
    /// Swing and trend breakouts over multi-day windows.
    Positional,
}

impl SectionGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            SectionGroup::Today => "Today's Breakouts",
            SectionGroup::Positional => "Positional Breakouts",
        }
    }

    pub fn subheading(&self) -> &'static str {
        match self {
            SectionGroup::Today => "Breaking Prev Day High/Low",
            SectionGroup::Positional => "Swing & Trend Trading",
        }
    }
}

/// Static mapping from a breakout window to the snapshot fields that describe it, plus
/// display metadata.
///
/// The three field names must name a verdict, a high level and a low level of the same
/// window. They are only read once, when a raw snapshot record is decoded into an
/// [`Instrument`](crate::snapshot::Instrument).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct TimeframeConfig {
    pub timeframe: Timeframe,
    pub verdict_field: &'static str,
    pub high_field: &'static str,
    pub low_field: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub group: SectionGroup,
}

impl TimeframeConfig {
    /// Find the [`TimeframeConfig`] for a timeframe id such as `"10d"` or `"52w"`.
    pub fn find(id: &str) -> Option<&'static TimeframeConfig> {
        TIMEFRAMES
            .iter()
            .find(|config| config.timeframe.as_str().eq_ignore_ascii_case(id.trim()))
    }
}

/// The six breakout tables shown by the console, in display order.
pub static TIMEFRAMES: [TimeframeConfig; Timeframe::COUNT] = [
    TimeframeConfig {
        timeframe: Timeframe::Day1,
        verdict_field: "breakout_1d",
        high_field: "high_1d",
        low_field: "low_1d",
        title: "1-Day Breakouts",
        description: "Immediate Momentum (Prev Day High/Low)",
        group: SectionGroup::Today,
    },
    TimeframeConfig {
        timeframe: Timeframe::Day10,
        verdict_field: "breakout_10d",
        high_field: "high_10d",
        low_field: "low_10d",
        title: "10-Day Breakouts",
        description: "Intraday / short swing energy",
        group: SectionGroup::Positional,
    },
    TimeframeConfig {
        timeframe: Timeframe::Day30,
        verdict_field: "breakout_30d",
        high_field: "high_30d",
        low_field: "low_30d",
        title: "30-Day Breakouts",
        description: "Swing continuation",
        group: SectionGroup::Positional,
    },
    TimeframeConfig {
        timeframe: Timeframe::Day50,
        verdict_field: "breakout_50d",
        high_field: "high_50d",
        low_field: "low_50d",
        title: "50-Day Breakouts",
        description: "Trend confirmation",
        group: SectionGroup::Positional,
    },
    TimeframeConfig {
        timeframe: Timeframe::Day100,
        verdict_field: "breakout_100d",
        high_field: "high_100d",
        low_field: "low_100d",
        title: "100-Day Breakouts",
        description: "Medium-term trend shift",
        group: SectionGroup::Positional,
    },
    TimeframeConfig {
        timeframe: Timeframe::Week52,
        verdict_field: "breakout_52w",
        high_field: "high_52w",
        low_field: "low_52w",
        title: "52-Week Breakouts",
        description: "Long-term leadership",
        group: SectionGroup::Positional,
    },
];
