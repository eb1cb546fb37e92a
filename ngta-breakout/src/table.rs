//! Breakout table view models.
//!
//! [`build_table`] filters a snapshot down to the instruments breaking out on one timeframe,
//! orders them by momentum and turns each into a render-ready [`BreakoutRow`]. It is a pure
//! function of its inputs, so the console can call it on every refresh tick and on every
//! filter or sort change.

use crate::{
    breakout::{Direction, classify},
    calc::{format_level, format_signed_pct, pivot_distance_pct},
    snapshot::{Instrument, Snapshot},
    timeframe::{Timeframe, TimeframeConfig},
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;

/// Fixed label shown on every breakout badge.
pub const BADGE_LABEL: &str = "Breakout";

/// Strength score above which a row is flagged as high volume/strength.
pub const HIGH_STRENGTH_SCORE: f64 = 70.0;

/// Which breakout directions a table shows.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize, Serialize)]
pub enum DirectionFilter {
    #[default]
    All,
    Bullish,
    Bearish,
}

impl DirectionFilter {
    /// Filters in toggle order.
    pub const ALL: [DirectionFilter; 3] = [
        DirectionFilter::All,
        DirectionFilter::Bullish,
        DirectionFilter::Bearish,
    ];

    pub fn matches(&self, direction: Direction) -> bool {
        match self {
            DirectionFilter::All => true,
            DirectionFilter::Bullish => direction == Direction::Bullish,
            DirectionFilter::Bearish => direction == Direction::Bearish,
        }
    }

    /// Label of the filter toggle button.
    pub fn label(&self) -> &'static str {
        match self {
            DirectionFilter::All => "All",
            DirectionFilter::Bullish => "Bullish",
            DirectionFilter::Bearish => "Negative",
        }
    }

    /// Next filter in toggle order, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            DirectionFilter::All => DirectionFilter::Bullish,
            DirectionFilter::Bullish => DirectionFilter::Bearish,
            DirectionFilter::Bearish => DirectionFilter::All,
        }
    }
}

/// Momentum ordering of a table's rows.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize, Serialize)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

impl SortOrder {
    pub fn toggle(&self) -> Self {
        match self {
            SortOrder::Descending => SortOrder::Ascending,
            SortOrder::Ascending => SortOrder::Descending,
        }
    }

    fn compare(&self, a: f64, b: f64) -> Ordering {
        match self {
            SortOrder::Descending => b.total_cmp(&a),
            SortOrder::Ascending => a.total_cmp(&b),
        }
    }
}

/// UI state owned by a single breakout table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize, Serialize)]
pub struct TableState {
    pub filter: DirectionFilter,
    pub sort: SortOrder,
}

impl TableState {
    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggle();
    }

    pub fn set_filter(&mut self, filter: DirectionFilter) {
        self.filter = filter;
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
    }
}

/// Direction badge of a breakout row.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct BreakoutBadge {
    pub direction: Direction,
    pub label: &'static str,
}

impl BreakoutBadge {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            label: BADGE_LABEL,
        }
    }
}

impl std::fmt::Display for BreakoutBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.direction.glyph(), self.label)
    }
}

/// Render-ready row of a breakout table.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct BreakoutRow {
    pub token: SmolStr,
    pub symbol: SmolStr,
    pub last_price: f64,
    pub change_pct: f64,
    pub badge: BreakoutBadge,
    /// Timeframe high for Bullish rows, timeframe low for Bearish rows.
    pub pivot_level: Option<f64>,
    /// eg/ "Breaks above 95.00".
    pub pivot_phrase: String,
    pub pivot_distance_pct: f64,
    /// eg/ "+5.26%".
    pub pivot_distance_label: String,
    /// `strength_score > HIGH_STRENGTH_SCORE`.
    pub high_strength: bool,
}

impl BreakoutRow {
    fn new(instrument: &Instrument, direction: Direction, pivot_level: Option<f64>) -> Self {
        let pivot_distance_pct = pivot_distance_pct(instrument.last_price, pivot_level);

        Self {
            token: instrument.token.clone(),
            symbol: instrument.symbol.clone(),
            last_price: instrument.last_price,
            change_pct: instrument.change_pct,
            badge: BreakoutBadge::new(direction),
            pivot_level,
            pivot_phrase: format!(
                "Breaks {} {}",
                direction.comparison(),
                format_level(pivot_level)
            ),
            pivot_distance_pct,
            pivot_distance_label: format_signed_pct(pivot_distance_pct),
            high_strength: instrument.strength_score > HIGH_STRENGTH_SCORE,
        }
    }

    pub fn direction(&self) -> Direction {
        self.badge.direction
    }
}

/// Ordered, filtered rows of one breakout table.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct TableView {
    pub timeframe: Timeframe,
    pub title: &'static str,
    pub description: &'static str,
    pub filter: DirectionFilter,
    pub sort: SortOrder,
    pub rows: Vec<BreakoutRow>,
}

impl TableView {
    /// `true` when no instrument matched, in which case [`Self::empty_message`] is shown.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// One-line "none found" message, eg/ "No Bullish 10-Day Breakouts detected."
    pub fn empty_message(&self) -> String {
        match self.filter {
            DirectionFilter::All => format!("No {} detected.", self.title),
            DirectionFilter::Bullish => format!("No Bullish {} detected.", self.title),
            DirectionFilter::Bearish => format!("No Bearish {} detected.", self.title),
        }
    }
}

/// Build the rows of one breakout table.
///
/// An instrument is included iff it classifies as a breakout on `config`'s timeframe and its
/// direction passes `filter`. Rows are ordered by `change_pct` per `sort`; equal changes keep
/// their input order.
pub fn build_table(
    instruments: &[Instrument],
    config: &TimeframeConfig,
    filter: DirectionFilter,
    sort: SortOrder,
) -> TableView {
    let rows = instruments
        .iter()
        .filter_map(|instrument| {
            let classification = classify(instrument, config);
            let direction = classification.direction()?;
            filter
                .matches(direction)
                .then(|| BreakoutRow::new(instrument, direction, classification.pivot))
        })
        .sorted_by(|a, b| sort.compare(a.change_pct, b.change_pct))
        .collect();

    TableView {
        timeframe: config.timeframe,
        title: config.title,
        description: config.description,
        filter,
        sort,
        rows,
    }
}

/// A breakout table bound to one timeframe, owning its own [`TableState`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct BreakoutTable {
    config: &'static TimeframeConfig,
    pub state: TableState,
}

impl BreakoutTable {
    pub fn new(config: &'static TimeframeConfig) -> Self {
        Self {
            config,
            state: TableState::default(),
        }
    }

    pub fn config(&self) -> &'static TimeframeConfig {
        self.config
    }

    pub fn view(&self, snapshot: &Snapshot) -> TableView {
        build_table(
            snapshot.instruments(),
            self.config,
            self.state.filter,
            self.state.sort,
        )
    }
}
