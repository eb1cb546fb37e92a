use crate::{
    ranker::Leaderboards,
    snapshot::Snapshot,
    table::{BreakoutTable, TableView},
    timeframe::{TIMEFRAMES, Timeframe},
};
use serde::Serialize;

/// Every view model the console renders for one snapshot.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct BoardView {
    pub leaderboards: Leaderboards,
    /// One table per timeframe, in [`TIMEFRAMES`] order.
    pub tables: Vec<TableView>,
}

/// The six breakout tables of the console, each owning its own filter and sort state, plus
/// which of them has keyboard focus.
#[derive(Clone, Debug)]
pub struct Board {
    tables: Vec<BreakoutTable>,
    focused: usize,
}

impl Board {
    pub fn new() -> Self {
        Self {
            tables: TIMEFRAMES.iter().map(BreakoutTable::new).collect(),
            focused: 0,
        }
    }

    pub fn tables(&self) -> &[BreakoutTable] {
        &self.tables
    }

    pub fn table(&self, timeframe: Timeframe) -> &BreakoutTable {
        &self.tables[timeframe.index()]
    }

    pub fn table_mut(&mut self, timeframe: Timeframe) -> &mut BreakoutTable {
        &mut self.tables[timeframe.index()]
    }

    pub fn focused(&self) -> Timeframe {
        Timeframe::ALL[self.focused]
    }

    pub fn focused_table_mut(&mut self) -> &mut BreakoutTable {
        &mut self.tables[self.focused]
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.tables.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + self.tables.len() - 1) % self.tables.len();
    }

    /// Recompute every view model from `snapshot`.
    pub fn view(&self, snapshot: &Snapshot) -> BoardView {
        BoardView {
            leaderboards: Leaderboards::from(snapshot),
            tables: self.tables.iter().map(|table| table.view(snapshot)).collect(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
