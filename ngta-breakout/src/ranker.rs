use crate::{
    calc::format_signed_pct,
    snapshot::{Instrument, Snapshot},
};
use itertools::Itertools;
use serde::Serialize;
use smol_str::SmolStr;

/// Maximum number of entries on each momentum leaderboard.
pub const LEADERBOARD_SIZE: usize = 4;

/// Strength score above which a leaderboard entry is flagged as high volume.
pub const HIGH_VOLUME_SCORE: f64 = 60.0;

/// Instruments with strictly positive change, largest first, at most [`LEADERBOARD_SIZE`].
///
/// Equal changes keep their input order.
pub fn top_gainers(instruments: &[Instrument]) -> Vec<&Instrument> {
    instruments
        .iter()
        .filter(|instrument| instrument.change_pct > 0.0)
        .sorted_by(|a, b| b.change_pct.total_cmp(&a.change_pct))
        .take(LEADERBOARD_SIZE)
        .collect()
}

/// Instruments with strictly negative change, most negative first, at most
/// [`LEADERBOARD_SIZE`].
///
/// Equal changes keep their input order.
pub fn top_losers(instruments: &[Instrument]) -> Vec<&Instrument> {
    instruments
        .iter()
        .filter(|instrument| instrument.change_pct < 0.0)
        .sorted_by(|a, b| a.change_pct.total_cmp(&b.change_pct))
        .take(LEADERBOARD_SIZE)
        .collect()
}

/// Render-ready leaderboard entry.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct LeaderRow {
    pub token: SmolStr,
    pub symbol: SmolStr,
    pub last_price: f64,
    pub change_pct: f64,
    /// "Vol: High" hint, `strength_score > HIGH_VOLUME_SCORE`.
    pub high_volume: bool,
}

impl LeaderRow {
    pub fn change_label(&self) -> String {
        format_signed_pct(self.change_pct)
    }

    pub fn volume_label(&self) -> &'static str {
        if self.high_volume { "High" } else { "Normal" }
    }
}

impl From<&Instrument> for LeaderRow {
    fn from(instrument: &Instrument) -> Self {
        Self {
            token: instrument.token.clone(),
            symbol: instrument.symbol.clone(),
            last_price: instrument.last_price,
            change_pct: instrument.change_pct,
            high_volume: instrument.strength_score > HIGH_VOLUME_SCORE,
        }
    }
}

/// Top gainers and top losers of one snapshot.
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
pub struct Leaderboards {
    pub gainers: Vec<LeaderRow>,
    pub losers: Vec<LeaderRow>,
}

impl Leaderboards {
    pub fn rank(instruments: &[Instrument]) -> Self {
        Self {
            gainers: top_gainers(instruments).into_iter().map(LeaderRow::from).collect(),
            losers: top_losers(instruments).into_iter().map(LeaderRow::from).collect(),
        }
    }
}

impl From<&Snapshot> for Leaderboards {
    fn from(snapshot: &Snapshot) -> Self {
        Self::rank(snapshot.instruments())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instrument(token: &str, change_pct: f64) -> Instrument {
        Instrument::new(token, format!("SYM{token}"), 100.0, change_pct)
    }

    fn tokens(instruments: &[&Instrument]) -> Vec<String> {
        instruments.iter().map(|i| i.token.to_string()).collect()
    }

    #[test]
    fn test_rank_one_gainer_one_loser() {
        let instruments = vec![instrument("1", 5.0), instrument("2", -3.0)];

        let leaderboards = Leaderboards::rank(&instruments);

        assert_eq!(leaderboards.gainers.len(), 1);
        assert_eq!(leaderboards.gainers[0].token, "1");
        assert_eq!(leaderboards.losers.len(), 1);
        assert_eq!(leaderboards.losers[0].token, "2");
    }

    #[test]
    fn test_top_gainers_and_losers() {
        struct TestCase {
            input: Vec<Instrument>,
            expected_gainers: Vec<&'static str>,
            expected_losers: Vec<&'static str>,
        }

        let tests = vec![
            TestCase {
                // TC0: empty input
                input: vec![],
                expected_gainers: vec![],
                expected_losers: vec![],
            },
            TestCase {
                // TC1: zero change appears in neither list
                input: vec![instrument("1", 0.0), instrument("2", -0.0)],
                expected_gainers: vec![],
                expected_losers: vec![],
            },
            TestCase {
                // TC2: truncated to top 4, ordered by change
                input: vec![
                    instrument("1", 1.0),
                    instrument("2", 6.0),
                    instrument("3", -2.0),
                    instrument("4", 3.5),
                    instrument("5", 0.5),
                    instrument("6", -7.25),
                    instrument("7", 9.1),
                    instrument("8", -0.1),
                ],
                expected_gainers: vec!["7", "2", "4", "1"],
                expected_losers: vec!["6", "3", "8"],
            },
            TestCase {
                // TC3: ties keep input order
                input: vec![
                    instrument("1", 2.0),
                    instrument("2", -1.5),
                    instrument("3", 2.0),
                    instrument("4", -1.5),
                    instrument("5", 2.0),
                ],
                expected_gainers: vec!["1", "3", "5"],
                expected_losers: vec!["2", "4"],
            },
            TestCase {
                // TC4: ties at the cut-off keep the earliest entries
                input: vec![
                    instrument("1", -1.0),
                    instrument("2", -1.0),
                    instrument("3", -1.0),
                    instrument("4", -1.0),
                    instrument("5", -1.0),
                ],
                expected_gainers: vec![],
                expected_losers: vec!["1", "2", "3", "4"],
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let gainers = top_gainers(&test.input);
            let losers = top_losers(&test.input);
            assert_eq!(tokens(&gainers), test.expected_gainers, "TC{} failed", index);
            assert_eq!(tokens(&losers), test.expected_losers, "TC{} failed", index);
        }
    }

    #[test]
    fn test_leaderboard_invariants() {
        let instruments = (0..25)
            .map(|i| instrument(&i.to_string(), ((i * 37) % 19) as f64 - 9.0))
            .collect::<Vec<_>>();

        let gainers = top_gainers(&instruments);
        let losers = top_losers(&instruments);

        assert!(gainers.len() <= LEADERBOARD_SIZE);
        assert!(gainers.iter().all(|i| i.change_pct > 0.0));
        assert!(gainers.windows(2).all(|w| w[0].change_pct >= w[1].change_pct));

        assert!(losers.len() <= LEADERBOARD_SIZE);
        assert!(losers.iter().all(|i| i.change_pct < 0.0));
        assert!(losers.windows(2).all(|w| w[0].change_pct <= w[1].change_pct));
    }

    #[test]
    fn test_leader_row_labels() {
        let high = LeaderRow::from(&instrument("1", 4.5).with_strength_score(61.0));
        let normal = LeaderRow::from(&instrument("2", -3.0).with_strength_score(60.0));

        assert!(high.high_volume);
        assert_eq!(high.volume_label(), "High");
        assert_eq!(high.change_label(), "+4.50%");
        assert!(!normal.high_volume);
        assert_eq!(normal.volume_label(), "Normal");
        assert_eq!(normal.change_label(), "-3.00%");
    }
}
