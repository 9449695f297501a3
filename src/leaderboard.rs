//! Client-held leaderboard
//!
//! Mirrors the remote board for display and takes a local entry when a
//! submission fails. Entries are always ordered by descending score and
//! ranked 1..n, at most [`MAX_ENTRIES`] of them. Never persisted.

use serde::{Deserialize, Serialize};

use crate::report::RemoteEntry;

/// Maximum number of entries kept for display
pub const MAX_ENTRIES: usize = 10;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    pub cash: u64,
    /// 1-based position
    pub rank: usize,
}

/// Display tier for the top three places
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Podium {
    Gold,
    Silver,
    Bronze,
    Plain,
}

impl Podium {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Podium::Gold,
            2 => Podium::Silver,
            3 => Podium::Bronze,
            _ => Podium::Plain,
        }
    }

    /// CSS class used by the menu markup
    pub fn css_class(&self) -> &'static str {
        match self {
            Podium::Gold => "rank-gold",
            Podium::Silver => "rank-silver",
            Podium::Bronze => "rank-bronze",
            Podium::Plain => "rank-plain",
        }
    }
}

impl LeaderboardEntry {
    pub fn podium(&self) -> Podium {
        Podium::for_rank(self.rank)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Rank a score would take if inserted now (1-indexed, None if it would
    /// fall off the board)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
            + 1;
        (rank <= MAX_ENTRIES).then_some(rank)
    }

    /// Replace the board with the remote one. Cash mirrors score.
    pub fn replace_with_remote(&mut self, remote: Vec<RemoteEntry>) {
        self.entries = remote
            .into_iter()
            .map(|entry| LeaderboardEntry {
                name: entry.display_name().to_string(),
                score: entry.score,
                cash: entry.score,
                rank: 0,
            })
            .collect();
        self.rerank();
    }

    /// Insert a client-side entry. Returns the rank it landed on, or None if
    /// it did not make the board.
    pub fn insert_local(&mut self, name: &str, score: u64, cash: u64) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            LeaderboardEntry {
                name: name.to_string(),
                score,
                cash,
                rank,
            },
        );
        self.rerank();
        log::info!("Local leaderboard entry for {} at rank {}", name, rank);
        Some(rank)
    }

    fn rerank(&mut self) {
        // Stable: ties keep arrival order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(rows: &[(&str, u64)]) -> Vec<RemoteEntry> {
        rows.iter().map(|(n, s)| RemoteEntry::new(*n, *s)).collect()
    }

    fn assert_ranked(board: &Leaderboard) {
        for (i, entry) in board.entries().iter().enumerate() {
            assert_eq!(entry.rank, i + 1);
        }
        assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_remote_board_sorted_and_ranked() {
        let mut board = Leaderboard::new();
        board.replace_with_remote(remote(&[("b", 20), ("a", 90), ("c", 50)]));
        let names: Vec<&str> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
        assert_eq!(board.entries()[0].cash, 90);
        assert_eq!(board.top_score(), Some(90));
        assert_ranked(&board);
    }

    #[test]
    fn test_remote_board_capped() {
        let rows: Vec<RemoteEntry> = (0..25).map(|i| RemoteEntry::new(format!("p{i}"), i)).collect();
        let mut board = Leaderboard::new();
        board.replace_with_remote(rows);
        assert_eq!(board.len(), MAX_ENTRIES);
        assert_eq!(board.top_score(), Some(24));
        assert_ranked(&board);
    }

    #[test]
    fn test_local_entry_ranked_by_score() {
        let mut board = Leaderboard::new();
        board.replace_with_remote(remote(&[("a", 100), ("b", 50)]));
        assert_eq!(board.insert_local("me", 70, 70), Some(2));
        assert_eq!(board.entries()[1].name, "me");
        assert_eq!(board.insert_local("low", 10, 10), Some(4));
        assert_eq!(board.len(), 4);
        assert_ranked(&board);
    }

    #[test]
    fn test_tie_goes_after_existing() {
        let mut board = Leaderboard::new();
        board.replace_with_remote(remote(&[("a", 50)]));
        assert_eq!(board.insert_local("me", 50, 50), Some(2));
        assert_eq!(board.entries()[0].name, "a");
    }

    #[test]
    fn test_full_board_rejects_low_score() {
        let rows: Vec<RemoteEntry> = (1..=10).map(|i| RemoteEntry::new(format!("p{i}"), i * 10)).collect();
        let mut board = Leaderboard::new();
        board.replace_with_remote(rows);
        assert_eq!(board.potential_rank(5), None);
        assert_eq!(board.insert_local("me", 5, 5), None);
        assert_eq!(board.insert_local("me", 55, 55), Some(6));
        assert_eq!(board.len(), MAX_ENTRIES);
        assert_eq!(board.entries().last().map(|e| e.score), Some(20));
        assert_ranked(&board);
    }

    #[test]
    fn test_zero_score_enters_empty_board() {
        let mut board = Leaderboard::new();
        assert_eq!(board.insert_local("me", 0, 0), Some(1));
    }

    #[test]
    fn test_podium_tiers() {
        assert_eq!(Podium::for_rank(1), Podium::Gold);
        assert_eq!(Podium::for_rank(2), Podium::Silver);
        assert_eq!(Podium::for_rank(3), Podium::Bronze);
        assert_eq!(Podium::for_rank(4), Podium::Plain);
        assert_eq!(Podium::for_rank(3).css_class(), "rank-bronze");
    }
}
