use serde::{Deserialize, Serialize};

/// Number of rows on the leaderboard
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Longest name stored with a score
pub const MAX_NAME_LEN: usize = 12;

const ANONYMOUS: &str = "ANONYMOUS";

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    #[serde(default)]
    pub name: String,
    pub score: u32,
}

impl HighScoreEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    /// Zero-score filler used only while computing insert positions
    fn placeholder() -> Self {
        Self::new(String::new(), 0)
    }

    /// Upper-case, trim and shorten a player name for storage
    pub fn normalize_name(raw: &str) -> String {
        let name: String = raw
            .trim()
            .chars()
            .take(MAX_NAME_LEN)
            .collect::<String>()
            .to_uppercase();
        if name.is_empty() {
            ANONYMOUS.to_string()
        } else {
            name
        }
    }
}

/// Top scores in descending order, at most [`LEADERBOARD_CAPACITY`] rows.
///
/// Only real entries are kept; zero-score placeholders exist only inside
/// [`Leaderboard::insert`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<HighScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from entries in any order.
    ///
    /// Sorting is stable, so equal scores keep the order the store returned.
    pub fn from_entries(mut entries: Vec<HighScoreEntry>) -> Self {
        entries.retain(|entry| entry.score > 0);
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(LEADERBOARD_CAPACITY);
        Self { entries }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a score would earn a row
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.cutoff()
    }

    /// Insert an entry at its ranked position.
    ///
    /// Returns the row index, or `None` if the score does not qualify. Ties
    /// rank below the existing equal scores.
    pub fn insert(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let mut padded = self.padded();

        let last = padded.last().map_or(0, |e| e.score);
        if entry.score <= last {
            return None;
        }

        let first = padded.first().map_or(0, |e| e.score);
        let position = if entry.score > first {
            0
        } else {
            padded
                .iter()
                .rposition(|existing| existing.score >= entry.score)
                .map_or(0, |i| i + 1)
        };

        padded.insert(position, entry);
        padded.truncate(LEADERBOARD_CAPACITY);
        while padded.last().is_some_and(|e| e.score == 0) {
            padded.pop();
        }

        self.entries = padded;
        Some(position)
    }

    /// Change the name on a row. Returns false if the row does not exist.
    pub fn rename(&mut self, index: usize, name: &str) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<HighScoreEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Score a new entry must beat
    fn cutoff(&self) -> u32 {
        if self.entries.len() < LEADERBOARD_CAPACITY {
            0
        } else {
            self.entries.last().map_or(0, |e| e.score)
        }
    }

    fn padded(&self) -> Vec<HighScoreEntry> {
        let mut padded = self.entries.clone();
        padded.resize_with(LEADERBOARD_CAPACITY.max(padded.len()), HighScoreEntry::placeholder);
        padded
    }
}
