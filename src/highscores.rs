//! Best score record
//!
//! One number survives between runs: the best score so far. Stored as JSON
//! next to the binary by the native runner.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Result of submitting a finished run's score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    /// The submitted score beat the record
    pub new_best: bool,
    /// Record before this submission
    pub previous: u64,
}

impl ScoreOutcome {
    /// Line shown on the game over screen
    pub fn message(&self) -> String {
        if self.new_best {
            format!("New highscore! Previous: {}", self.previous)
        } else {
            format!("Score to beat: {}", self.previous)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run. Only a strictly higher score replaces the best.
    pub fn submit(&mut self, score: u64) -> ScoreOutcome {
        let previous = self.best;
        let new_best = score > previous;
        if new_best {
            self.best = score;
        }
        ScoreOutcome { new_best, previous }
    }

    pub fn to_json(&self) -> Result<String, ScoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ScoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load the record from disk. A missing file is a fresh record.
    pub fn load(path: &Path) -> Result<Self, ScoreError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let scores = Self::from_json(&json)?;
                log::info!("Loaded highscore {} from {}", scores.best, path.display());
                Ok(scores)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No highscore found, starting fresh");
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ScoreError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Highscore saved ({})", self.best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_sets_best() {
        let mut scores = HighScore::new();
        let outcome = scores.submit(12);
        assert_eq!(outcome, ScoreOutcome { new_best: true, previous: 0 });
        assert_eq!(scores.best, 12);
        assert_eq!(outcome.message(), "New highscore! Previous: 0");
    }

    #[test]
    fn test_lower_or_equal_score_keeps_best() {
        let mut scores = HighScore { best: 30 };
        assert!(!scores.submit(30).new_best);
        let outcome = scores.submit(5);
        assert_eq!(outcome.previous, 30);
        assert_eq!(scores.best, 30);
        assert_eq!(outcome.message(), "Score to beat: 30");
    }

    #[test]
    fn test_json_record() {
        let scores = HighScore { best: 41 };
        let json = scores.to_json().unwrap();
        assert_eq!(json, r#"{"best":41}"#);
        assert_eq!(HighScore::from_json(&json).unwrap(), scores);
        assert!(matches!(HighScore::from_json("41"), Err(ScoreError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_fresh_record() {
        let path = std::env::temp_dir().join("catfall_no_such_highscore_file.json");
        let _ = std::fs::remove_file(&path);
        assert_eq!(HighScore::load(&path).unwrap(), HighScore::new());
    }
}
