//! Unlocked-level progress
//!
//! The core never touches storage: callers serialize [`Progress`] with
//! [`Progress::to_json`] and hand the stored string back to
//! [`Progress::load`] on the next start.

use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_COUNT;

/// What a win did to progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinOutcome {
    /// The next level is now playable
    Unlocked(u32),
    /// The last level was beaten
    GameComplete,
}

/// Highest level the player may start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub unlocked: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Fresh progress: only level 1 is open
    pub fn new() -> Self {
        Self { unlocked: 1 }
    }

    pub fn is_unlocked(&self, level_id: u32) -> bool {
        (1..=self.unlocked).contains(&level_id)
    }

    /// Record a win on `level_id`. Replaying an earlier level never lowers
    /// the unlocked count.
    pub fn record_win(&mut self, level_id: u32) -> WinOutcome {
        let next = level_id + 1;
        if next > LEVEL_COUNT {
            log::info!("Level {} complete, game complete", level_id);
            return WinOutcome::GameComplete;
        }
        if next > self.unlocked {
            self.unlocked = next;
            log::info!("Level {} unlocked", next);
        }
        WinOutcome::Unlocked(next)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse stored progress, clamping the count into the catalog
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let stored: Progress = serde_json::from_str(json)?;
        Ok(Self {
            unlocked: stored.unlocked.clamp(1, LEVEL_COUNT),
        })
    }

    /// Restore from whatever the caller had stored, starting fresh when
    /// nothing usable is there
    pub fn load(stored: Option<&str>) -> Self {
        match stored.map(Self::from_json) {
            Some(Ok(progress)) => {
                log::info!("Loaded progress: {} levels unlocked", progress.unlocked);
                progress
            }
            Some(Err(e)) => {
                log::warn!("Discarding unreadable progress: {}", e);
                Self::new()
            }
            None => {
                log::info!("No progress found, starting fresh");
                Self::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_progress() {
        let progress = Progress::new();
        assert!(progress.is_unlocked(1));
        assert!(!progress.is_unlocked(2));
        assert!(!progress.is_unlocked(0));
    }

    #[test]
    fn test_win_unlocks_next() {
        let mut progress = Progress::new();
        assert_eq!(progress.record_win(1), WinOutcome::Unlocked(2));
        assert!(progress.is_unlocked(2));
        assert_eq!(progress.unlocked, 2);
    }

    #[test]
    fn test_replay_does_not_regress() {
        let mut progress = Progress { unlocked: 4 };
        assert_eq!(progress.record_win(1), WinOutcome::Unlocked(2));
        assert_eq!(progress.unlocked, 4);
    }

    #[test]
    fn test_last_level_completes_game() {
        let mut progress = Progress {
            unlocked: LEVEL_COUNT,
        };
        assert_eq!(progress.record_win(LEVEL_COUNT), WinOutcome::GameComplete);
        assert_eq!(progress.unlocked, LEVEL_COUNT);
    }

    #[test]
    fn test_json_roundtrip_and_clamp() {
        let mut progress = Progress::new();
        progress.record_win(1);
        let json = progress.to_json().unwrap();
        assert_eq!(Progress::from_json(&json).unwrap(), progress);

        assert_eq!(
            Progress::from_json(r#"{"unlocked":99}"#).unwrap().unlocked,
            LEVEL_COUNT
        );
        assert_eq!(Progress::from_json(r#"{"unlocked":0}"#).unwrap().unlocked, 1);
    }

    #[test]
    fn test_load_falls_back_to_fresh() {
        assert_eq!(Progress::load(None), Progress::new());
        assert_eq!(Progress::load(Some("not json")), Progress::new());
        assert_eq!(
            Progress::load(Some(r#"{"unlocked":3}"#)),
            Progress { unlocked: 3 }
        );
    }
}
