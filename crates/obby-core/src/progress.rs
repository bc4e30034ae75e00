use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Session-spanning progression: per-level best times keyed by level id,
/// and the highest unlocked level (1-based count). This is the only state
/// handed to the persistence collaborator; everything else resets with the
/// process.
///
/// Both fields are monotonic through the public API: best times only
/// decrease, the unlocked count only increases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    best_times: HashMap<String, f32>,
    unlocked: usize,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            best_times: HashMap::new(),
            unlocked: 1,
        }
    }
}

impl Progress {
    /// Decode previously persisted progress. Malformed input is recovered
    /// locally: the result is a default profile, never an error.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Progress>(raw) {
            Ok(progress) => progress.sanitized(),
            Err(e) => {
                tracing::warn!("malformed persisted progress ({e}), using defaults");
                Progress::default()
            },
        }
    }

    /// Encode for the persistence collaborator.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("progress serialization must succeed")
    }

    fn sanitized(mut self) -> Self {
        if self.unlocked == 0 {
            self.unlocked = 1;
        }
        self.best_times
            .retain(|_, time| time.is_finite() && *time >= 0.0);
        self
    }

    /// Highest unlocked level, as a 1-based count. A level with 1-based
    /// number `n` is playable iff `n <= unlocked()`.
    pub fn unlocked(&self) -> usize {
        self.unlocked
    }

    pub fn best_time(&self, level_id: &str) -> Option<f32> {
        self.best_times.get(level_id).copied()
    }

    /// Record a completion time. Returns true when it strictly beats the
    /// stored best (or none existed); otherwise the stored best stands.
    pub fn record_time(&mut self, level_id: &str, seconds: f32) -> bool {
        match self.best_times.get(level_id) {
            Some(&best) if seconds >= best => false,
            _ => {
                self.best_times.insert(level_id.to_string(), seconds);
                true
            },
        }
    }

    /// Raise the unlocked count to `level`, never lowering it. Returns true
    /// when the count actually moved.
    pub fn unlock_through(&mut self, level: usize) -> bool {
        if level > self.unlocked {
            self.unlocked = level;
            true
        } else {
            false
        }
    }

    /// Wipe back to a fresh profile: nothing unlocked past the first level,
    /// no best times.
    pub fn reset(&mut self) {
        *self = Progress::default();
    }
}
