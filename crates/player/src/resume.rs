//! Resume policy and controller options

use reads_config::PlayerConfig;
use reads_core::Duration;

/// Maps a saved offset to the offset playback actually resumes at
///
/// A chapter whose saved offset reaches `finished_ratio` of its duration
/// counts as finished and resumes `rewind_secs` before its end instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResumePolicy {
    pub finished_ratio: f64,
    pub rewind_secs: u64,
}

impl ResumePolicy {
    pub fn resume_offset(&self, saved: u64, duration: Duration) -> u64 {
        let total = duration.as_seconds();
        if total > 0 && saved as f64 / total as f64 >= self.finished_ratio {
            total.saturating_sub(self.rewind_secs)
        } else {
            saved
        }
    }
}

impl Default for ResumePolicy {
    fn default() -> Self {
        Self {
            finished_ratio: 0.95,
            rewind_secs: 10,
        }
    }
}

/// Tunables of `PlaybackController`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    pub resume: ResumePolicy,
    /// "Previous" restarts the chapter when progress is strictly above this
    pub restart_threshold_secs: u64,
    /// Autosave distance in seconds; 0 disables
    pub autosave_interval_secs: u64,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            resume: ResumePolicy::default(),
            restart_threshold_secs: 5,
            autosave_interval_secs: 0,
        }
    }
}

impl From<&PlayerConfig> for PlaybackOptions {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            resume: ResumePolicy {
                finished_ratio: config.finished_ratio,
                rewind_secs: config.finished_rewind_secs,
            },
            restart_threshold_secs: config.restart_threshold_secs,
            autosave_interval_secs: config.autosave_interval_secs,
        }
    }
}
