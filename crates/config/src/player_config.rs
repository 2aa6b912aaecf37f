//! `[player]` section: how playback resumes and when it is saved

use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume of a fresh session, 0-100
    pub default_volume: u8,

    /// Share of a chapter after which it counts as finished
    pub finished_ratio: f64,

    /// A finished chapter resumes this many seconds before its end
    pub finished_rewind_secs: u64,

    /// "Previous" restarts the chapter once progress is past this
    pub restart_threshold_secs: u64,

    /// Save the session every time progress moves this far; 0 turns it off
    pub autosave_interval_secs: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: 80,
            finished_ratio: 0.95,
            finished_rewind_secs: 10,
            restart_threshold_secs: 5,
            autosave_interval_secs: 0,
        }
    }
}

impl PlayerConfig {
    /// Every out-of-range field
    pub fn problems(&self) -> Vec<FieldError> {
        let mut problems = Vec::new();
        outside("player.default_volume", self.default_volume, 0..=100, &mut problems);
        outside("player.finished_ratio", self.finished_ratio, 0.5..=1.0, &mut problems);
        outside(
            "player.finished_rewind_secs",
            self.finished_rewind_secs,
            0..=120,
            &mut problems,
        );
        outside(
            "player.restart_threshold_secs",
            self.restart_threshold_secs,
            0..=60,
            &mut problems,
        );
        if self.autosave_interval_secs != 0 {
            outside(
                "player.autosave_interval_secs",
                self.autosave_interval_secs,
                1..=300,
                &mut problems,
            );
        }
        problems
    }
}

fn outside<T>(field: &'static str, value: T, range: RangeInclusive<T>, into: &mut Vec<FieldError>)
where
    T: PartialOrd + Display,
{
    if !range.contains(&value) {
        into.push(FieldError::new(
            field,
            format!("{} is outside {}..={}", value, range.start(), range.end()),
        ));
    }
}
