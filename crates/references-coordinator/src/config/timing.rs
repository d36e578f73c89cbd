use std::{collections::HashMap, time::Duration};

use serde::Deserialize;
use serde_json::Value;

pub const MAX_START_DELAY_MS: u64 = 10_000;
pub const MIN_TICK_INTERVAL_MS: u64 = 50;
pub const MAX_TICK_INTERVAL_MS: u64 = 10_000;
pub const MAX_PEEK_WINDOW_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct TimingSettings {
    /// Delay before the progress presentation appears.
    pub start_delay_ms: u64,
    /// Period of the refresh tick while the presentation is visible.
    pub tick_interval_ms: u64,
    /// How recent a visibility drop must be to count as a Peek.
    pub peek_window_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            start_delay_ms: 2000,
            tick_interval_ms: 1000,
            peek_window_ms: 1000,
        }
    }
}

impl TimingSettings {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn peek_window(&self) -> Duration {
        Duration::from_millis(self.peek_window_ms)
    }

    pub(crate) fn apply_patch(
        &mut self,
        patch: TimingSettingsPatch,
    ) {
        if let Some(v) = patch.start_delay_ms {
            self.start_delay_ms = v;
        }
        if let Some(v) = patch.tick_interval_ms {
            self.tick_interval_ms = v;
        }
        if let Some(v) = patch.peek_window_ms {
            self.peek_window_ms = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.start_delay_ms = self.start_delay_ms.min(MAX_START_DELAY_MS);
        self.tick_interval_ms = self.tick_interval_ms.clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS);
        self.peek_window_ms = self.peek_window_ms.min(MAX_PEEK_WINDOW_MS);
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct TimingSettingsPatch {
    pub(crate) start_delay_ms: Option<u64>,
    pub(crate) tick_interval_ms: Option<u64>,
    pub(crate) peek_window_ms: Option<u64>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
