// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Player configuration.

use crate::state::SizingMode;

/// Configuration of a [`HoverVideoPlayer`](crate::HoverVideoPlayer).
///
/// Every field may change at any time; the player reads the current value at
/// the moment a transition needs it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Seek back to the start whenever a pause commits.
    pub restart_on_pause: bool,
    /// Release buffered media whenever a pause commits.
    pub unload_on_pause: bool,
    /// Wait this long after a hover starts before calling `play()`.
    pub playback_start_delay_ms: u64,
    /// Ignore native hover input; only `hover()`/`blur()` drive playback.
    pub controlled: bool,
    /// How the player is sized.
    pub sizing_mode: SizingMode,
}

impl PlayerConfig {
    /// Builder-style setter for [`PlayerConfig::restart_on_pause`].
    pub fn with_restart_on_pause(mut self, enabled: bool) -> Self {
        self.restart_on_pause = enabled;
        self
    }

    /// Builder-style setter for [`PlayerConfig::unload_on_pause`].
    pub fn with_unload_on_pause(mut self, enabled: bool) -> Self {
        self.unload_on_pause = enabled;
        self
    }

    /// Builder-style setter for [`PlayerConfig::playback_start_delay_ms`].
    pub fn with_playback_start_delay(mut self, delay_ms: u64) -> Self {
        self.playback_start_delay_ms = delay_ms;
        self
    }

    /// Builder-style setter for [`PlayerConfig::controlled`].
    pub fn with_controlled(mut self, controlled: bool) -> Self {
        self.controlled = controlled;
        self
    }

    /// Builder-style setter for [`PlayerConfig::sizing_mode`].
    pub fn with_sizing_mode(mut self, mode: SizingMode) -> Self {
        self.sizing_mode = mode;
        self
    }
}
