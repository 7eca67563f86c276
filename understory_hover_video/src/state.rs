// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Published state enums and their string forms.

use core::fmt;
use core::str::FromStr;

use alloc::string::ToString;

use crate::error::ConfigError;

/// Canonical playback state of a player.
///
/// A player only ever moves `Paused → Loading → Playing → Paused`; there is no
/// direct `Paused → Playing` edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// At rest. Initial state, and the state after every hover end.
    #[default]
    Paused,
    /// Playback was requested and has not started yet (start delay, pending
    /// `play()`, or waiting for a media element to show up).
    Loading,
    /// The media reported that playback started.
    Playing,
}

impl PlaybackState {
    /// Attribute value (`data-playback-state`) for this state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paused => "paused",
            Self::Loading => "loading",
            Self::Playing => "playing",
        }
    }

    /// Returns `true` for the states in which playback is wanted.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Loading | Self::Playing)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaybackState {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paused" => Ok(Self::Paused),
            "loading" => Ok(Self::Loading),
            "playing" => Ok(Self::Playing),
            other => Err(ConfigError::InvalidPlaybackState(other.to_string())),
        }
    }
}

/// How the player's box is sized relative to its content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SizingMode {
    /// The video's intrinsic size drives the player; overlays cover the video.
    #[default]
    Video,
    /// The paused overlay drives the player; the video covers it.
    Overlay,
    /// The player is sized externally; video and paused overlay cover it.
    Container,
    /// No sizing rules are applied.
    Manual,
}

impl SizingMode {
    /// Attribute value (`sizing-mode`) for this mode.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Overlay => "overlay",
            Self::Container => "container",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for SizingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Self::Video),
            "overlay" => Ok(Self::Overlay),
            "container" => Ok(Self::Container),
            "manual" => Ok(Self::Manual),
            other => Err(ConfigError::InvalidSizingMode(other.to_string())),
        }
    }
}
