// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! None of these are fatal. Configuration errors are logged and replaced by a
//! safe default; play errors are classified and either swallowed, recovered,
//! or turned into a `paused` state.

use alloc::string::String;
use core::fmt;

/// A configuration value could not be used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration attribute was neither integer milliseconds nor `<float>s`.
    InvalidDuration(String),
    /// `sizing-mode` was not one of `video`, `overlay`, `container`, `manual`.
    InvalidSizingMode(String),
    /// `data-playback-state` was not one of `paused`, `loading`, `playing`.
    InvalidPlaybackState(String),
    /// The `hover-target` selector matched nothing.
    HoverTargetNotFound(String),
    /// The player has no media element to control.
    MissingMedia,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration(v) => write!(f, "invalid duration {v:?}"),
            Self::InvalidSizingMode(v) => write!(
                f,
                "invalid sizing mode {v:?}, expected one of video, overlay, container, manual"
            ),
            Self::InvalidPlaybackState(v) => write!(
                f,
                "invalid playback state {v:?}, expected one of paused, loading, playing"
            ),
            Self::HoverTargetNotFound(selector) => {
                write!(f, "no hover target element matches selector {selector:?}")
            }
            Self::MissingMedia => f.write_str("no media element to control"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Why a media `play()` attempt was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayError {
    /// The attempt was interrupted by a later `pause()` or `load()`.
    Aborted,
    /// The autoplay policy refused to start playback (typically: unmuted
    /// playback without user activation).
    NotAllowed,
    /// Anything else, with a description from the media backend.
    Failed(String),
}

impl PlayError {
    /// Returns `true` for rejections caused by a newer request superseding the
    /// attempt. These are expected and never reported as failures.
    pub const fn is_superseded(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aborted => f.write_str("play request was interrupted"),
            Self::NotAllowed => f.write_str("playback was blocked by the autoplay policy"),
            Self::Failed(reason) => write!(f, "playback failed: {reason}"),
        }
    }
}

impl core::error::Error for PlayError {}
