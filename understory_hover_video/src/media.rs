// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The media capability a player drives.
//!
//! [`MediaElement`] is the whole contract the player needs from a video
//! element: start/stop, position, mute, preload hint, and access to its source
//! list so sources can be stripped and restored. Decoding, buffering and
//! networking stay on the other side of this trait.
//!
//! Two operations complete asynchronously and report back through the player:
//!
//! - [`MediaElement::play`] receives a [`PlayAttempt`]; the embedding reports
//!   the outcome with
//!   [`HoverVideoPlayer::play_settled`](crate::HoverVideoPlayer::play_settled),
//!   passing the same attempt back.
//! - After [`MediaElement::load`] with no sources, the element eventually
//!   signals that its source list is empty ("emptied"); the embedding reports
//!   that with
//!   [`HoverVideoPlayer::media_emptied`](crate::HoverVideoPlayer::media_emptied).

use alloc::string::String;
use alloc::vec::Vec;

/// Identifies one media element attachment.
///
/// Bumped every time the player's media element is replaced, so completions
/// that belong to an element which is no longer attached can be recognized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaGeneration(u64);

impl MediaGeneration {
    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Token for one call to [`MediaElement::play`].
///
/// Only the most recent attempt is authoritative; settling any other attempt
/// is ignored by the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayAttempt {
    /// The media attachment the attempt was made on.
    pub media: MediaGeneration,
    seq: u64,
}

impl PlayAttempt {
    pub(crate) const fn new(media: MediaGeneration, seq: u64) -> Self {
        Self { media, seq }
    }
}

/// How much media data the element has, mirroring `HTMLMediaElement.readyState`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadyState {
    /// No data at all.
    #[default]
    HaveNothing,
    /// Duration and dimensions are known.
    HaveMetadata,
    /// Data for the current position only.
    HaveCurrentData,
    /// Enough data to advance a little.
    HaveFutureData,
    /// Enough data to play through.
    HaveEnoughData,
}

impl ReadyState {
    /// Map the numeric DOM value; out-of-range values saturate.
    pub const fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::HaveNothing,
            1 => Self::HaveMetadata,
            2 => Self::HaveCurrentData,
            3 => Self::HaveFutureData,
            _ => Self::HaveEnoughData,
        }
    }
}

/// Preload hint of a media element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Preload {
    /// `none`
    None,
    /// `metadata`
    Metadata,
    /// `auto`
    Auto,
}

impl Preload {
    /// Attribute value for this hint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Metadata => "metadata",
            Self::Auto => "auto",
        }
    }

    /// Parse a `preload` attribute value, ASCII case-insensitively.
    ///
    /// The empty string means `auto`; unknown values yield `None`.
    pub fn from_attribute(value: &str) -> Option<Self> {
        if value.is_empty() || value.eq_ignore_ascii_case("auto") {
            Some(Self::Auto)
        } else if value.eq_ignore_ascii_case("metadata") {
            Some(Self::Metadata)
        } else if value.eq_ignore_ascii_case("none") {
            Some(Self::None)
        } else {
            None
        }
    }
}

/// A controllable media element.
pub trait MediaElement {
    /// A detachable source descriptor (for example a `<source>` child).
    type Source;

    /// Begin playback. The outcome must be reported with
    /// [`HoverVideoPlayer::play_settled`](crate::HoverVideoPlayer::play_settled).
    fn play(&mut self, attempt: PlayAttempt);
    /// Pause playback.
    fn pause(&mut self);
    /// Re-run resource selection with the current sources.
    fn load(&mut self);

    /// Playback position in seconds.
    fn current_time(&self) -> f64;
    /// Seek to a position in seconds.
    fn set_current_time(&mut self, seconds: f64);

    /// Whether audio is muted.
    fn muted(&self) -> bool;
    /// Mute or unmute audio.
    fn set_muted(&mut self, muted: bool);

    /// How much data is buffered.
    ///
    /// The player never consults this; it exists so embedders and tests can
    /// inspect the element through [`HoverVideoPlayer::media`](crate::HoverVideoPlayer::media),
    /// for example to confirm that an unload released the buffered data.
    fn ready_state(&self) -> ReadyState;

    /// The explicit preload hint, if one is set.
    fn preload(&self) -> Option<Preload>;
    /// Set the preload hint.
    fn set_preload(&mut self, preload: Preload);

    /// Remove and return the direct source URL, if any.
    fn take_src(&mut self) -> Option<String>;
    /// Set the direct source URL.
    fn set_src(&mut self, src: String);
    /// Detach and return all source descriptors, in document order.
    fn take_sources(&mut self) -> Vec<Self::Source>;
    /// Append a source descriptor after the existing ones.
    fn append_source(&mut self, source: Self::Source);
}
