// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observed attributes and their coercion rules.
//!
//! Hosts that mirror configuration through string attributes (HTML attributes,
//! markup props, config files) hand raw values to
//! [`HoverVideoPlayer::attribute_changed`](crate::HoverVideoPlayer::attribute_changed),
//! which uses the helpers here:
//!
//! - Booleans are presence flags, except that the literal string `"false"`
//!   turns them off: [`parse_bool`].
//! - Durations are integer milliseconds, or seconds with an `s` suffix:
//!   [`parse_delay_ms`].
//!
//! ```
//! use understory_hover_video::attributes::{parse_bool, parse_delay_ms};
//!
//! assert!(parse_bool(Some("")));
//! assert!(!parse_bool(Some("false")));
//! assert!(!parse_bool(None));
//!
//! assert_eq!(parse_delay_ms("300"), Ok(300));
//! assert_eq!(parse_delay_ms("0.55s"), Ok(550));
//! ```

use alloc::string::ToString;

use crate::error::ConfigError;

/// Attributes a player observes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// `hover-target`: selector resolving the hover target element(s).
    HoverTarget,
    /// `restart-on-pause`: boolean.
    RestartOnPause,
    /// `unload-on-pause`: boolean.
    UnloadOnPause,
    /// `playback-start-delay`: duration.
    PlaybackStartDelay,
    /// `controlled`: boolean.
    Controlled,
    /// `sizing-mode`: one of `video|overlay|container|manual`.
    SizingMode,
    /// `data-playback-state`: published state, also writable to force a transition.
    PlaybackState,
}

impl Attribute {
    /// Every observed attribute, in a stable order.
    pub const ALL: [Self; 7] = [
        Self::HoverTarget,
        Self::RestartOnPause,
        Self::UnloadOnPause,
        Self::PlaybackStartDelay,
        Self::Controlled,
        Self::SizingMode,
        Self::PlaybackState,
    ];

    /// The attribute name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::HoverTarget => "hover-target",
            Self::RestartOnPause => "restart-on-pause",
            Self::UnloadOnPause => "unload-on-pause",
            Self::PlaybackStartDelay => "playback-start-delay",
            Self::Controlled => "controlled",
            Self::SizingMode => "sizing-mode",
            Self::PlaybackState => "data-playback-state",
        }
    }

    /// Look up an observed attribute by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}

/// Name of the presence-only attribute reflecting the hover state.
pub const IS_HOVERING_ATTRIBUTE: &str = "data-is-hovering";

/// Coerce a boolean attribute.
///
/// Absent means `false`; present means `true` unless the value is exactly `"false"`.
pub fn parse_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| v != "false")
}

/// Parse a delay attribute into milliseconds.
///
/// `"<float>s"` is seconds; anything else is milliseconds, with an optional
/// `ms` suffix and any fractional part dropped.
pub fn parse_delay_ms(value: &str) -> Result<u64, ConfigError> {
    let trimmed = value.trim();
    let parsed = if let Some(ms) = trimmed.strip_suffix("ms") {
        parse_non_negative(ms).map(truncate)
    } else if let Some(secs) = trimmed.strip_suffix('s') {
        parse_non_negative(secs).map(|s| round(s * 1000.0))
    } else {
        parse_non_negative(trimmed).map(truncate)
    };
    parsed.ok_or_else(|| ConfigError::InvalidDuration(value.to_string()))
}

/// Parse a CSS `<time>` value (`0.4s`, `400ms`) into milliseconds.
///
/// Unlike [`parse_delay_ms`], a bare number is not a valid CSS time, so this
/// returns `None` for it and for anything else unparsable.
pub fn parse_css_duration_ms(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    if let Some(ms) = trimmed.strip_suffix("ms") {
        parse_non_negative(ms).map(round)
    } else {
        let secs = trimmed.strip_suffix('s')?;
        parse_non_negative(secs).map(|s| round(s * 1000.0))
    }
}

fn parse_non_negative(s: &str) -> Option<f64> {
    let v: f64 = s.trim().parse().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "callers only pass finite, non-negative values"
)]
fn truncate(v: f64) -> u64 {
    v as u64
}

fn round(v: f64) -> u64 {
    truncate(v + 0.5)
}
