// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a renderer needs to draw a player.
//!
//! [`PresentationState`] is the published snapshot; [`OverlayVisibility`] and
//! [`Layout`] are pure functions of it. Nothing here feeds back into playback.
//!
//! ```
//! use understory_hover_video::presentation::PresentationState;
//! use understory_hover_video::{PlaybackState, SizingMode};
//!
//! let view = PresentationState {
//!     playback_state: PlaybackState::Loading,
//!     is_hovering: true,
//!     sizing_mode: SizingMode::Overlay,
//!     has_paused_overlay: true,
//! };
//! let overlays = view.overlays();
//! assert!(overlays.paused && overlays.loading && overlays.hover);
//! assert!(view.layout().paused_overlay_sizes_player);
//! ```

use crate::state::{PlaybackState, SizingMode};

/// Grace period before the loading overlay fades in (0.2s).
pub const LOADING_OVERLAY_DELAY_MS: u64 = 200;

/// Snapshot of everything a renderer may depend on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PresentationState {
    /// Committed playback state.
    pub playback_state: PlaybackState,
    /// Whether a hover is in progress.
    pub is_hovering: bool,
    /// Configured sizing mode.
    pub sizing_mode: SizingMode,
    /// Whether paused-overlay content is present.
    pub has_paused_overlay: bool,
}

/// Which overlays are shown.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayVisibility {
    /// Paused overlay: shown until playback actually starts.
    pub paused: bool,
    /// Loading overlay: shown while loading, after [`LOADING_OVERLAY_DELAY_MS`].
    pub loading: bool,
    /// Hover overlay: shown while hovering.
    pub hover: bool,
}

/// Sizing rules for the player's children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    /// The video's intrinsic size sizes the player.
    pub video_sizes_player: bool,
    /// The paused overlay sizes the player.
    pub paused_overlay_sizes_player: bool,
    /// The video is stretched over the player, cropping to cover.
    pub video_covers_player: bool,
    /// The paused overlay is stretched over the player.
    pub paused_overlay_covers_player: bool,
}

impl PresentationState {
    /// Overlay visibility for this state.
    ///
    /// Visibility flags describe the target of the fade; a renderer animates
    /// toward them. Overlays that are absent are simply never drawn, so the
    /// paused flag does not depend on `has_paused_overlay`.
    pub fn overlays(&self) -> OverlayVisibility {
        OverlayVisibility {
            paused: matches!(
                self.playback_state,
                PlaybackState::Paused | PlaybackState::Loading
            ),
            loading: self.playback_state == PlaybackState::Loading,
            hover: self.is_hovering,
        }
    }

    /// Layout rules for the configured sizing mode.
    ///
    /// Loading and hover overlays always cover the player and are not listed.
    pub fn layout(&self) -> Layout {
        match self.sizing_mode {
            SizingMode::Video => Layout {
                video_sizes_player: true,
                paused_overlay_covers_player: true,
                ..Layout::default()
            },
            SizingMode::Overlay => Layout {
                paused_overlay_sizes_player: true,
                video_covers_player: true,
                ..Layout::default()
            },
            SizingMode::Container => Layout {
                video_covers_player: true,
                paused_overlay_covers_player: true,
                ..Layout::default()
            },
            SizingMode::Manual => Layout::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(state: PlaybackState, hovering: bool) -> PresentationState {
        PresentationState {
            playback_state: state,
            is_hovering: hovering,
            ..PresentationState::default()
        }
    }

    #[test]
    fn paused_overlay_stays_until_playing() {
        assert!(view(PlaybackState::Paused, false).overlays().paused);
        assert!(view(PlaybackState::Loading, true).overlays().paused);
        assert!(!view(PlaybackState::Playing, true).overlays().paused);
    }

    #[test]
    fn loading_overlay_only_while_loading() {
        assert!(!view(PlaybackState::Paused, true).overlays().loading);
        assert!(view(PlaybackState::Loading, true).overlays().loading);
        assert!(!view(PlaybackState::Playing, true).overlays().loading);
    }

    #[test]
    fn hover_overlay_follows_hover_not_playback() {
        // Forced playback without a hover shows no hover overlay.
        assert!(!view(PlaybackState::Playing, false).overlays().hover);
        // Hovering with playback still paused does.
        assert!(view(PlaybackState::Paused, true).overlays().hover);
    }

    #[test]
    fn exactly_one_child_sizes_the_player_in_intrinsic_modes() {
        for mode in [SizingMode::Video, SizingMode::Overlay] {
            let l = PresentationState {
                sizing_mode: mode,
                ..PresentationState::default()
            }
            .layout();
            assert!(
                l.video_sizes_player ^ l.paused_overlay_sizes_player,
                "{mode} must have a single sizing child"
            );
        }
    }

    #[test]
    fn container_and_manual_modes() {
        let container = PresentationState {
            sizing_mode: SizingMode::Container,
            ..PresentationState::default()
        }
        .layout();
        assert!(!container.video_sizes_player && !container.paused_overlay_sizes_player);
        assert!(container.video_covers_player && container.paused_overlay_covers_player);

        let manual = PresentationState {
            sizing_mode: SizingMode::Manual,
            ..PresentationState::default()
        }
        .layout();
        assert_eq!(manual, Layout::default());
    }
}
