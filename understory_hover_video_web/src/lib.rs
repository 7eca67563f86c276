// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_hover_video_web --heading-base-level=0

//! Browser binding for `understory_hover_video`.
//!
//! This crate drives a [`HoverVideoPlayer`](understory_hover_video::HoverVideoPlayer)
//! from a real DOM element when targeting `wasm32`:
//!
//! - `WebHost` installs `mouseenter`/`mouseleave`/`focus`/`blur`/`touchstart`
//!   listeners on the hover targets, dispatches `hoverstart`, `hoverend` and
//!   `playbackstatechange` as `CustomEvent`s on the player element, and
//!   reflects state into `data-playback-state` and `data-is-hovering`.
//! - `VideoElement` adapts the `<video>` child: `play()` promises are awaited
//!   with `wasm-bindgen-futures`, and `emptied` is forwarded for source
//!   restoration.
//! - A `MutationObserver` feeds attribute changes and child replacement back
//!   into the player; a `gloo-timers` timeout wakes it at its next deadline.
//!
//! Every callback goes through one inbox, so the player is never re-entered:
//! a listener that calls `hover()` while a `hoverstart` is being dispatched is
//! handled right after the current step finishes.
//!
//! # Usage
//!
//! The exported `HoverVideoPlayerElement` wraps an existing element. A small
//! custom element class on the JavaScript side forwards its lifecycle:
//!
//! ```text
//! import init, { HoverVideoPlayerElement } from "./understory_hover_video_web.js";
//! await init();
//! customElements.define("hover-video-player", class extends HTMLElement {
//!   connectedCallback() { (this.player ??= new HoverVideoPlayerElement(this)).connect(); }
//!   disconnectedCallback() { this.player.disconnect(); }
//!   hover() { this.player.hover(); }
//!   blur() { this.player.blur(); }
//! });
//! ```
//!
//! The controller also exposes `restartOnPause`, `unloadOnPause`,
//! `playbackStartDelay`, `controlled`, `sizingMode` and `hoverTarget` as
//! read/write properties. `hoverTarget` accepts an element, any iterable of
//! elements, or `null` for the player element.
//!
//! The overlay fade duration is read from the `--overlay-transition-duration`
//! custom property of the player element.
//!
//! On other targets only a stub type is provided so the crate can live in the
//! workspace.

#[cfg(target_arch = "wasm32")]
mod element;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod video;

#[cfg(target_arch = "wasm32")]
pub use element::HoverVideoPlayerElement;
#[cfg(target_arch = "wasm32")]
pub use host::WebHost;
#[cfg(target_arch = "wasm32")]
pub use video::VideoElement;

/// CSS custom property holding the overlay fade duration.
pub const OVERLAY_TRANSITION_PROPERTY: &str = "--overlay-transition-duration";

/// Install a `tracing` subscriber that logs to the browser console.
///
/// Debug builds log at `DEBUG`, release builds at `INFO`. Calling it again is
/// harmless.
#[cfg(all(target_arch = "wasm32", feature = "console_log"))]
#[allow(
    unsafe_code,
    reason = "`#[wasm_bindgen]` exports expand to FFI glue containing `unsafe`"
)]
#[wasm_bindgen::prelude::wasm_bindgen(js_name = initConsoleLog)]
pub fn init_console_log() {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build(),
    );
    let _ = set_global_default(Registry::default().with(layer));
}

/// Stub type for non-wasm targets so the crate can be included in the workspace.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct HoverVideoPlayerElement;
