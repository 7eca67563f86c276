// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `<video>` side of the binding.

use std::fmt;
use std::rc::Weak;

use gloo_events::EventListener;
use understory_hover_video::{MediaElement, PlayAttempt, PlayError, Preload, ReadyState};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{DomException, Element, HtmlVideoElement};

use crate::element::{Shared, Signal, deliver};

/// [`MediaElement`] backed by a `<video>` element.
///
/// Sources are the element's `<source>` children.
pub struct VideoElement {
    video: HtmlVideoElement,
    shared: Weak<Shared>,
    _emptied: EventListener,
}

impl fmt::Debug for VideoElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoElement")
            .field("video", &self.video)
            .finish_non_exhaustive()
    }
}

impl VideoElement {
    pub(crate) fn new(video: HtmlVideoElement, shared: Weak<Shared>) -> Self {
        let emptied = {
            let shared = shared.clone();
            let element = video.clone();
            EventListener::new(&video, "emptied", move |_event| {
                deliver(&shared, Signal::Emptied(element.clone()));
            })
        };
        Self {
            video,
            shared,
            _emptied: emptied,
        }
    }

    /// The wrapped element.
    pub fn video(&self) -> &HtmlVideoElement {
        &self.video
    }

    fn source_children(&self) -> Vec<Element> {
        let children = self.video.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter(|child| child.tag_name().eq_ignore_ascii_case("source"))
            .collect()
    }
}

fn play_error(err: &JsValue) -> PlayError {
    match err.dyn_ref::<DomException>() {
        Some(exception) => match exception.name().as_str() {
            "AbortError" => PlayError::Aborted,
            "NotAllowedError" => PlayError::NotAllowed,
            name => PlayError::Failed(format!("{name}: {}", exception.message())),
        },
        None => PlayError::Failed(format!("{err:?}")),
    }
}

impl MediaElement for VideoElement {
    type Source = Element;

    fn play(&mut self, attempt: PlayAttempt) {
        let shared = self.shared.clone();
        match self.video.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                let result = JsFuture::from(promise)
                    .await
                    .map(drop)
                    .map_err(|err| play_error(&err));
                deliver(&shared, Signal::PlaySettled(attempt, result));
            }),
            Err(err) => deliver(&shared, Signal::PlaySettled(attempt, Err(play_error(&err)))),
        }
    }

    fn pause(&mut self) {
        if let Err(err) = self.video.pause() {
            tracing::warn!(?err, "pause() failed");
        }
    }

    fn load(&mut self) {
        self.video.load();
    }

    fn current_time(&self) -> f64 {
        self.video.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.video.set_current_time(seconds);
    }

    fn muted(&self) -> bool {
        self.video.muted()
    }

    fn set_muted(&mut self, muted: bool) {
        self.video.set_muted(muted);
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::from_u16(self.video.ready_state())
    }

    fn preload(&self) -> Option<Preload> {
        Preload::from_attribute(&self.video.get_attribute("preload")?)
    }

    fn set_preload(&mut self, preload: Preload) {
        if let Err(err) = self.video.set_attribute("preload", preload.as_str()) {
            tracing::warn!(?err, "failed to set preload");
        }
    }

    fn take_src(&mut self) -> Option<String> {
        let src = self.video.get_attribute("src")?;
        if let Err(err) = self.video.remove_attribute("src") {
            tracing::warn!(?err, "failed to remove src");
        }
        Some(src)
    }

    fn set_src(&mut self, src: String) {
        if let Err(err) = self.video.set_attribute("src", &src) {
            tracing::warn!(?err, "failed to restore src");
        }
    }

    fn take_sources(&mut self) -> Vec<Element> {
        let sources = self.source_children();
        for source in &sources {
            source.remove();
        }
        sources
    }

    fn append_source(&mut self, source: Element) {
        if let Err(err) = self.video.append_child(&source) {
            tracing::warn!(?err, "failed to restore <source>");
        }
    }
}
