// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Host`] implementation over the DOM.

use std::fmt;
use std::rc::Weak;

use gloo_events::EventListener;
use understory_hover_video::attributes::{IS_HOVERING_ATTRIBUTE, parse_css_duration_ms};
use understory_hover_video::hover::HoverInput;
use understory_hover_video::{
    DEFAULT_OVERLAY_TRANSITION_MS, DefaultAction, DocumentListener, Host, PlayerEvent, Published,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Element, HtmlElement, Node, Performance, Window};

use crate::OVERLAY_TRANSITION_PROPERTY;
use crate::element::{Shared, Signal, deliver};

/// [`Host`] backed by a DOM element.
pub struct WebHost {
    element: HtmlElement,
    window: Option<Window>,
    performance: Option<Performance>,
    shared: Weak<Shared>,
    targets: Vec<(Element, Vec<EventListener>)>,
    touch: Option<EventListener>,
    click: Option<EventListener>,
}

impl fmt::Debug for WebHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebHost")
            .field("element", &self.element)
            .field("targets", &self.targets.len())
            .field("touch", &self.touch.is_some())
            .field("click", &self.click.is_some())
            .finish_non_exhaustive()
    }
}

impl WebHost {
    pub(crate) fn new(element: HtmlElement, shared: Weak<Shared>) -> Self {
        let window = web_sys::window();
        let performance = window.as_ref().and_then(Window::performance);
        Self {
            element,
            window,
            performance,
            shared,
            targets: Vec::new(),
            touch: None,
            click: None,
        }
    }

    /// The player element.
    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    fn set_attribute(&self, name: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.element.set_attribute(name, value),
            None => self.element.remove_attribute(name),
        };
        if let Err(err) = result {
            tracing::warn!(name, ?err, "failed to reflect attribute");
        }
    }

    fn document_listener(
        &self,
        event: &'static str,
        signal: fn(&web_sys::Event) -> Signal,
    ) -> Option<EventListener> {
        let window = self.window.as_ref()?;
        let shared = self.shared.clone();
        Some(EventListener::new(window, event, move |event| {
            deliver(&shared, signal(event));
        }))
    }
}

impl Host for WebHost {
    type Target = Element;

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() is a non-negative millisecond count far below u64::MAX"
    )]
    fn now(&self) -> u64 {
        self.performance.as_ref().map_or(0, |p| p.now() as u64)
    }

    fn host_target(&self) -> Element {
        self.element.clone().into()
    }

    fn query_targets(&mut self, selector: &str) -> Vec<Element> {
        let Some(document) = self.window.as_ref().and_then(Window::document) else {
            return Vec::new();
        };
        let list = match document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(selector, ?err, "invalid hover-target selector");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attach_target_listeners(&mut self, target: &Element) {
        let listeners = HoverInput::ALL
            .into_iter()
            .map(|input| {
                let shared = self.shared.clone();
                let element = target.clone();
                EventListener::new(target, input.event_name(), move |_event| {
                    deliver(&shared, Signal::Target(element.clone(), input));
                })
            })
            .collect();
        self.targets.push((target.clone(), listeners));
    }

    fn detach_target_listeners(&mut self, target: &Element) {
        // Dropping the listeners removes them.
        self.targets.retain(|(element, _)| element != target);
    }

    fn set_document_listener(&mut self, listener: DocumentListener, active: bool) {
        match (listener, active) {
            (DocumentListener::TouchStart, true) => {
                self.touch = self.document_listener("touchstart", |event| {
                    Signal::DocumentTouch(event.target().and_then(|t| t.dyn_into::<Node>().ok()))
                });
            }
            (DocumentListener::TouchStart, false) => self.touch = None,
            (DocumentListener::Click, true) => {
                self.click = self.document_listener("click", |_| Signal::DocumentClick);
            }
            (DocumentListener::Click, false) => self.click = None,
        }
    }

    fn dispatch(&mut self, event: &PlayerEvent) -> DefaultAction {
        let init = CustomEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(event.is_cancelable());
        if let PlayerEvent::PlaybackStateChange(state) = event {
            init.set_detail(&JsValue::from_str(state.as_str()));
        }
        let dispatched = CustomEvent::new_with_event_init_dict(event.name(), &init)
            .and_then(|custom| self.element.dispatch_event(&custom));
        match dispatched {
            Ok(true) => DefaultAction::Run,
            Ok(false) => DefaultAction::Prevented,
            Err(err) => {
                tracing::warn!(event = event.name(), ?err, "failed to dispatch event");
                DefaultAction::Run
            }
        }
    }

    fn publish(&mut self, change: Published) {
        match change {
            Published::PlaybackState(state) => {
                self.set_attribute("data-playback-state", Some(state.as_str()));
            }
            Published::IsHovering(hovering) => {
                self.set_attribute(IS_HOVERING_ATTRIBUTE, hovering.then_some(""));
            }
            Published::Reflect { attribute, value } => {
                self.set_attribute(attribute.name(), value.as_deref());
            }
        }
    }

    fn overlay_transition_ms(&self) -> u64 {
        self.window
            .as_ref()
            .and_then(|w| w.get_computed_style(&self.element).ok().flatten())
            .and_then(|style| style.get_property_value(OVERLAY_TRANSITION_PROPERTY).ok())
            .and_then(|value| parse_css_duration_ms(&value))
            .unwrap_or(DEFAULT_OVERLAY_TRANSITION_MS)
    }
}
