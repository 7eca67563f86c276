// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The exported element controller and its event inbox.

#![allow(
    unsafe_code,
    reason = "`#[wasm_bindgen]` exports expand to FFI glue containing `unsafe`"
)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use understory_hover_video::attributes::{Attribute, IS_HOVERING_ATTRIBUTE};
use understory_hover_video::hover::HoverInput;
use understory_hover_video::{
    Host, HoverVideoPlayer, PlayAttempt, PlayError, PlaybackState, PlayerConfig, SizingMode,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, HtmlElement, HtmlMediaElement, HtmlVideoElement, MutationObserver,
    MutationObserverInit, Node,
};

use crate::host::WebHost;
use crate::video::VideoElement;

type Player = HoverVideoPlayer<WebHost, VideoElement>;

/// Something the player has to react to.
pub(crate) enum Signal {
    Target(Element, HoverInput),
    DocumentTouch(Option<Node>),
    DocumentClick,
    PlaySettled(PlayAttempt, Result<(), PlayError>),
    Emptied(HtmlMediaElement),
    /// Attributes or children of the player element changed.
    Mutations,
    Timer,
    Run(Box<dyn FnOnce(&mut Player)>),
}

struct Wake {
    deadline: u64,
    _timeout: Timeout,
}

struct Observer {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

/// What property getters report while the player is busy with a step.
#[derive(Default)]
struct View {
    config: PlayerConfig,
    targets: Vec<Element>,
}

impl View {
    fn of(player: &Player) -> Self {
        Self {
            config: *player.config(),
            targets: player.hover_targets().to_vec(),
        }
    }
}

pub(crate) struct Shared {
    element: HtmlElement,
    player: RefCell<Player>,
    view: RefCell<View>,
    inbox: RefCell<VecDeque<Signal>>,
    wake: RefCell<Option<Wake>>,
    observer: RefCell<Option<Observer>>,
}

/// Queue `signal` and process everything queued, unless a step is already
/// running further up the stack, in which case that step picks it up.
pub(crate) fn deliver(shared: &Weak<Shared>, signal: Signal) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    shared.inbox.borrow_mut().push_back(signal);
    pump(&shared);
}

fn pump(shared: &Rc<Shared>) {
    let Ok(mut player) = shared.player.try_borrow_mut() else {
        return;
    };
    loop {
        let next = shared.inbox.borrow_mut().pop_front();
        match next {
            Some(signal) => handle(shared, &mut player, signal),
            None => {
                player.poll_timers();
                if shared.inbox.borrow().is_empty() {
                    break;
                }
            }
        }
    }
    *shared.view.borrow_mut() = View::of(&player);
    schedule_wake(shared, &player);
}

fn handle(shared: &Rc<Shared>, player: &mut Player, signal: Signal) {
    match signal {
        Signal::Target(target, input) => player.handle_target_input(&target, input),
        Signal::DocumentTouch(node) => player.handle_document_touch(|target| {
            node.as_ref().is_some_and(|node| target.contains(Some(node)))
        }),
        Signal::DocumentClick => player.handle_document_click(),
        Signal::PlaySettled(attempt, result) => player.play_settled(attempt, result),
        Signal::Emptied(media) => {
            let current = player
                .media()
                .is_some_and(|m| AsRef::<HtmlMediaElement>::as_ref(m.video()) == &media);
            if current {
                let generation = player.media_generation();
                player.media_emptied(generation);
            }
        }
        Signal::Mutations => sync_from_dom(shared, player),
        // Due timers run at the end of every step.
        Signal::Timer => *shared.wake.borrow_mut() = None,
        Signal::Run(f) => f(player),
    }
}

/// Re-read every observed attribute and the relevant children.
///
/// Unchanged values are no-ops in the player, so there is no need to look at
/// individual mutation records.
fn sync_from_dom(shared: &Rc<Shared>, player: &mut Player) {
    for attribute in Attribute::ALL {
        let value = shared.element.get_attribute(attribute.name());
        player.attribute_changed(attribute.name(), value.as_deref());
    }

    let video =
        child(&shared.element, "video").and_then(|v| v.dyn_into::<HtmlVideoElement>().ok());
    let unchanged = match (player.media(), &video) {
        (Some(current), Some(video)) => current.video() == video,
        (None, None) => true,
        _ => false,
    };
    if !unchanged {
        let media = video.map(|video| VideoElement::new(video, Rc::downgrade(shared)));
        drop(player.replace_media(media));
    }

    player.set_has_paused_overlay(child(&shared.element, "[slot='paused-overlay']").is_some());
}

/// Normalize a `hoverTarget` assignment; an empty result means the player
/// element.
fn hover_targets_from_js(value: JsValue) -> Result<Vec<Element>, JsError> {
    if value.is_null() || value.is_undefined() {
        return Ok(Vec::new());
    }
    if let Some(element) = value.dyn_ref::<Element>() {
        return Ok(vec![element.clone()]);
    }
    let Some(items) = js_sys::try_iter(&value).map_err(|_| not_a_target())? else {
        return Err(not_a_target());
    };
    let mut targets = Vec::new();
    for item in items {
        let item = item.map_err(|_| not_a_target())?;
        match item.dyn_into::<Element>() {
            Ok(element) => targets.push(element),
            Err(_) => return Err(not_a_target()),
        }
    }
    Ok(targets)
}

fn not_a_target() -> JsError {
    JsError::new("hoverTarget must be an Element, an iterable of Elements, or null")
}

fn child(element: &HtmlElement, selector: &str) -> Option<Element> {
    element
        .query_selector(&format!(":scope > {selector}"))
        .ok()
        .flatten()
}

fn schedule_wake(shared: &Rc<Shared>, player: &Player) {
    let mut wake = shared.wake.borrow_mut();
    let Some(deadline) = player.next_deadline() else {
        *wake = None;
        return;
    };
    if wake.as_ref().is_some_and(|w| w.deadline == deadline) {
        return;
    }
    let delay = deadline.saturating_sub(player.host().now());
    let weak = Rc::downgrade(shared);
    *wake = Some(Wake {
        deadline,
        _timeout: Timeout::new(u32::try_from(delay).unwrap_or(u32::MAX), move || {
            deliver(&weak, Signal::Timer);
        }),
    });
}

/// A hover video player attached to a DOM element.
#[wasm_bindgen]
pub struct HoverVideoPlayerElement {
    shared: Rc<Shared>,
}

impl fmt::Debug for HoverVideoPlayerElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoverVideoPlayerElement")
            .field("element", &self.shared.element)
            .finish_non_exhaustive()
    }
}

#[wasm_bindgen]
impl HoverVideoPlayerElement {
    /// Wrap `element`. Call [`connect`](Self::connect) to start it.
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlElement) -> Self {
        let shared = Rc::new_cyclic(|weak| Shared {
            element: element.clone(),
            player: RefCell::new(HoverVideoPlayer::new(
                WebHost::new(element.clone(), weak.clone()),
                PlayerConfig::default(),
            )),
            view: RefCell::new(View::default()),
            inbox: RefCell::new(VecDeque::new()),
            wake: RefCell::new(None),
            observer: RefCell::new(None),
        });
        Self { shared }
    }

    /// Sync with the DOM, install listeners, and start observing changes.
    pub fn connect(&self) {
        self.send(Signal::Mutations);
        self.run(Player::start);
        if self.shared.observer.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(&self.shared);
        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_records, _observer| deliver(&weak, Signal::Mutations),
        );
        let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                tracing::warn!(?err, "attribute changes will not be observed");
                return;
            }
        };
        let init = MutationObserverInit::new();
        init.set_attributes(true);
        init.set_child_list(true);
        if let Err(err) = observer.observe_with_options(&self.shared.element, &init) {
            tracing::warn!(?err, "attribute changes will not be observed");
            return;
        }
        *self.shared.observer.borrow_mut() = Some(Observer {
            observer,
            _callback: callback,
        });
    }

    /// Remove every listener and timer, and pause.
    pub fn disconnect(&self) {
        if let Some(observer) = self.shared.observer.borrow_mut().take() {
            observer.observer.disconnect();
        }
        self.run(Player::stop);
        *self.shared.wake.borrow_mut() = None;
    }

    /// Start hovering, as if a hover target had been entered.
    pub fn hover(&self) {
        self.run(Player::hover);
    }

    /// Stop hovering, as if the hover target had been left.
    pub fn blur(&self) {
        self.run(Player::blur);
    }

    /// The published playback state.
    #[wasm_bindgen(getter = playbackState)]
    pub fn playback_state(&self) -> String {
        self.shared
            .element
            .get_attribute("data-playback-state")
            .unwrap_or_else(|| PlaybackState::Paused.as_str().to_owned())
    }

    /// Whether a hover is in progress.
    #[wasm_bindgen(getter = isHovering)]
    pub fn is_hovering(&self) -> bool {
        self.shared.element.has_attribute(IS_HOVERING_ATTRIBUTE)
    }

    /// The elements whose hover input drives playback.
    #[wasm_bindgen(getter = hoverTarget)]
    pub fn hover_target(&self) -> js_sys::Array {
        self.inspect(|_, targets| targets.iter().collect())
    }

    /// Replace the hover targets with an element, any iterable of elements
    /// (array, `NodeList`, `HTMLCollection`), or `null` for the player element.
    ///
    /// This removes the `hover-target` attribute.
    #[wasm_bindgen(setter = hoverTarget)]
    pub fn set_hover_target(&self, target: JsValue) -> Result<(), JsError> {
        let targets = hover_targets_from_js(target)?;
        self.run(move |player| player.set_hover_targets(targets));
        Ok(())
    }

    /// Whether `restart-on-pause` is set.
    #[wasm_bindgen(getter = restartOnPause)]
    pub fn restart_on_pause(&self) -> bool {
        self.inspect(|config, _| config.restart_on_pause)
    }

    /// Set `restart-on-pause`.
    #[wasm_bindgen(setter = restartOnPause)]
    pub fn set_restart_on_pause(&self, enabled: bool) {
        self.run(move |player| player.set_restart_on_pause(enabled));
    }

    /// Whether `unload-on-pause` is set.
    #[wasm_bindgen(getter = unloadOnPause)]
    pub fn unload_on_pause(&self) -> bool {
        self.inspect(|config, _| config.unload_on_pause)
    }

    /// Set `unload-on-pause`.
    #[wasm_bindgen(setter = unloadOnPause)]
    pub fn set_unload_on_pause(&self, enabled: bool) {
        self.run(move |player| player.set_unload_on_pause(enabled));
    }

    /// `playback-start-delay` in milliseconds.
    #[wasm_bindgen(getter = playbackStartDelay)]
    pub fn playback_start_delay(&self) -> u32 {
        self.inspect(|config, _| {
            u32::try_from(config.playback_start_delay_ms).unwrap_or(u32::MAX)
        })
    }

    /// Set `playback-start-delay` in milliseconds.
    #[wasm_bindgen(setter = playbackStartDelay)]
    pub fn set_playback_start_delay(&self, delay_ms: u32) {
        self.run(move |player| player.set_playback_start_delay(u64::from(delay_ms)));
    }

    /// Whether `controlled` is set.
    #[wasm_bindgen(getter)]
    pub fn controlled(&self) -> bool {
        self.inspect(|config, _| config.controlled)
    }

    /// Set `controlled`.
    #[wasm_bindgen(setter)]
    pub fn set_controlled(&self, controlled: bool) {
        self.run(move |player| player.set_controlled(controlled));
    }

    /// The current `sizing-mode`.
    #[wasm_bindgen(getter = sizingMode)]
    pub fn sizing_mode(&self) -> String {
        self.inspect(|config, _| config.sizing_mode.as_str().to_owned())
    }

    /// Set `sizing-mode`.
    #[wasm_bindgen(setter = sizingMode)]
    pub fn set_sizing_mode(&self, mode: &str) -> Result<(), JsError> {
        let mode: SizingMode = mode.parse()?;
        self.run(move |player| player.set_sizing_mode(mode));
        Ok(())
    }

    /// Read from the player, or from the last completed step while a step
    /// is in progress.
    fn inspect<T>(&self, f: impl FnOnce(&PlayerConfig, &[Element]) -> T) -> T {
        match self.shared.player.try_borrow() {
            Ok(player) => f(player.config(), player.hover_targets()),
            Err(_) => {
                let view = self.shared.view.borrow();
                f(&view.config, &view.targets)
            }
        }
    }

    fn run(&self, f: impl FnOnce(&mut Player) + 'static) {
        self.send(Signal::Run(Box::new(f)));
    }

    fn send(&self, signal: Signal) {
        deliver(&Rc::downgrade(&self.shared), signal);
    }
}
