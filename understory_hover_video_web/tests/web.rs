// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser tests for `understory_hover_video_web`.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::future::TimeoutFuture;
use understory_hover_video_web::HoverVideoPlayerElement;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{CustomEvent, Document, Element, Event, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn player_element(attributes: &[(&str, &str)]) -> HtmlElement {
    let document = document();
    let element: HtmlElement = document.create_element("div").unwrap().unchecked_into();
    for (name, value) in attributes {
        element.set_attribute(name, value).unwrap();
    }
    let video = document.create_element("video").unwrap();
    element.append_child(&video).unwrap();
    document.body().unwrap().append_child(&element).unwrap();
    element
}

fn video(element: &HtmlElement) -> Element {
    element.query_selector("video").unwrap().unwrap()
}

fn thumbs(class: &str, count: usize) -> Vec<Element> {
    let document = document();
    (0..count)
        .map(|_| {
            let thumb = document.create_element("div").unwrap();
            thumb.set_class_name(class);
            document.body().unwrap().append_child(&thumb).unwrap();
            thumb
        })
        .collect()
}

fn count_events(target: &Element, name: &'static str) -> (Rc<Cell<u32>>, EventListener) {
    let count = Rc::new(Cell::new(0));
    let listener = {
        let count = count.clone();
        EventListener::new(target, name, move |_| count.set(count.get() + 1))
    };
    (count, listener)
}

/// Let observer callbacks and timers that are due within `ms` run.
async fn settle(ms: u32) {
    TimeoutFuture::new(ms).await;
}

fn fire(element: &HtmlElement, name: &str) {
    element.dispatch_event(&Event::new(name).unwrap()).unwrap();
}

#[wasm_bindgen_test]
fn connect_publishes_paused() {
    let element = player_element(&[]);
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();
    assert_eq!(
        element.get_attribute("data-playback-state").as_deref(),
        Some("paused")
    );
    assert_eq!(element.get_attribute("sizing-mode").as_deref(), Some("video"));
    player.disconnect();
}

#[wasm_bindgen_test]
fn hover_starts_loading_and_dispatches_events() {
    let element = player_element(&[]);
    let starts = Rc::new(Cell::new(0));
    let _listener = {
        let starts = starts.clone();
        EventListener::new(&element, "hoverstart", move |_| starts.set(starts.get() + 1))
    };
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();

    player.hover();
    player.hover();
    assert_eq!(starts.get(), 1);
    assert!(player.is_hovering());
    assert_eq!(player.playback_state(), "loading");
    assert!(element.has_attribute("data-is-hovering"));

    player.blur();
    assert_eq!(player.playback_state(), "paused");
    assert!(!element.has_attribute("data-is-hovering"));
    player.disconnect();
}

#[wasm_bindgen_test]
fn mouseenter_on_the_element_hovers() {
    let element = player_element(&[]);
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();

    fire(&element, "mouseenter");
    assert!(player.is_hovering());
    fire(&element, "mouseleave");
    assert!(!player.is_hovering());
    player.disconnect();
}

#[wasm_bindgen_test]
fn prevented_hoverstart_keeps_player_idle() {
    let element = player_element(&[]);
    let _listener = EventListener::new_with_options(
        &element,
        "hoverstart",
        EventListenerOptions::enable_prevent_default(),
        |event| event.prevent_default(),
    );
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();

    player.hover();
    assert!(!player.is_hovering());
    assert_eq!(player.playback_state(), "paused");
    player.disconnect();
}

#[wasm_bindgen_test]
fn controlled_attribute_ignores_native_events() {
    let element = player_element(&[("controlled", "")]);
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();

    fire(&element, "mouseenter");
    assert!(!player.is_hovering());

    player.hover();
    assert!(player.is_hovering());
    player.disconnect();
}

#[wasm_bindgen_test]
fn disconnect_removes_listeners() {
    let element = player_element(&[]);
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();
    player.disconnect();

    fire(&element, "mouseenter");
    assert!(!player.is_hovering());
}

#[wasm_bindgen_test]
fn property_setters_reflect() {
    let element = player_element(&[]);
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();

    player.set_restart_on_pause(true);
    player.set_playback_start_delay(250);
    player.set_sizing_mode("overlay").unwrap();
    assert!(player.restart_on_pause());
    assert_eq!(player.playback_start_delay(), 250);
    assert_eq!(player.sizing_mode(), "overlay");
    assert!(element.has_attribute("restart-on-pause"));
    assert_eq!(
        element.get_attribute("playback-start-delay").as_deref(),
        Some("250")
    );
    assert_eq!(element.get_attribute("sizing-mode").as_deref(), Some("overlay"));
    assert!(player.set_sizing_mode("sideways").is_err());
    player.disconnect();
}

#[wasm_bindgen_test]
fn getters_read_initial_attributes() {
    let element = player_element(&[
        ("unload-on-pause", ""),
        ("controlled", ""),
        ("playback-start-delay", "300"),
    ]);
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();

    assert!(player.unload_on_pause());
    assert!(player.controlled());
    assert!(!player.restart_on_pause());
    assert_eq!(player.playback_start_delay(), 300);
    assert_eq!(player.hover_target().length(), 1);
    assert_eq!(player.hover_target().get(0), JsValue::from(element.clone()));
    player.disconnect();
}

#[wasm_bindgen_test]
fn hover_target_property_accepts_elements_lists_and_null() {
    let element = player_element(&[("hover-target", ".unused")]);
    let thumbs = thumbs("listed-thumb", 2);
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();

    player.set_hover_target(thumbs[0].clone().into()).unwrap();
    assert_eq!(player.hover_target().length(), 1);
    assert!(!element.has_attribute("hover-target"));

    let list = document().query_selector_all(".listed-thumb").unwrap();
    player.set_hover_target(list.into()).unwrap();
    assert_eq!(player.hover_target().length(), 2);

    let thumb: HtmlElement = thumbs[1].clone().unchecked_into();
    fire(&thumb, "mouseenter");
    assert!(player.is_hovering());
    fire(&thumb, "mouseleave");

    player.set_hover_target(JsValue::NULL).unwrap();
    assert_eq!(player.hover_target().get(0), JsValue::from(element.clone()));
    assert!(player.set_hover_target(JsValue::from(7)).is_err());
    player.disconnect();
}

#[wasm_bindgen_test]
async fn forced_loading_attribute_starts_playback() {
    let element = player_element(&[]);
    let states = Rc::new(RefCell::new(Vec::new()));
    let _states = {
        let states = states.clone();
        EventListener::new(&element, "playbackstatechange", move |event| {
            let detail = event.dyn_ref::<CustomEvent>().unwrap().detail();
            states.borrow_mut().push(detail.as_string().unwrap());
        })
    };
    let (plays, _plays) = count_events(&video(&element), "play");
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();

    element.set_attribute("data-playback-state", "loading").unwrap();
    settle(10).await;
    assert_eq!(states.borrow().first().map(String::as_str), Some("loading"));
    assert_eq!(plays.get(), 1);
    player.disconnect();
}

#[wasm_bindgen_test]
async fn start_delay_plays_once_the_timeout_fires() {
    let element = player_element(&[("playback-start-delay", "50")]);
    let (plays, _plays) = count_events(&video(&element), "play");
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();

    player.hover();
    assert_eq!(player.playback_state(), "loading");
    settle(10).await;
    assert_eq!(plays.get(), 0);

    settle(90).await;
    assert_eq!(plays.get(), 1);
    player.disconnect();
}

#[wasm_bindgen_test]
async fn blur_before_the_delay_cancels_the_wake() {
    let element = player_element(&[]);
    let (plays, _plays) = count_events(&video(&element), "play");
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();
    element.set_attribute("playback-start-delay", "30").unwrap();
    settle(0).await;
    assert_eq!(player.playback_start_delay(), 30);

    player.hover();
    player.blur();
    settle(60).await;
    assert_eq!(plays.get(), 0);
    assert_eq!(player.playback_state(), "paused");
    player.disconnect();
}

#[wasm_bindgen_test]
async fn hover_target_attribute_is_observed() {
    let element = player_element(&[]);
    let thumbs = thumbs("observed-thumb", 2);
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();

    element.set_attribute("hover-target", ".observed-thumb").unwrap();
    settle(0).await;
    assert_eq!(player.hover_target().length(), 2);

    fire(&element, "mouseenter");
    assert!(!player.is_hovering());
    let thumb: HtmlElement = thumbs[0].clone().unchecked_into();
    fire(&thumb, "mouseenter");
    assert!(player.is_hovering());
    player.disconnect();
}

#[wasm_bindgen_test]
async fn unload_on_pause_attribute_is_observed() {
    let element = player_element(&[]);
    let player = HoverVideoPlayerElement::new(element.clone());
    player.connect();
    assert!(!player.unload_on_pause());

    element.set_attribute("unload-on-pause", "").unwrap();
    settle(0).await;
    assert!(player.unload_on_pause());
    assert_eq!(video(&element).get_attribute("preload").as_deref(), Some("metadata"));
    player.disconnect();
}
