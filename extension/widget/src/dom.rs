//! Host and page collaborators: element setters, document layout, window
//! resize events, and `setTimeout`.

use std::sync::Arc;
use std::time::Duration;

use expsel::{
    HostSink, Layout, ListenerId, ResizeEvents, Scheduler, Subscription, next_listener_id,
};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::bindings::{self, stringify_js_error};

/// Writes through the host's `CustomElement` setters.
#[derive(Debug, Default)]
pub struct ElementSink;

impl HostSink for ElementSink {
    fn set_height(&self, pixels: u32) {
        bindings::custom_element_set_height(pixels);
    }

    fn set_value(&self, value: Option<&str>) {
        let value = value.map(JsValue::from_str).unwrap_or(JsValue::NULL);
        bindings::custom_element_set_value(&value);
    }
}

/// Height of the whole document, which is what the host frame must fit.
#[derive(Debug, Default)]
pub struct DocumentLayout;

impl Layout for DocumentLayout {
    fn content_height(&self) -> u32 {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
            .map(|element| element.offset_height().max(0) as u32)
            .unwrap_or(0)
    }
}

/// `resize` listeners on the window.
#[derive(Debug, Default)]
pub struct WindowResize;

impl ResizeEvents for WindowResize {
    fn on_resize(&self, callback: Arc<dyn Fn()>) -> Subscription {
        let Some(window) = web_sys::window() else {
            return Subscription::detached();
        };

        let listener = Closure::<dyn Fn()>::new(move || callback());
        if let Err(err) =
            window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
        {
            warn!(error = %stringify_js_error(&err), "could not listen for resize");
            return Subscription::detached();
        }

        // The closure must outlive the registration; the dropper owns it.
        Subscription::new(
            next_listener_id(),
            Arc::new(move |_id: ListenerId| {
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    listener.as_ref().unchecked_ref(),
                );
            }),
        )
    }
}

/// Defers tasks with `window.setTimeout`.
#[derive(Debug, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let Some(window) = web_sys::window() else {
            task();
            return;
        };
        let callback = Closure::once_into_js(move || task());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(err) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            warn!(error = %stringify_js_error(&err), "setTimeout failed");
        }
    }
}
