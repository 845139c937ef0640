//! Browser entry point of the experiment selector.
//!
//! The page loads this module, then calls [`bootstrap`] with a render
//! callback. Once the host hands over its element, the widget mounts, and
//! every state change invokes `render(view, handle)`; the page draws `view`
//! and reports user input back through `handle`.

mod bindings;
mod dom;
mod element;
mod gapi;
mod logging;

use std::rc::{Rc, Weak};
use std::sync::Arc;

use expsel::{Collaborators, ExperimentSelector};
use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::bindings::stringify_js_error;
use crate::dom::{DocumentLayout, ElementSink, TimeoutScheduler, WindowResize};
use crate::element::ElementInit;
use crate::gapi::{GapiAuth, GapiSource};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logging::init_logging();
}

/// Registers with the host. `render` is called as `render(view, handle)`.
#[wasm_bindgen]
pub fn bootstrap(render: js_sys::Function) {
    let on_init = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |element: JsValue, _context: JsValue| {
        let init = match serde_wasm_bindgen::from_value::<ElementInit>(element) {
            Ok(init) => init,
            Err(err) => {
                warn!(error = %err, "unreadable element; starting empty");
                ElementInit::default()
            }
        };
        let widget = Widget::create(init, render.clone());
        widget.listen_for_disabled();
        widget.mount();
    });
    bindings::custom_element_init(&on_init);
    on_init.forget();
}

struct Widget {
    this: Weak<Widget>,
    selector: ExperimentSelector,
    render: js_sys::Function,
}

impl Widget {
    fn create(init: ElementInit, render: js_sys::Function) -> Rc<Self> {
        let auth = Arc::new(GapiAuth::default());
        let collaborators = Collaborators {
            auth: auth.clone(),
            source: Arc::new(GapiSource),
            sink: Arc::new(ElementSink),
            layout: Arc::new(DocumentLayout),
            resize: Arc::new(WindowResize),
            scheduler: Arc::new(TimeoutScheduler),
        };
        let widget = Rc::new_cyclic(|this| Self {
            this: this.clone(),
            selector: ExperimentSelector::new(init.into_options(), collaborators),
            render,
        });

        let weak = Rc::downgrade(&widget);
        auth.on_status(move |signed_in| {
            if let Some(widget) = weak.upgrade() {
                spawn_local(async move {
                    widget.selector.on_status_change(signed_in).await;
                    widget.render();
                });
            }
        });
        widget
    }

    fn listen_for_disabled(&self) {
        let weak = self.this.clone();
        let on_disabled = Closure::<dyn FnMut(JsValue)>::new(move |disabled: JsValue| {
            if let Some(widget) = weak.upgrade() {
                widget.selector.set_disabled(disabled.is_truthy());
                widget.render();
            }
        });
        bindings::custom_element_on_disabled_changed(&on_disabled);
        on_disabled.forget();
    }

    fn mount(&self) {
        let Some(widget) = self.this.upgrade() else {
            return;
        };
        // Draw the restored selection right away; the catalog follows.
        self.render();
        spawn_local(async move {
            match widget.selector.mount().await {
                Ok(()) => info!("experiment selector mounted"),
                Err(err) => error!(error = %err, "authentication could not be initialised"),
            }
            widget.render();
        });
    }

    fn render(&self) {
        let Some(this) = self.this.upgrade() else {
            return;
        };
        let view = match serde_wasm_bindgen::to_value(&self.selector.view()) {
            Ok(view) => view,
            Err(err) => {
                warn!(error = %err, "view could not be converted");
                return;
            }
        };
        let handle = JsValue::from(WidgetHandle { widget: this });
        if let Err(err) = self.render.call2(&JsValue::NULL, &view, &handle) {
            warn!(error = %stringify_js_error(&err), "render callback failed");
        }
    }
}

/// What the page holds to report user input.
#[wasm_bindgen]
pub struct WidgetHandle {
    widget: Rc<Widget>,
}

#[wasm_bindgen]
impl WidgetHandle {
    /// Experiment picked by id; `undefined` clears it.
    #[wasm_bindgen(js_name = selectExperiment)]
    pub fn select_experiment(&self, id: Option<String>) {
        self.widget.selector.select_experiment(id.as_deref());
        self.widget.render();
    }

    /// Variant picked by its index option value; `undefined` clears it.
    #[wasm_bindgen(js_name = selectVariant)]
    pub fn select_variant(&self, index: Option<String>) {
        self.widget.selector.select_variant(index.as_deref());
        self.widget.render();
    }

    /// Either menu opened: refresh the listing.
    #[wasm_bindgen(js_name = menuOpened)]
    pub fn menu_opened(&self) {
        let widget = self.widget.clone();
        spawn_local(async move {
            widget.selector.menu_opened().await;
            widget.render();
        });
    }

    #[wasm_bindgen(js_name = signIn)]
    pub fn sign_in(&self) {
        self.widget.selector.sign_in();
    }

    #[wasm_bindgen(js_name = signOut)]
    pub fn sign_out(&self) {
        self.widget.selector.sign_out();
        self.widget.render();
    }

    /// Current render model, for pages that redraw on their own schedule.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.widget.selector.view()).map_err(JsValue::from)
    }

    /// The encoded value the host currently holds, or `null`.
    #[wasm_bindgen(js_name = currentValue)]
    pub fn current_value(&self) -> Option<String> {
        self.widget.selector.current_value()
    }

    pub fn unmount(&self) {
        self.widget.selector.unmount();
    }
}
