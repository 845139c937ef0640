//! `gapi`-backed auth provider and listing source.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use expsel::protocol::{
    ANALYTICS_DISCOVERY_DOC, ANALYTICS_READONLY_SCOPE, ListingPath, ListingResponse, WidgetConfig,
};
use expsel::{AuthProvider, Error, ExperimentSource, Result};
use serde::Serialize;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::bindings::{self, stringify_js_error};

const CLIENT_LIBRARIES: &str = "client:auth2";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInit<'a> {
    discovery_docs: [&'a str; 1],
    client_id: &'a str,
    scope: &'a str,
}

#[derive(Serialize)]
struct ClientRequest {
    path: String,
}

/// Google sign-in through `gapi.auth2`.
///
/// Status changes are forwarded to the handler installed with
/// [`GapiAuth::on_status`], once the client has been initialised.
#[derive(Default)]
pub struct GapiAuth {
    handler: RefCell<Option<Rc<dyn Fn(bool)>>>,
    listener: RefCell<Option<Closure<dyn FnMut(bool)>>>,
}

impl GapiAuth {
    pub fn on_status(&self, handler: impl Fn(bool) + 'static) {
        *self.handler.borrow_mut() = Some(Rc::new(handler));
    }
}

#[async_trait(?Send)]
impl AuthProvider for GapiAuth {
    async fn initialize(&self, config: &WidgetConfig) -> Result<()> {
        let loaded = js_sys::Promise::new(&mut |resolve, reject| {
            if let Err(err) = bindings::gapi_load(CLIENT_LIBRARIES, &resolve) {
                let _ = reject.call1(&JsValue::NULL, &err);
            }
        });
        JsFuture::from(loaded)
            .await
            .map_err(|err| Error::Auth(format!("gapi.load failed: {}", stringify_js_error(&err))))?;

        let args = serde_wasm_bindgen::to_value(&ClientInit {
            discovery_docs: [ANALYTICS_DISCOVERY_DOC],
            client_id: &config.client_id,
            scope: ANALYTICS_READONLY_SCOPE,
        })
        .map_err(|err| Error::Auth(err.to_string()))?;
        let init = bindings::gapi_client_init(&args).map_err(|err| Error::Auth(stringify_js_error(&err)))?;
        JsFuture::from(init)
            .await
            .map_err(|err| Error::Auth(stringify_js_error(&err)))?;
        debug!("gapi client initialised");

        let handler = self.handler.borrow().clone();
        if let Some(handler) = handler {
            let auth = bindings::get_auth_instance().map_err(|err| Error::Auth(stringify_js_error(&err)))?;
            let listener = Closure::<dyn FnMut(bool)>::new(move |signed_in: bool| handler(signed_in));
            auth.is_signed_in().listen(&listener);
            *self.listener.borrow_mut() = Some(listener);
        }
        Ok(())
    }

    fn is_signed_in(&self) -> bool {
        bindings::get_auth_instance()
            .map(|auth| auth.is_signed_in().get())
            .unwrap_or(false)
    }

    fn sign_in(&self) {
        match bindings::get_auth_instance() {
            Ok(auth) => settle("sign-in", auth.sign_in()),
            Err(err) => warn!(error = %stringify_js_error(&err), "sign-in requested before auth was ready"),
        }
    }

    fn sign_out(&self) {
        match bindings::get_auth_instance() {
            Ok(auth) => settle("sign-out", auth.sign_out()),
            Err(err) => warn!(error = %stringify_js_error(&err), "sign-out requested before auth was ready"),
        }
    }
}

/// Awaits an interaction promise in the background; the outcome arrives
/// through the status listener, so only failures are of interest here.
fn settle(action: &'static str, promise: js_sys::Promise) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = JsFuture::from(promise).await {
            warn!(action, error = %stringify_js_error(&err), "auth interaction did not complete");
        }
    });
}

/// Experiment listing through `gapi.client.request`.
#[derive(Debug, Default)]
pub struct GapiSource;

#[async_trait(?Send)]
impl ExperimentSource for GapiSource {
    async fn list_experiments(&self, path: &ListingPath) -> Result<ListingResponse> {
        let args = serde_wasm_bindgen::to_value(&ClientRequest {
            path: path.to_string(),
        })
        .map_err(|err| Error::Transport(err.to_string()))?;
        let request = bindings::gapi_client_request(&args)
            .map_err(|err| Error::Transport(stringify_js_error(&err)))?;

        let response = js_sys::Promise::new(&mut |resolve, _reject| {
            let callback = Closure::once_into_js(move |body: JsValue| {
                let _ = resolve.call1(&JsValue::NULL, &body);
            });
            request.execute(callback.unchecked_ref());
        });
        let body = JsFuture::from(response)
            .await
            .map_err(|err| Error::Transport(stringify_js_error(&err)))?;

        // Go through JSON text so payload problems surface as `Error::Json`.
        let text = js_sys::JSON::stringify(&body)
            .ok()
            .and_then(|text| text.as_string())
            .ok_or_else(|| Error::Transport("listing response is not serialisable".into()))?;
        Ok(serde_json::from_str(&text)?)
    }
}
