//! Imports from the embedding page: the host's `CustomElement` API and the
//! Google API client loader.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = CustomElement, js_name = init)]
    pub fn custom_element_init(callback: &Closure<dyn FnMut(JsValue, JsValue)>);

    #[wasm_bindgen(js_namespace = CustomElement, js_name = onDisabledChanged)]
    pub fn custom_element_on_disabled_changed(callback: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(js_namespace = CustomElement, js_name = setHeight)]
    pub fn custom_element_set_height(height: u32);

    /// `value` is a string or `null`.
    #[wasm_bindgen(js_namespace = CustomElement, js_name = setValue)]
    pub fn custom_element_set_value(value: &JsValue);

    #[wasm_bindgen(catch, js_namespace = gapi, js_name = load)]
    pub fn gapi_load(libraries: &str, callback: &js_sys::Function) -> Result<(), JsValue>;

    /// Returns a thenable; awaited through `JsFuture`.
    #[wasm_bindgen(catch, js_namespace = ["gapi", "client"], js_name = init)]
    pub fn gapi_client_init(args: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["gapi", "client"], js_name = request)]
    pub fn gapi_client_request(args: &JsValue) -> Result<ClientRequest, JsValue>;

    pub type ClientRequest;

    /// Invokes `callback` once with the parsed response body.
    #[wasm_bindgen(method)]
    pub fn execute(this: &ClientRequest, callback: &js_sys::Function);

    pub type GoogleAuth;

    #[wasm_bindgen(catch, js_namespace = ["gapi", "auth2"], js_name = getAuthInstance)]
    pub fn get_auth_instance() -> Result<GoogleAuth, JsValue>;

    #[wasm_bindgen(method, js_name = signIn)]
    pub fn sign_in(this: &GoogleAuth) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = signOut)]
    pub fn sign_out(this: &GoogleAuth) -> js_sys::Promise;

    #[wasm_bindgen(method, getter, js_name = isSignedIn)]
    pub fn is_signed_in(this: &GoogleAuth) -> SignedInStatus;

    pub type SignedInStatus;

    #[wasm_bindgen(method)]
    pub fn get(this: &SignedInStatus) -> bool;

    #[wasm_bindgen(method)]
    pub fn listen(this: &SignedInStatus, listener: &Closure<dyn FnMut(bool)>);
}

pub fn stringify_js_error(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| js_sys::JSON::stringify(err).ok()?.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}
