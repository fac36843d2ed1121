//! Browser bindings.
//!
//! Exports `genKeyPair` and `genPreKey` for page scripts, plus helpers to
//! turn a config object into wg-quick text and back, and `genMesh` for a set
//! of configs that peer with each other. A bad private key never
//! throws: `genKeyPair` answers `{ error }` instead. Only a failing random
//! source throws.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wg_keys::conf::{generate_mesh, parse, render, MeshOptions};
use wg_keys::{generate_key_pair, generate_pre_key, KeyError, KeyPairResponse, WireGuardConfig};

// Plain objects, not `Map`s, even for flattened structs.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: KeyError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// `genKeyPair(privateKey?)` → `{ private, public }` or `{ error }`.
#[wasm_bindgen(js_name = genKeyPair)]
pub fn gen_key_pair(private_key: Option<String>) -> Result<JsValue, JsValue> {
    let response = generate_key_pair(private_key.as_deref()).map_err(js_error)?;
    to_js(&response)
}

/// `genPreKey()` → base64 preshared key.
#[wasm_bindgen(js_name = genPreKey)]
pub fn gen_pre_key() -> Result<String, JsValue> {
    generate_pre_key().map_err(js_error)
}

/// `publicKey(privateKey)` → base64 public key; throws on a bad key.
#[wasm_bindgen(js_name = publicKey)]
pub fn public_key(private_key: &str) -> Result<String, JsValue> {
    match generate_key_pair(Some(private_key)).map_err(js_error)? {
        KeyPairResponse::Pair { public, .. } => Ok(public),
        KeyPairResponse::Failure { error } => Err(JsValue::from_str(&error)),
    }
}

/// `renderConfig(config)` → wg-quick text.
#[wasm_bindgen(js_name = renderConfig)]
pub fn render_config(config: JsValue) -> Result<String, JsValue> {
    let config: WireGuardConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(render(&config))
}

/// `parseConfig(text)` → config object.
#[wasm_bindgen(js_name = parseConfig)]
pub fn parse_config(text: &str) -> Result<JsValue, JsValue> {
    let config = parse(text).map_err(js_error)?;
    to_js(&config)
}

/// `genMesh(options)` → array of config objects, one per node.
#[wasm_bindgen(js_name = genMesh)]
pub fn gen_mesh(options: JsValue) -> Result<JsValue, JsValue> {
    let options: MeshOptions = serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let configs = generate_mesh(&options).map_err(js_error)?;
    to_js(&configs)
}
