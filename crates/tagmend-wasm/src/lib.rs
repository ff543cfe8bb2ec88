//! WASM bindings for tagmend.
//!
//! Exposes `tokenize()`, `fix()` and `render()` to JavaScript via
//! wasm-bindgen. Errors are thrown as JS errors.

use tagmend_fixer::{balance_with_report, BalanceReport, TagSequence};
use tagmend_lexer::{LexerError, Tokenizer};
use wasm_bindgen::prelude::*;

/// Tokenize HTML into an array of tag objects such as
/// `{ kind: "opening", element: "p", attributes: [] }`.
///
/// With `strict`, an unterminated comment or malformed tag throws instead
/// of ending the array early.
#[wasm_bindgen]
pub fn tokenize(source: &str, strict: bool) -> Result<JsValue, JsError> {
    let tags = native_tokenize(source, strict).map_err(|e| JsError::new(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&tags).map_err(|e| JsError::new(&e.to_string()))
}

/// Repair the nesting of `source`.
///
/// Returns `{ output: string, synthesized: number, discarded: number }`,
/// where `output` is the indented rendering of the repaired tags.
#[wasm_bindgen]
pub fn fix(source: &str) -> Result<JsValue, JsError> {
    let (output, report) = native_fix(source);

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"output".into(), &output.into())
        .map_err(|_| JsError::new("Failed to set output property"))?;
    js_sys::Reflect::set(
        &js_obj,
        &"synthesized".into(),
        &(report.synthesized as u32).into(),
    )
    .map_err(|_| JsError::new("Failed to set synthesized property"))?;
    js_sys::Reflect::set(&js_obj, &"discarded".into(), &(report.discarded as u32).into())
        .map_err(|_| JsError::new("Failed to set discarded property"))?;

    Ok(js_obj.into())
}

/// Render `source` one tag per line without repairing it.
#[wasm_bindgen]
pub fn render(source: &str) -> String {
    tagmend_render::render(&Tokenizer::tokenize(source))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn native_tokenize(source: &str, strict: bool) -> Result<TagSequence, LexerError> {
    if strict {
        Ok(Tokenizer::tokenize_strict(source)?.into())
    } else {
        Ok(Tokenizer::tokenize(source).into())
    }
}

fn native_fix(source: &str) -> (String, BalanceReport) {
    let (fixed, report) = balance_with_report(Tokenizer::tokenize(source).into());
    (tagmend_render::render(&fixed), report)
}
