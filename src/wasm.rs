//! WASM bindings for browser-based mind map conversion.
//!
//! The page hands over the raw `.xmind` bytes and gets the
//! [`ConversionResult`](crate::ConversionResult) back as a JSON string; the
//! UI layer owns file pickers, downloads and history.

use wasm_bindgen::prelude::*;

use crate::convert::{ConvertOptions, Converter};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Convert an XMind archive to Markdown.
///
/// Returns the conversion result as JSON. Conversion failures are reported in
/// the JSON (`success: false`), not as a thrown exception.
#[wasm_bindgen]
pub fn convert_xmind(data: &[u8], file_name: &str) -> Result<String, JsValue> {
    convert_with(Converter::default(), data, file_name)
}

/// Convert an XMind archive, optionally with the metadata comment block.
#[wasm_bindgen]
pub fn convert_xmind_with_metadata(
    data: &[u8],
    file_name: &str,
    include_metadata: bool,
) -> Result<String, JsValue> {
    let converter = Converter::new(ConvertOptions::new().with_metadata(include_metadata));
    convert_with(converter, data, file_name)
}

fn convert_with(converter: Converter, data: &[u8], file_name: &str) -> Result<String, JsValue> {
    converter
        .convert_bytes(data, file_name)
        .to_json()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
