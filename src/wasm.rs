use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::cluster::ClusterConfig;
use crate::pipeline::{analyze_bytes, encode_png};

/// Quantize an encoded image to `n_colors` colors and rank them.
///
/// The returned object carries:
/// - `image`: the PNG-encoded quantized image (`Uint8Array`)
/// - `palette`: the centroid colors as `#rrggbb` strings, one per cluster
/// - `colors`: the `top_n` most frequent colors (`0` = all) as
///   `{ hex, rgba, percentage }` objects, most frequent first
#[wasm_bindgen]
pub fn analyze(
    input: Vec<u8>,
    n_colors: usize,
    top_n: usize,
    iterations: usize,
    seed: Option<u32>,
) -> Result<Object, JsValue> {
    let mut config = ClusterConfig::new(n_colors, iterations);
    config.seed = seed.map(u64::from);

    let analysis = analyze_bytes(&input, &config, top_n).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let png = encode_png(&analysis.quantized).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let palette_js = Array::new();
    for c in &analysis.centroids {
        palette_js.push(&JsValue::from_str(&c.to_hex()));
    }

    let colors_js = Array::new();
    for detail in &analysis.colors {
        let entry = Object::new();
        Reflect::set(&entry, &JsValue::from_str("hex"), &JsValue::from_str(&detail.hex))?;
        Reflect::set(&entry, &JsValue::from_str("rgba"), &JsValue::from_str(&detail.rgba))?;
        Reflect::set(&entry, &JsValue::from_str("percentage"), &JsValue::from_f64(detail.percentage))?;
        colors_js.push(&entry);
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("image"), &Uint8Array::from(png.as_slice()))?;
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    Reflect::set(&result, &JsValue::from_str("colors"), &colors_js)?;

    Ok(result)
}
