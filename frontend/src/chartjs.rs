//! Binding to the page's global Chart.js.

use js_sys::{Array, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::charts::{tick_label, ChartSource, ChartSpec, ThemeColors, TickFormat};
use crate::error::ChartError;
use crate::format::share_label;

const FONT_FAMILY: &str = "Poppins, sans-serif";
const PLACEHOLDER: &str = "No data available";

#[wasm_bindgen]
extern "C" {
    type Chart;

    #[wasm_bindgen(constructor, catch)]
    fn new(ctx: &CanvasRenderingContext2d, config: &JsValue) -> Result<Chart, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &Chart);
}

type Callback = Closure<dyn Fn(JsValue) -> String>;

/// A live chart plus the JS callbacks its config points at. Dropping the
/// handle destroys the chart, so the closures never outlive it.
pub struct ChartHandle {
    chart: Chart,
    _callbacks: Vec<Callback>,
}

impl Drop for ChartHandle {
    fn drop(&mut self) {
        self.chart.destroy();
    }
}

/// Sets the library-wide defaults once per page.
pub fn apply_defaults() -> Result<(), ChartError> {
    let chart = Reflect::get(&js_sys::global(), &JsValue::from_str("Chart"))?;
    if chart.is_undefined() {
        return Err(ChartError::Js("Chart.js is not loaded".to_string()));
    }
    let defaults = Reflect::get(&chart, &JsValue::from_str("defaults"))?;
    let font = Reflect::get(&defaults, &JsValue::from_str("font"))?;
    Reflect::set(&font, &JsValue::from_str("family"), &JsValue::from_str(FONT_FAMILY))?;
    Reflect::set(&defaults, &JsValue::from_str("responsive"), &JsValue::TRUE)?;
    Reflect::set(&defaults, &JsValue::from_str("maintainAspectRatio"), &JsValue::FALSE)?;
    Ok(())
}

pub fn read_theme_colors() -> ThemeColors {
    let style = web_sys::window().and_then(|window| {
        let body = window.document()?.body()?;
        window.get_computed_style(&body).ok().flatten()
    });
    let value = |name: &str| {
        style
            .as_ref()
            .and_then(|style| style.get_property_value(name).ok())
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    };

    ThemeColors {
        text_primary: value("--text-primary"),
        text_secondary: value("--text-secondary"),
        accent: value("--accent"),
        bg_secondary: value("--bg-secondary"),
        success: value("--success"),
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, ChartError> {
    canvas
        .get_context("2d")?
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or_else(|| ChartError::MissingContext(canvas.id()))
}

fn draw_placeholder(
    ctx: &CanvasRenderingContext2d,
    canvas: &HtmlCanvasElement,
    colors: &ThemeColors,
) -> Result<(), ChartError> {
    let (width, height) = (canvas.width() as f64, canvas.height() as f64);
    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str(&colors.text_secondary);
    ctx.set_font("16px Poppins");
    ctx.set_text_align("center");
    ctx.fill_text(PLACEHOLDER, width / 2.0, height / 2.0)?;
    Ok(())
}

fn number_at(value: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(value, &JsValue::from_str(key)).ok()?.as_f64()
}

fn formatter(format: TickFormat, currency: String) -> Callback {
    match format {
        TickFormat::ShareOfTotal => Closure::wrap(Box::new(move |context: JsValue| {
            let label = Reflect::get(&context, &JsValue::from_str("label"))
                .ok()
                .and_then(|label| label.as_string())
                .unwrap_or_default();
            let value = number_at(&context, "parsed").unwrap_or(0.0);
            let total = Reflect::get(&context, &JsValue::from_str("dataset"))
                .and_then(|dataset| Reflect::get(&dataset, &JsValue::from_str("data")))
                .map(|data| {
                    Array::from(&data)
                        .iter()
                        .filter_map(|v| v.as_f64())
                        .sum::<f64>()
                })
                .unwrap_or(0.0);
            share_label(&label, value, total)
        }) as Box<dyn Fn(JsValue) -> String>),
        format => Closure::wrap(Box::new(move |value: JsValue| {
            tick_label(format, value.as_f64().unwrap_or(0.0), &currency)
        }) as Box<dyn Fn(JsValue) -> String>),
    }
}

fn set_path(root: &JsValue, path: &[&str], value: &JsValue) -> Result<(), ChartError> {
    let (last, parents) = path
        .split_last()
        .ok_or_else(|| ChartError::Js("empty callback path".to_string()))?;
    let mut target = root.clone();
    for key in parents {
        target = Reflect::get(&target, &JsValue::from_str(key))?;
    }
    Reflect::set(&target, &JsValue::from_str(last), value)?;
    Ok(())
}

fn create(
    ctx: &CanvasRenderingContext2d,
    spec: ChartSpec,
    currency: &str,
) -> Result<ChartHandle, ChartError> {
    let config = js_sys::JSON::parse(&spec.config.to_string())?;
    let mut callbacks = Vec::with_capacity(spec.formatters.len());
    for entry in spec.formatters {
        let callback = formatter(entry.format, currency.to_string());
        set_path(&config, entry.path, callback.as_ref())?;
        callbacks.push(callback);
    }

    let chart = Chart::new(ctx, &config)?;
    Ok(ChartHandle {
        chart,
        _callbacks: callbacks,
    })
}

/// Draws `source` on `canvas` with the current theme colours. An empty
/// dataset draws the placeholder text and yields no handle.
pub fn render(
    canvas: &HtmlCanvasElement,
    source: &ChartSource,
    currency: &str,
) -> Result<Option<ChartHandle>, ChartError> {
    let ctx = context_2d(canvas)?;
    let colors = read_theme_colors();
    match source.spec(&colors) {
        Some(spec) => create(&ctx, spec, currency).map(Some),
        None => {
            draw_placeholder(&ctx, canvas, &colors)?;
            Ok(None)
        }
    }
}
