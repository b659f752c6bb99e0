// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Browser entry point: runs the demo graph on `navigator.ml`
//!
//! The page is expected to contain `#root` (results) and `#error` (one text
//! node per failure).

use js_sys::{Array, Function, Object, Promise, Reflect};
use tracing::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use webnn_bridge::host::WebHost;
use webnn_bridge::pending::{JsHandle, JsPending};
use webnn_bridge::{
    acquire_context_async, settle, ContextProvider, ForeignFailure, TypedBufferBridge,
};
use webnn_config::{load_config_from_json, ContextConfig, WebnnConfig};
use webnn_observability::{init_logging, CrateDebugFlags, LoggingConfig};

use crate::demo::{self, DemoReport};

/// `navigator.ml` if the browser exposes it
pub struct NavigatorMl {
    ml: Option<JsValue>,
}

impl NavigatorMl {
    pub fn from_window(window: &web_sys::Window) -> Self {
        let ml = Reflect::get(&window.navigator(), &JsValue::from_str("ml"))
            .ok()
            .filter(|ml| ml.is_truthy());
        Self { ml }
    }
}

impl ContextProvider for NavigatorMl {
    type Context = JsHandle;
    type Pending = JsPending;

    fn is_available(&self) -> bool {
        self.ml.is_some()
    }

    fn create_context(&self, options: Option<&ContextConfig>) -> JsPending {
        let Some(ml) = &self.ml else {
            let reason = JsValue::from_str("WebNN API is not available");
            return JsPending(Promise::reject(&reason));
        };
        let args = match options {
            Some(options) => vec![context_options(options).into()],
            None => Vec::new(),
        };
        match call_method(ml, "createContext", &args) {
            Ok(value) => JsPending::from_value(value),
            Err(thrown) => JsPending(Promise::reject(&thrown)),
        }
    }
}

fn context_options(options: &ContextConfig) -> Object {
    let object = Object::new();
    let device_type = JsValue::from_str(options.device_type.as_str());
    let power_preference = JsValue::from_str(options.power_preference.as_str());
    set(&object, "deviceType", &device_type);
    set(&object, "powerPreference", &power_preference);
    object
}

fn operand_descriptor(shape: Option<&[u32]>) -> Object {
    let descriptor = Object::new();
    set(&descriptor, "dataType", &JsValue::from_str(demo::DATA_TYPE));
    if let Some(shape) = shape {
        let dims: Array = shape.iter().map(|d| JsValue::from(*d)).collect();
        // Older implementations read `dimensions`, newer ones `shape`.
        set(&descriptor, "dimensions", &dims);
        set(&descriptor, "shape", &dims);
    }
    descriptor
}

fn set(target: &Object, key: &str, value: &JsValue) {
    // Reflect.set on a plain object cannot throw
    let _ = Reflect::set(target, &JsValue::from_str(key), value);
}

fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    let args: Array = args.iter().collect();
    Reflect::apply(&method, target, &args)
}

fn construct(global_name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let constructor: Function = Reflect::get(&js_sys::global(), &JsValue::from_str(global_name))?
        .dyn_into()?;
    let args: Array = args.iter().collect();
    Reflect::construct(&constructor, &args)
}

fn failure_text(value: JsValue) -> String {
    JsHandle(value).message()
}

/// Await a promise-returning host call, turning throws and rejections into text
async fn await_call(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, String> {
    let returned = call_method(target, name, args).map_err(failure_text)?;
    settle(JsPending::from_value(returned))
        .await
        .map(JsHandle::into_inner)
        .map_err(|err| format!("{} failed: {}", name, err.message()))
}

async fn run_demo(config: &WebnnConfig, window: &web_sys::Window) -> Result<DemoReport, String> {
    let provider = NavigatorMl::from_window(window);
    let context = acquire_context_async(&provider, &config.context)
        .await
        .map_err(|err| err.to_string())?
        .into_inner();
    info!(target: "webnn-demo", "Context created");

    info!(target: "webnn-demo", "Creating graph");
    let builder = construct("MLGraphBuilder", &[context.clone()]).map_err(failure_text)?;
    let bridge = TypedBufferBridge::new(WebHost::new());

    let scale = bridge.to_external_buffer(&[demo::SCALE]);
    let scalar: JsValue = operand_descriptor(None).into();
    let constant = call_method(&builder, "constant", &[scalar, scale]).map_err(failure_text)?;
    let descriptor: JsValue = operand_descriptor(Some(&demo::SHAPE)).into();
    let a_args = [demo::INPUT_A.into(), descriptor.clone()];
    let a = call_method(&builder, "input", &a_args).map_err(failure_text)?;
    let b_args = [demo::INPUT_B.into(), descriptor];
    let b = call_method(&builder, "input", &b_args).map_err(failure_text)?;
    let scaled = call_method(&builder, "mul", &[a, constant]).map_err(failure_text)?;
    let c = call_method(&builder, "add", &[scaled, b]).map_err(failure_text)?;

    let named_outputs = Object::new();
    set(&named_outputs, demo::OUTPUT_C, &c);
    let graph = await_call(&builder, "build", &[named_outputs.into()]).await?;

    let values_a = demo::input_a();
    let values_b = demo::input_b();
    let buffer_a = bridge.to_external_buffer(&values_a);
    let buffer_b = bridge.to_external_buffer(&values_b);
    let buffer_c = bridge.new_external_buffer::<f32>(values_a.len());

    let inputs = Object::new();
    set(&inputs, demo::INPUT_A, &buffer_a);
    set(&inputs, demo::INPUT_B, &buffer_b);
    let outputs = Object::new();
    set(&outputs, demo::OUTPUT_C, &buffer_c);

    let compute_args = [graph, inputs.into(), outputs.into()];
    let results = await_call(&context, "compute", &compute_args).await?;
    let output_key = JsValue::from_str(demo::OUTPUT_C);
    let output_c = Reflect::get(&results, &JsValue::from_str("outputs"))
        .and_then(|outputs| Reflect::get(&outputs, &output_key))
        .map_err(failure_text)?;

    // Expose the raw result for inspection from the console.
    let _ = Reflect::set(&js_sys::global(), &JsValue::from_str("outputC"), &output_c);

    let c = bridge
        .read_external_buffer::<f32>(&output_c)
        .map_err(|err| err.to_string())?;
    Ok(DemoReport {
        a: values_a,
        b: values_b,
        c,
    })
}

fn report_error(document: &Document, message: &str) {
    error!(target: "webnn-demo", "{}", message);
    if let Some(error_elem) = document.get_element_by_id("error") {
        let node = document.create_text_node(message);
        let _ = error_elem.append_child(&node);
    }
}

fn render(root: Option<Element>, report: &DemoReport) -> Result<(), String> {
    let html = report.to_html().map_err(|err| err.to_string())?;
    match root {
        Some(root) => {
            root.set_inner_html(&html);
            Ok(())
        }
        None => Err("#root element not found".to_string()),
    }
}

/// Page configuration from `window.WEBNN_CONFIG` (a JSON string), or defaults
fn page_config(window: &web_sys::Window) -> Result<WebnnConfig, String> {
    match Reflect::get(window, &JsValue::from_str("WEBNN_CONFIG"))
        .ok()
        .and_then(|value| value.as_string())
    {
        Some(json) => load_config_from_json(&json).map_err(|err| err.to_string()),
        None => Ok(WebnnConfig::default()),
    }
}

#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = match page_config(&window) {
        Ok(config) => config,
        Err(message) => {
            report_error(&document, &message);
            return Err(JsValue::from_str(&message));
        }
    };

    let logging = LoggingConfig::from_strings(&config.logging.level, &config.logging.format)
        .unwrap_or_default();
    if let Err(err) = init_logging(&CrateDebugFlags::default(), &logging) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Logging disabled: {err}")));
    }

    let outcome = match run_demo(&config, &window).await {
        Ok(report) => render(document.get_element_by_id("root"), &report),
        Err(message) => Err(message),
    };

    outcome.map_err(|message| {
        report_error(&document, &message);
        JsValue::from_str(&message)
    })
}
