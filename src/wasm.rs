//! WASM bindings for Circuitlab Core.
//!
//! This module provides JavaScript-friendly bindings for the browser
//! workbench. Circuits cross the boundary as RON text.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmWorkbench } from 'circuitlab_core';
//!
//! await init();
//!
//! const bench = new WasmWorkbench(savedRon);
//!
//! // After the user drags a wire:
//! bench.connect(0, "Positive", 1, "Left");
//! renderComponents(bench.circuit());
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{ComponentId, Terminal, TerminalRef};
use crate::components::{Component, Parameter};
use crate::error::LabError;
use crate::workbench::{CircuitFile, Workbench};
use crate::SolverConfig;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: LabError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_terminal(name: &str) -> Result<Terminal, JsValue> {
    let terminal = match name {
        "Positive" | "positive" => Terminal::Positive,
        "Negative" | "negative" => Terminal::Negative,
        "Left" | "left" => Terminal::Left,
        "Right" | "right" => Terminal::Right,
        "A" => Terminal::A,
        "B" => Terminal::B,
        "C" => Terminal::C,
        other => {
            return Err(to_js(LabError::WasmError {
                message: format!("unknown terminal '{}'", other),
            }))
        }
    };
    Ok(terminal)
}

/// WASM-compatible workbench.
///
/// Wraps the native [`Workbench`]; every mutating call re-solves before it
/// returns.
#[wasm_bindgen]
pub struct WasmWorkbench {
    bench: Workbench,
}

#[wasm_bindgen]
impl WasmWorkbench {
    /// Create a workbench from a RON circuit, e.g. `(components: [])`.
    #[wasm_bindgen(constructor)]
    pub fn new(circuit_ron: &str) -> Result<WasmWorkbench, JsValue> {
        Self::with_strict_pivots(circuit_ron, false)
    }

    /// Create a workbench that reports indeterminate systems instead of
    /// skipping near-zero pivots.
    #[wasm_bindgen]
    pub fn with_strict_pivots(circuit_ron: &str, strict: bool) -> Result<WasmWorkbench, JsValue> {
        let circuit = CircuitFile::from_ron(circuit_ron).map_err(to_js)?;
        let config = SolverConfig::new().with_strict_pivots(strict);
        let bench = Workbench::from_circuit(circuit, config).map_err(to_js)?;
        Ok(WasmWorkbench { bench })
    }

    /// Current circuit, readings included, as RON.
    #[wasm_bindgen]
    pub fn circuit(&self) -> Result<String, JsValue> {
        self.bench.to_circuit().to_ron().map_err(to_js)
    }

    /// Place a component given as RON, e.g. `Battery((id: 0, emf: 1.5))`.
    /// The id in the text is replaced; the assigned id is returned.
    #[wasm_bindgen]
    pub fn place(&mut self, component_ron: &str) -> Result<usize, JsValue> {
        let component: Component = ron::from_str(component_ron)
            .map_err(|source| to_js(LabError::CircuitParseError { source }))?;
        component.check_parameters().map_err(to_js)?;
        Ok(self.bench.place(|_| component).0)
    }

    /// Draw a wire. Returns whether any reading changed.
    #[wasm_bindgen]
    pub fn connect(
        &mut self,
        from_id: usize,
        from_terminal: &str,
        to_id: usize,
        to_terminal: &str,
    ) -> Result<bool, JsValue> {
        let a = TerminalRef::new(ComponentId(from_id), parse_terminal(from_terminal)?);
        let b = TerminalRef::new(ComponentId(to_id), parse_terminal(to_terminal)?);
        self.bench.connect(a, b).map_err(to_js)
    }

    /// Remove every wire.
    #[wasm_bindgen]
    pub fn clear_wires(&mut self) {
        self.bench.clear_wires();
    }

    /// Delete a component and its wires.
    #[wasm_bindgen]
    pub fn remove(&mut self, id: usize) -> Result<(), JsValue> {
        self.bench.remove(ComponentId(id)).map(|_| ()).map_err(to_js)
    }

    /// Set a numeric parameter by name (`resistance`, `emf`,
    /// `internal_resistance`, `total_resistance`, `wiper_resistance`).
    #[wasm_bindgen]
    pub fn set_parameter(&mut self, id: usize, name: &str, value: f64) -> Result<bool, JsValue> {
        let param = match name {
            "resistance" => Parameter::Resistance(value),
            "emf" => Parameter::Emf(value),
            "internal_resistance" => Parameter::InternalResistance(value),
            "total_resistance" => Parameter::TotalResistance(value),
            "wiper_resistance" => Parameter::WiperResistance(value),
            other => {
                return Err(to_js(LabError::WasmError {
                    message: format!("unknown parameter '{}'", other),
                }))
            }
        };
        self.bench.set_parameter(ComponentId(id), param).map_err(to_js)
    }

    /// Open or close a switch.
    #[wasm_bindgen]
    pub fn set_switch(&mut self, id: usize, closed: bool) -> Result<bool, JsValue> {
        self.bench
            .set_parameter(ComponentId(id), Parameter::Closed(closed))
            .map_err(to_js)
    }

    /// Whether a voltmeter is wired in series.
    #[wasm_bindgen]
    pub fn is_series_risk(&self, id: usize) -> Result<bool, JsValue> {
        let c = self.bench.classify(ComponentId(id)).map_err(to_js)?;
        Ok(c.is_series_risk)
    }

    /// Whether an ammeter is wired in parallel.
    #[wasm_bindgen]
    pub fn is_parallel_risk(&self, id: usize) -> Result<bool, JsValue> {
        let c = self.bench.classify(ComponentId(id)).map_err(to_js)?;
        Ok(c.is_parallel_risk)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
