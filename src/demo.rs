// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The demo graph: `C = 0.2 * A + B` over two 2x2 float32 inputs
//!
//! Platform-independent parts of the demo (operand values, the reference
//! result and the page report) live here so they can be tested natively.
//! The browser wiring is in `web`.

use serde::Serialize;

/// Graph input and output names
pub const INPUT_A: &str = "A";
pub const INPUT_B: &str = "B";
pub const OUTPUT_C: &str = "C";

/// Operand data type of every tensor in the graph
pub const DATA_TYPE: &str = "float32";

/// Shape of A, B and C
pub const SHAPE: [u32; 2] = [2, 2];

/// Scalar constant multiplied into A
pub const SCALE: f32 = 0.2;

/// Number of elements in one operand
pub const fn element_count() -> usize {
    (SHAPE[0] * SHAPE[1]) as usize
}

/// Values fed to input A
pub fn input_a() -> Vec<f32> {
    vec![1.0; element_count()]
}

/// Values fed to input B
pub fn input_b() -> Vec<f32> {
    vec![0.8; element_count()]
}

/// Reference result computed natively
pub fn expected_output(a: &[f32], b: &[f32]) -> Vec<f32> {
    a.iter().zip(b).map(|(a, b)| SCALE * a + b).collect()
}

/// Inputs and output of one run, as shown on the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoReport {
    pub a: Vec<f32>,
    pub b: Vec<f32>,
    pub c: Vec<f32>,
}

impl DemoReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// HTML fragment written into the `#root` element
    pub fn to_html(&self) -> serde_json::Result<String> {
        Ok(format!(
            "<div>\n<h2>Input values:</h2>\n<pre>{}</pre>\n<pre>{}</pre>\n<h2>Output value:</h2>\n<pre>{}</pre>\n</div>",
            serde_json::to_string(&self.a)?,
            serde_json::to_string(&self.b)?,
            serde_json::to_string(&self.c)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_result() {
        let c = expected_output(&input_a(), &input_b());
        assert_eq!(c.len(), 4);
        for value in c {
            assert!((value - 1.0).abs() < 1e-6, "{value}");
        }
    }

    #[test]
    fn test_report_html() {
        let report = DemoReport {
            a: vec![1.0, 2.0],
            b: vec![0.5, 0.5],
            c: vec![0.7, 0.9],
        };
        let html = report.to_html().unwrap();
        assert!(html.starts_with("<div>"));
        assert!(html.contains("<pre>[1.0,2.0]</pre>"));
        let output = "<h2>Output value:</h2>\n<pre>[0.7,0.9]</pre>";
        assert!(html.contains(output));
        assert_eq!(
            report.to_json().unwrap(),
            r#"{"a":[1.0,2.0],"b":[0.5,0.5],"c":[0.7,0.9]}"#
        );
    }
}
