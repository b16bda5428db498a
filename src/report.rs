use std::fmt::Write;

use serde::Serialize;

use crate::config::{Encoding, OutputFormat};
use crate::formula::Formula;
use crate::model::{Interpretation, ModelOrdering};

/// The result of one run: the premises, their models, and the minimal models
/// under both orderings.
pub struct Report<'a> {
    input: &'a [Formula],
    models: &'a [Interpretation],
    echo_input: bool,
}

#[derive(Debug, Serialize)]
struct JsonReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<Vec<String>>,
    models: Vec<JsonModel>,
    justification_minimal: Vec<JsonModel>,
    warrant_minimal: Vec<JsonModel>,
}

#[derive(Debug, Serialize)]
struct JsonModel {
    hard: Vec<String>,
    justification: Vec<String>,
    soft: Vec<String>,
}

impl From<&Interpretation> for JsonModel {
    fn from(m: &Interpretation) -> Self {
        let [hard, justification, soft] = m.rendered();

        Self { hard, justification, soft }
    }
}

impl<'a> Report<'a> {
    pub fn new(input: &'a [Formula], models: &'a [Interpretation]) -> Self {
        Self {
            input,
            models,
            echo_input: true,
        }
    }

    pub fn echo_input(mut self, echo: bool) -> Self {
        self.echo_input = echo;
        self
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(self.text()),
            OutputFormat::Json => self.json(),
        }
    }

    fn text(&self) -> String {
        let mut out = String::new();

        // Writing to a String never fails.
        if self.echo_input {
            let input: Vec<_> = self.input.iter().map(ToString::to_string).collect();
            let _ = write!(out, "Input: [{}]\n\n", input.join(", "));
        }

        match self.models.len() {
            0 => {
                out.push_str("No model found.\n");
                return out
            }
            1 => out.push_str("1 model found.\n"),
            n => {
                let _ = writeln!(out, "{n} models found.");
            }
        }

        for m in self.models {
            let _ = writeln!(out, "{m}");
        }

        let ordering = ModelOrdering::new(self.models);

        out.push_str("Minimal models according to justification ordering:\n");
        for m in ordering.justification_minimal() {
            let _ = writeln!(out, "{m}");
        }

        out.push_str("Minimal models according to warrant ordering:\n");
        for m in ordering.warrant_minimal() {
            let _ = writeln!(out, "{m}");
        }

        out
    }

    fn json(&self) -> Result<String, serde_json::Error> {
        let ordering = ModelOrdering::new(self.models);

        let report = JsonReport {
            input: self.echo_input.then(|| {
                self.input.iter().map(ToString::to_string).collect()
            }),
            models: self.models.iter().map(JsonModel::from).collect(),
            justification_minimal: ordering.justification_minimal().into_iter().map(JsonModel::from).collect(),
            warrant_minimal: ordering.warrant_minimal().into_iter().map(JsonModel::from).collect(),
        };

        serde_json::to_string_pretty(&report)
    }
}

/// Encode a rendered report for writing.
pub fn encode(s: &str, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Utf8 => s.as_bytes().to_vec(),
        Encoding::Utf16 => {
            let mut out = Vec::with_capacity(2 + 2 * s.len());
            out.extend_from_slice(&[0xFE, 0xFF]);

            for u in s.encode_utf16() {
                out.extend_from_slice(&u.to_be_bytes());
            }

            out
        }
    }
}
