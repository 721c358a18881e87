//! The evaluator seam between the processor and an expression engine
//!
//! [`YqEvaluator`] runs jq-compatible expressions with `jaq`. YAML input is
//! converted to JSON for evaluation and every result is converted back and
//! serialised as YAML.

use jaq_core::load::{Arena, File, Loader};
use jaq_core::{Compiler, Ctx, FilterT, RcIter};
use jaq_json::Val;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use std::fmt;
use thiserror::Error;

/// Failure while compiling or running an expression
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// The expression text is not valid syntax
    #[error("cannot parse expression: {message}")]
    Parse { message: String },

    /// The expression refers to filters or variables that do not exist
    #[error("cannot compile expression: {message}")]
    Compile { message: String },

    /// The expression failed while running against the input
    #[error("{message}")]
    Runtime { message: String },

    /// A value has no counterpart on the other side of the YAML/JSON bridge
    #[error("cannot convert {from} to {to}")]
    Conversion { from: String, to: String },

    /// The YAML input could not be parsed or a result serialised
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl EvaluationError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn compile(message: impl Into<String>) -> Self {
        Self::Compile {
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }

    fn conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Conversion {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Evaluates a YAML-processing expression against YAML text.
///
/// The processor only depends on this trait, so tests can substitute a
/// deterministic fake and other engines can be plugged in.
pub trait Evaluator {
    /// Run `expression` against `yaml`, returning the serialised results
    fn evaluate(&self, expression: &str, yaml: &str) -> Result<String, EvaluationError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, expression: &str, yaml: &str) -> Result<String, EvaluationError> {
        (**self).evaluate(expression, yaml)
    }
}

/// jq-compatible evaluator with YAML in and YAML out
#[derive(Debug, Clone, Copy, Default)]
pub struct YqEvaluator;

impl YqEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate and return the raw result values instead of serialised text
    pub fn evaluate_values(
        &self,
        expression: &str,
        yaml: &str,
    ) -> Result<Vec<YamlValue>, EvaluationError> {
        let input: YamlValue = if yaml.trim().is_empty() {
            YamlValue::Null
        } else {
            serde_yaml::from_str(yaml)?
        };

        run_jaq(expression, yaml_to_json(&input)?)?
            .iter()
            .map(json_to_yaml)
            .collect()
    }
}

impl Evaluator for YqEvaluator {
    fn evaluate(&self, expression: &str, yaml: &str) -> Result<String, EvaluationError> {
        let mut output = String::new();
        for value in self.evaluate_values(expression, yaml)? {
            output.push_str(&serde_yaml::to_string(&value)?);
        }
        Ok(output)
    }
}

/// Compile `expression` with the standard library and run it on `input`
fn run_jaq(expression: &str, input: JsonValue) -> Result<Vec<JsonValue>, EvaluationError> {
    let arena = Arena::default();
    let loader = Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let program = File {
        code: expression,
        path: (),
    };

    let modules = loader
        .load(&arena, program)
        .map_err(|errors| EvaluationError::parse(describe(errors)))?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(|errors| EvaluationError::compile(describe(errors)))?;

    let inputs = RcIter::new(std::iter::empty());
    let mut results = Vec::new();
    for result in filter.run((Ctx::new([], &inputs), Val::from(input))) {
        let value = result.map_err(|e| EvaluationError::runtime(e.to_string()))?;
        results.push(JsonValue::from(value));
    }
    Ok(results)
}

fn describe<F, E: fmt::Debug>(errors: Vec<(F, E)>) -> String {
    errors
        .iter()
        .map(|(_, error)| format!("{error:?}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convert a YAML value into JSON for evaluation
pub fn yaml_to_json(yaml: &YamlValue) -> Result<JsonValue, EvaluationError> {
    match yaml {
        YamlValue::Null => Ok(JsonValue::Null),
        YamlValue::Bool(b) => Ok(JsonValue::Bool(*b)),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(JsonValue::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(JsonValue::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(JsonValue::Number)
                    .ok_or_else(|| EvaluationError::conversion(format!("YAML number {f}"), "JSON"))
            } else {
                Err(EvaluationError::conversion(format!("YAML number {n}"), "JSON"))
            }
        }
        YamlValue::String(s) => Ok(JsonValue::String(s.clone())),
        YamlValue::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        YamlValue::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    YamlValue::String(s) => s.clone(),
                    YamlValue::Number(n) => n.to_string(),
                    YamlValue::Bool(b) => b.to_string(),
                    YamlValue::Null => "null".to_string(),
                    other => {
                        return Err(EvaluationError::conversion(
                            format!("YAML key {other:?}"),
                            "a JSON object key",
                        ))
                    }
                };
                object.insert(key, yaml_to_json(v)?);
            }
            Ok(JsonValue::Object(object))
        }
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

/// Convert an evaluation result back into YAML
pub fn json_to_yaml(json: &JsonValue) -> Result<YamlValue, EvaluationError> {
    match json {
        JsonValue::Null => Ok(YamlValue::Null),
        JsonValue::Bool(b) => Ok(YamlValue::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(YamlValue::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(YamlValue::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                Ok(YamlValue::Number(f.into()))
            } else {
                Err(EvaluationError::conversion(format!("JSON number {n}"), "YAML"))
            }
        }
        JsonValue::String(s) => Ok(YamlValue::String(s.clone())),
        JsonValue::Array(items) => items
            .iter()
            .map(json_to_yaml)
            .collect::<Result<Vec<_>, _>>()
            .map(YamlValue::Sequence),
        JsonValue::Object(object) => {
            let mut map = serde_yaml::Mapping::with_capacity(object.len());
            for (k, v) in object {
                map.insert(YamlValue::String(k.clone()), json_to_yaml(v)?);
            }
            Ok(YamlValue::Mapping(map))
        }
    }
}
