use super::{fail, fail_engine, load_config};
use crate::GenerateArgs;
use docfill_core::templates::{DocxRenderer, UndefinedPolicy};
use docfill_core::vars::AnswerMap;
use docfill_core::Generator;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: &GenerateArgs) {
    let rc = load_config("generate", config, profile);

    let mut answers = match args.answers.as_deref().map(read_answers).transpose() {
        Ok(a) => a.unwrap_or_default(),
        Err(e) => fail("generate", e, 1),
    };
    for (key, value) in &args.vars {
        answers.insert(key.clone(), value.clone());
    }

    let mut generator = Generator::from_config(&rc);
    if args.strict {
        generator = generator.with_renderer(DocxRenderer::new(UndefinedPolicy::Strict));
    }

    match generator.generate(&args.template, &answers) {
        Ok(doc) => {
            println!("OK   docfill generate");
            println!("output: {}", doc.path.display());
        }
        Err(e) => fail_engine("generate", &e),
    }
}

/// Parse a `key=value` pair; the value may itself contain `=`.
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    let (key, value) =
        s.split_once('=').ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Read a JSON object of answers. Numbers and booleans become their text
/// form and `null` becomes an empty string.
fn read_answers(path: &Path) -> Result<AnswerMap, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("failed to read answers file {}: {e}", path.display()))?;
    let values: BTreeMap<String, Value> = serde_json::from_str(&raw)
        .map_err(|e| format!("failed to parse answers file {}: {e}", path.display()))?;

    values
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(format!("answer '{key}' must be a string"));
                }
            };
            Ok((key, text))
        })
        .collect()
}
