use super::{fail, fail_engine, load_config};
use crate::AnalyzeArgs;
use docfill_core::vars::Variable;
use docfill_core::Generator;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct VariableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Context")]
    context: String,
}

impl From<&Variable> for VariableRow {
    fn from(v: &Variable) -> Self {
        Self {
            id: v.id.clone(),
            tag: v.original_tag.clone(),
            source: v.source_kind.as_str().to_string(),
            context: truncate(&v.context, 60),
        }
    }
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: &AnalyzeArgs) {
    let rc = load_config("analyze", config, profile);
    let generator = Generator::from_config(&rc);

    let vars = match generator.analyze(&args.template) {
        Ok(vars) => vars,
        Err(e) => fail_engine("analyze", &e),
    };

    if args.json {
        match serde_json::to_string_pretty(&vars) {
            Ok(json) => println!("{json}"),
            Err(e) => fail("analyze", e, 1),
        }
        return;
    }

    if vars.is_empty() {
        println!("(no variables found)");
        return;
    }
    let rows: Vec<VariableRow> = vars.iter().map(VariableRow::from).collect();
    println!("{}", Table::new(&rows).with(Style::rounded()));
    println!("-- {} variables --", vars.len());
}

fn truncate(s: &str, max: usize) -> String {
    let flat = s.replace('\n', " ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
