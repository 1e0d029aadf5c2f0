use super::{fail_engine, load_config};
use docfill_core::Generator;
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    let rc = load_config("list-templates", config, profile);

    match Generator::from_config(&rc).templates() {
        Ok(list) => {
            if list.is_empty() {
                println!("(no templates found)");
                return;
            }
            for t in &list {
                println!("{}", t.logical_name);
            }
            println!("-- {} templates --", list.len());
        }
        Err(e) => fail_engine("list-templates", &e),
    }
}
