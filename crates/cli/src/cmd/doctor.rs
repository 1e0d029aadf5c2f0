use super::load_config;
use docfill_core::config::loader::default_config_path;
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    let rc = load_config("doctor", config, profile);

    println!("OK   docfill doctor");
    println!(
        "path: {}",
        config.map_or_else(
            || default_config_path().display().to_string(),
            |p| p.display().to_string()
        )
    );
    println!("profile: {}", rc.active_profile);
    println!("root: {}", rc.root.display());
    println!("templates_dir: {}", rc.templates_dir.display());
    println!("output_dir: {}", rc.output_dir.display());
    println!("render.undefined: {:?}", rc.render.undefined);
    println!("render.aliases:   {:?}", rc.render.alias_policy());
    if !rc.templates_dir.is_dir() {
        println!("warning: templates_dir does not exist");
    }
}
