mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "docfill", version, about = "Discover and fill {{ vN }} placeholders in Word templates")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved paths
    Doctor,

    /// List logical template names discovered under templates_dir
    ListTemplates,

    /// Show the variables a template asks for
    Analyze(AnalyzeArgs),

    /// Render a template with answers into output_dir
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Template name (e.g. "contract" or "leases/commercial.docx")
    pub template: String,

    /// Print the variables as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Template name (e.g. "contract" or "leases/commercial.docx")
    pub template: String,

    /// JSON object of answers, e.g. {"v1": "Acme Corp"}
    #[arg(long)]
    pub answers: Option<PathBuf>,

    /// Single answer as key=value; repeatable, wins over --answers
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = cmd::generate::parse_var)]
    pub vars: Vec<(String, String)>,

    /// Fail on tags without an answer
    #[arg(long)]
    pub strict: bool,
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config, profile),
        Commands::ListTemplates => cmd::list_templates::run(config, profile),
        Commands::Analyze(args) => cmd::analyze::run(config, profile, &args),
        Commands::Generate(args) => cmd::generate::run(config, profile, &args),
    }

    logging::flush();
}
