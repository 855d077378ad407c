use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::Path;

mod config;
mod render;
mod spec;
mod validate;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "dcscript")]
#[command(about = "Synthesis power-intent script generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the tool script for a job description (validates first).
    Generate {
        #[arg(long)]
        job: String,

        /// Output path; defaults to <jobname>.tcl in the working directory.
        #[arg(short = 'o', long)]
        out: Option<String>,
    },

    /// Validate a job description without writing anything.
    Check {
        #[arg(long)]
        job: String,
    },
}

fn load_config(path: &str) -> Result<config::JobConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read job file {}", path))?;
    let job: spec::JobSpec =
        serde_json::from_str(&text).with_context(|| format!("parse job file {}", path))?;
    job.into_config()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Generate { job, out } => {
            let cfg = load_config(&job)?;
            let written = render::write_script(&cfg, out.as_deref().map(Path::new))?;
            println!("Wrote {}", written.display());
        }
        Commands::Check { job } => {
            let cfg = load_config(&job)?;

            for c in validate::conflicts(&cfg) {
                eprintln!("WARN: {}", c);
            }

            let violations = validate::validate(&cfg)?;
            if violations.is_empty() {
                println!("ok");
            } else {
                for v in &violations {
                    eprintln!("error: {}", v);
                }
                anyhow::bail!("{} violation(s) in {}", violations.len(), job);
            }
        }
    }

    Ok(())
}
