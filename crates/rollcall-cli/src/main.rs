use anyhow::Result;
use clap::Parser;
use rollcall_pipeline::Gateway;
use rollcall_store::RecordStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod menu;

use config::Config;

#[derive(Parser)]
#[command(name = "rollcall", version, about = "Face-recognition attendance front end")]
struct Cli {
    /// Config file (default: rollcall.toml in the working directory, if present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the recognition similarity threshold
    #[arg(long)]
    threshold: Option<f32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(threshold) = cli.threshold {
        cfg.threshold = threshold;
    }

    tracing::info!(
        students = %cfg.students_path.display(),
        attendance = %cfg.attendance_path.display(),
        threshold = cfg.threshold,
        "rollcall starting"
    );

    let store = RecordStore::new(cfg.students_path.clone(), cfg.attendance_path.clone());
    store.ensure_files()?;

    let gateway = Gateway::new(
        &cfg.python_cmd,
        cfg.enroll_script(),
        cfg.encode_script(),
        cfg.recognize_script(),
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    menu::run(&cfg, &store, &gateway, &mut stdin.lock(), &mut stdout.lock())
}
