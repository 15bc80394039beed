use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tracing::{info, warn};

use spudcheck::run::progress::ConsoleReporter;
use spudcheck::run::{self, RunOptions};
use spudcheck::validator::postcli::PostCliSource;
use spudcheck::validator::{Markers, Validator};
use spudcheck::{cli, config, logging};

const ERROR_PREFIX: &str = "spudcheck error:";

fn main() {
    let cli_opts = cli::parse();
    logging::init_logging(cli_opts.debug, cli_opts.log_format);

    if let Err(err) = execute(cli_opts) {
        eprintln!("{ERROR_PREFIX} {err:#}");
        std::process::exit(1);
    }
}

fn execute(cli_opts: cli::CliOptions) -> Result<()> {
    let loaded = config::load_config(cli_opts.config_path.as_deref())?;
    let cfg = loaded.config;
    info!(
        "spudcheck {} run_id={} config_hash={}",
        env!("CARGO_PKG_VERSION"),
        cfg.run_id,
        loaded.config_hash
    );

    let opts = RunOptions {
        run_id: cfg.run_id.clone(),
        config_hash: loaded.config_hash,
        postcli_path: cli_opts.postcli_path,
        data_dir: cli_opts.data_dir,
        fraction: cli_opts.fraction,
        assume_yes: cli_opts.yes,
    };

    let plan = {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let plan = run::confirm_run(&opts, &mut stdin.lock(), &mut stdout.lock())
            .context("validation run failed")?;
        plan
    };
    let Some(plan) = plan else {
        info!("nothing validated");
        return Ok(());
    };

    // Installed only once confirmed: Ctrl+C at the prompt keeps its default
    // behaviour and ends the process without touching the report.
    let cancel_flag = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&cancel_flag);
        if let Err(err) = ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        }) {
            warn!("failed to install Ctrl+C handler: {err}");
        }
    }

    let source = PostCliSource::new(&opts.postcli_path, &opts.data_dir, opts.fraction);
    let validator = Validator::new(source, Markers::from_config(&cfg));
    let summary = run::execute(&opts, &plan, &validator, &ConsoleReporter, &cancel_flag)
        .context("validation run failed")?;

    if summary.interrupted {
        match &summary.report_path {
            Some(path) => info!("partial report written to {}", path.display()),
            None => info!("interrupted before any file was checked"),
        }
    }
    Ok(())
}
