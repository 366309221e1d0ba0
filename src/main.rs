//! Microgrid dashboard entry point: CLI wiring and config loading.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveTime};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use tracing::info;

use microgrid_dash::cli::Cli;
use microgrid_dash::config::DashboardConfig;
use microgrid_dash::dashboard::render::Renderer;
use microgrid_dash::io::stream::{JsonLinesRenderer, TextRenderer};
use microgrid_dash::logging::{self, LogTarget};
use microgrid_dash::runner::Runner;
use microgrid_dash::snapshot;

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut cfg = if let Some(path) = &cli.config {
        DashboardConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?
    } else if let Some(name) = &cli.preset {
        DashboardConfig::from_preset(name)?
    } else {
        DashboardConfig::default()
    };

    if let Some(seed) = cli.seed {
        cfg.simulation.seed = seed;
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("error: {e}");
        }
        bail!("invalid configuration ({} errors)", errors.len());
    }
    Ok(cfg)
}

fn start_time(cli: &Cli) -> NaiveTime {
    cli.start_hour
        .and_then(|h| NaiveTime::from_hms_opt(h, 0, 0))
        .unwrap_or_else(|| Local::now().time())
}

fn run_headless<W: Renderer>(
    mut runner: Runner<StdRng>,
    ticks: u64,
    payload: Option<Value>,
    renderer: &mut W,
) -> Result<()> {
    if let Some(payload) = payload {
        runner
            .dashboard_mut()
            .apply_snapshot(payload, renderer)
            .context("applying snapshot")?;
    }
    let elapsed = runner.run_ticks(ticks, renderer)?;
    info!(
        ticks,
        virtual_secs = elapsed.as_secs(),
        final_soc = runner.dashboard().snapshot().storage.overall_soc,
        "headless run finished"
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_target = match (&cli.log_file, cli.tui) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, true) => LogTarget::Off,
        (None, false) => LogTarget::Stderr,
    };
    // flushes buffered file logs when main returns
    let _log_guard = logging::init(&log_target)?;

    let cfg = load_config(&cli)?;
    let payload = cli
        .apply
        .as_deref()
        .map(snapshot::read_partial)
        .transpose()
        .context("reading --apply payload")?;

    info!(seed = cfg.simulation.seed, preset = ?cli.preset, "starting dashboard");
    let rng = StdRng::seed_from_u64(cfg.simulation.seed);
    let runner = Runner::new(cfg, rng, start_time(&cli));

    if cli.tui {
        #[cfg(feature = "tui")]
        {
            microgrid_dash::tui::run(runner, payload).context("terminal dashboard failed")?;
            return Ok(());
        }
        #[cfg(not(feature = "tui"))]
        bail!("built without the `tui` feature; rerun without --tui");
    }

    let stdout = io::stdout();
    let out = stdout.lock();
    if cli.json {
        run_headless(runner, cli.ticks, payload, &mut JsonLinesRenderer::new(out))
    } else {
        let mut renderer = TextRenderer::new(out);
        run_headless(runner, cli.ticks, payload, &mut renderer)?;
        renderer.into_inner().flush()?;
        Ok(())
    }
}
