use std::path::{Path, PathBuf};

use clap::Parser;
use common::{record::BenchmarkRecord, surface};
use eyre::Result;
use tracing::{debug, error};
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Charts key-value store benchmark result files, one chart per file.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Benchmark result files, charted in the order given
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Write each chart as a PNG next to its input instead of opening a window
    #[arg(long, default_value_t = false)]
    save: bool,
    #[arg(short, long)]
    log: Vec<String>,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let file_appender = tracing_appender::rolling::never(".", "log.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let mut env_filter =
        EnvFilter::new(format!("kvbench_charts={log_level},common={log_level}"));
    for log in &args.log {
        env_filter = env_filter.add_directive(log.parse()?);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .with(layer().with_writer(non_blocking))
        .init();

    for file in &args.files {
        println!("file = {}", file.display());
        if let Err(err) = chart_file(file, args.save) {
            error!("{err:#?}");
            return Err(err);
        }
    }
    Ok(())
}

/// One file, start to finish: load, strip, chart. Blocks on the window in
/// interactive mode, so files are charted strictly one after another.
fn chart_file(path: &Path, save: bool) -> Result<()> {
    let record = BenchmarkRecord::load(path)?;
    let title = record.title();
    let frame = record.frame()?;
    debug!(
        "{} operation columns in {}",
        frame.columns.len(),
        path.display()
    );

    if save {
        surface::export(&path.with_extension("png"), &frame, &title)
    } else {
        let window_title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        surface::present(&window_title, &frame, &title)
    }
}
