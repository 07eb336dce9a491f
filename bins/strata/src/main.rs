use anyhow::Context;
use std::sync::Arc;
use std::time::{Duration, Instant};
use strata_config::StrataConfig;
use strata_fanout::{
    Aggregator, Broadcaster, Consumer, JournalSink, Logger, QueueConfig, Renderer, StatusSink,
    TeeSink, TracingSink,
};
use strata_journal::{Journal, Level};
use tracing_subscriber::EnvFilter;

/// Processed counts per consumer after a run.
#[derive(Debug, PartialEq, Eq)]
struct RunReport {
    generated: u64,
    logger: u64,
    renderer: u64,
    aggregator: u64,
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => StrataConfig::load(path.clone())
            .with_context(|| format!("loading config from {path}"))?,
        None => StrataConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_thread_names(true)
        .init();

    let mut tee = TeeSink::new(vec![Arc::new(TracingSink) as Arc<dyn StatusSink>]);
    if let Some(path) = &config.journal_path {
        let level: Level = config
            .journal_level
            .parse()
            .context("parsing journal_level")?;
        let journal = strata_journal::install(Journal::open(path)?);
        journal.set_level(level);
        tee.push(Arc::new(JournalSink::new(journal, Level::Info)));
    }

    let report = run(&config, Arc::new(tee))?;
    tracing::info!(?report, "run complete");

    strata_journal::teardown();
    println!("ok");
    Ok(())
}

fn run(config: &StrataConfig, sink: Arc<dyn StatusSink>) -> anyhow::Result<RunReport> {
    let queue = QueueConfig {
        capacity: config.queue_capacity,
    };
    let render_delay = Duration::from_millis(config.render_delay_ms);

    let mut logger = Consumer::spawn(Logger, sink.clone(), queue)?;
    let mut renderer = Consumer::spawn(Renderer::new(render_delay), sink.clone(), queue)?;
    let mut aggregator = Consumer::spawn(Aggregator, sink, queue)?;

    tracing::info!(
        rows = config.rows,
        cols = config.cols,
        iterations = config.iterations,
        bounded = queue.is_bounded(),
        "publishing"
    );

    let start = Instant::now();
    let generated = {
        let mut bus = Broadcaster::new();
        bus.add_observer(&logger);
        bus.add_observer(&renderer);
        bus.add_observer(&aggregator);
        for _ in 0..config.iterations {
            bus.generate(config.rows, config.cols)?;
        }
        bus.generated()
    };
    tracing::info!(
        elapsed = ?start.elapsed(),
        renderer_backlog = renderer.pending(),
        "publishing done, stopping consumers"
    );

    logger.stop();
    renderer.stop();
    aggregator.stop();
    tracing::info!(elapsed = ?start.elapsed(), "all consumers stopped");

    Ok(RunReport {
        generated,
        logger: logger.processed(),
        renderer: renderer.processed(),
        aggregator: aggregator.processed(),
    })
}
