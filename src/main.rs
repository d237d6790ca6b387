use mimalloc::MiMalloc;
use tokio::{fs::File, io::BufWriter};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &amrgrid::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_path = %cfg.basic.database_path.display(),
        max_refinement_level = cfg.basic.max_refinement_level,
        workers = cfg.store.workers,
        output = %cfg.sample.output_path.display(),
        resolution = cfg.sample.resolution,
        field_factor = cfg.sample.field_factor,
        loglevel = %cfg.basic.loglevel
    );

    let grid = amrgrid::Grid::from_config(cfg).await?;
    let cells = grid.worker(0)?.size().await?;
    info!(cells, "Grid opened");

    let file = File::create(&cfg.sample.output_path).await?;
    let mut out = BufWriter::new(file);
    let sampled = amrgrid::sample::sample_uniform(
        &grid,
        cfg.sample.resolution,
        cfg.sample.field_factor,
        &mut out,
    )
    .await;

    if let Err(e) = grid.close().await {
        warn!(error = %e, "Grid close reported a failure");
    }
    let points = sampled?;
    info!(points, output = %cfg.sample.output_path.display(), "Sampling written");
    Ok(())
}
