mod cli;
mod config;
mod source;

use rand::Rng;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use winmesh_agent::WindowAgent;
use winmesh_common::Rect;
use winmesh_store::FileStore;

use crate::source::DriftSource;

#[tokio::main]
async fn main() {
    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("winmesh=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "winmesh=info".parse().unwrap()),
            ),
        )
        .init();

    info!("winmesh v{} starting", env!("CARGO_PKG_VERSION"));

    let file_config = config::load(args.config.as_deref());
    let settings = config::Settings::merge(&args, file_config);

    let store = match FileStore::open(&settings.store_dir) {
        Ok(store) => store,
        Err(e) => {
            error!(
                "cannot open store at {}: {e}",
                settings.store_dir.display()
            );
            return;
        }
    };
    info!("store directory {}", settings.store_dir.display());

    let rect = settings.rect.unwrap_or_else(random_rect);
    let source = DriftSource::new(rect, settings.drift);
    let mut agent = WindowAgent::new(Box::new(store), Box::new(source));

    agent.on_registry_changed(|registry| {
        info!("mesh now holds {} windows", registry.len());
    });
    agent.on_own_shape_changed(|shape| {
        debug!("moved to ({}, {})", shape.x, shape.y);
    });

    let record = match agent.register(serde_json::json!({ "label": settings.label })) {
        Ok(record) => record,
        Err(e) => {
            error!("registration failed: {e}");
            return;
        }
    };
    info!(
        "joined the mesh as window {} ({} peers)",
        record.id,
        agent.registry().len() - 1
    );

    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(settings.tick_ms));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => agent.update(),
            _ = &mut ctrl_c => break,
        }
    }

    if let Err(e) = agent.deregister() {
        warn!("deregistration failed, leaving a ghost record: {e}");
    }
    info!("left the mesh");
}

/// A spot somewhere on a desktop-sized plane, so simultaneously launched
/// windows spread out instead of stacking.
fn random_rect() -> Rect {
    let mut rng = rand::thread_rng();
    Rect::new(
        rng.gen_range(0.0..1000.0f64).round(),
        rng.gen_range(0.0..500.0f64).round(),
        800.0,
        600.0,
    )
}
