//! Frame loop example.
//!
//! Drives a text cache through 120 frames of a simulated settings panel
//! with a ticking clock, printing what the cache keeps and evicts.
//! Run with `RUST_LOG=glint_host=debug` to see per-frame events.

use glint_bench::{run_frame, steady_labels};
use glint_host::{CacheConfig, TextCache};
use glint_test_utils::MockBackend;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let labels = steady_labels(40);
    let mut cache = TextCache::new(MockBackend::new(), CacheConfig::default())?;

    for frame in 0..120 {
        let report = run_frame(&mut cache, &labels, frame, 3)?;
        if frame % 30 == 0 || frame == 119 {
            info!(
                frame,
                texts = cache.texts().len(),
                shapes = cache.shaped().len(),
                evicted = report.evicted(),
                bytes = report.interned_bytes,
                textures = report.textures,
                "frame done"
            );
        }
    }

    let backend = cache.backend();
    info!(
        created = backend.created(),
        live = backend.live_textures(),
        draws = backend.draws().len(),
        "backend totals"
    );
    Ok(())
}
