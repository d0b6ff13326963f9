//! Workload profiles for benchmarking the glint text cache.
//!
//! Simulates the per-frame traffic of an immediate-mode GUI:
//!
//! - [`steady_labels`]: a fixed set of labels redrawn every frame
//! - [`run_frame`]: one frame of steady labels plus `churn` one-off strings

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use glint_core::{CacheError, Point, Rgba8};
use glint_host::{FrameReport, TextCache};
use glint_text::RenderBackend;

/// `n` distinct labels of the shape a settings panel would show.
pub fn steady_labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Option {i}: enabled")).collect()
}

/// Run one frame: draw every label in a column, then intern and draw
/// `churn` strings that only exist in this frame (e.g. a ticking clock).
pub fn run_frame<B: RenderBackend>(
    cache: &mut TextCache<B>,
    labels: &[String],
    frame: u64,
    churn: usize,
) -> Result<FrameReport, CacheError> {
    cache.begin_frame();
    for (row, label) in labels.iter().enumerate() {
        let pos = Point::new(4, row as i32 * 14);
        cache.draw_str(pos, label, Rgba8::WHITE)?;
    }
    for i in 0..churn {
        let text = format!("frame {frame} / {i}");
        cache.draw_str(Point::ZERO, &text, Rgba8::WHITE)?;
    }
    Ok(cache.end_frame())
}
