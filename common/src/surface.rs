use std::path::Path;

use eyre::{Context, Result};
use minifb::{Key, Window, WindowOptions};
use plotters::prelude::*;
use tracing::debug;

use crate::{chart, record::PlotFrame};

/// Renders the chart into a fresh window and blocks until it is dismissed
/// (window closed or Escape). The pixel buffer and the window handle live
/// exactly as long as one call.
pub fn present(window_title: &str, frame: &PlotFrame, title: &str) -> Result<()> {
    let mut rgb = vec![0u8; (chart::WIDTH * chart::HEIGHT * 3) as usize];
    let root = BitMapBackend::with_buffer(&mut rgb, (chart::WIDTH, chart::HEIGHT))
        .into_drawing_area();
    chart::draw(root, frame, title)?;

    let pixels: Vec<u32> = rgb
        .chunks_exact(3)
        .map(|px| u32::from(px[0]) << 16 | u32::from(px[1]) << 8 | u32::from(px[2]))
        .collect();

    let mut window = Window::new(
        window_title,
        chart::WIDTH as usize,
        chart::HEIGHT as usize,
        WindowOptions::default(),
    )
    .context(format!("Open chart window for {window_title}"))?;
    window.set_target_fps(60);

    debug!("Presenting chart window {window_title}");
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window
            .update_with_buffer(&pixels, chart::WIDTH as usize, chart::HEIGHT as usize)
            .context("Update chart window")?;
    }
    Ok(())
}

/// Writes the chart as a PNG instead of opening a window.
pub fn export(path: &Path, frame: &PlotFrame, title: &str) -> Result<()> {
    let root = BitMapBackend::new(path, (chart::WIDTH, chart::HEIGHT)).into_drawing_area();
    chart::draw(root, frame, title)?;
    debug!("Wrote {}", path.display());
    Ok(())
}
