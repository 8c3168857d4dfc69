//! Visual comparison command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use depth_eval::decode::decode_depth;
use depth_eval::render::{self, RenderConfig};

#[allow(clippy::too_many_arguments)]
pub fn run(
    image: PathBuf,
    depth: PathBuf,
    output: PathBuf,
    alpha: f32,
    invert: bool,
    min_depth: Option<f32>,
    max_depth: Option<f32>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        let map = decode_depth(&depth)
            .with_context(|| format!("Failed to decode {}", depth.display()))?;
        eprintln!(
            "depth dimensions: {}x{} ({} channel(s))",
            map.width(),
            map.height(),
            map.channels()
        );
        if let (Some(min), Some(max)) = (map.min_positive(), map.max_sample()) {
            eprintln!("depth range: [{min}, {max}]");
        }
    }

    let config = RenderConfig {
        alpha,
        invert,
        min_depth,
        max_depth,
    };

    let (heatmap, overlay) = render::render_comparison(&image, &depth, &config)
        .context("Failed to render comparison")?;

    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let heatmap_path = output.join("heatmap.png");
    let overlay_path = output.join("overlay.png");
    heatmap
        .save(&heatmap_path)
        .with_context(|| format!("Failed to write {}", heatmap_path.display()))?;
    overlay
        .save(&overlay_path)
        .with_context(|| format!("Failed to write {}", overlay_path.display()))?;

    println!("Wrote {}", heatmap_path.display());
    println!("Wrote {}", overlay_path.display());

    Ok(())
}
