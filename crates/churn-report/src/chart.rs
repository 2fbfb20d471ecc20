//! Churn distribution bar chart, rendered to PNG with Plotters.

use std::path::Path;
use std::sync::OnceLock;

use base64::Engine;
use churn_core::error::{ChurnError, Result};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

/// Bar colours, cycled per category.
const BAR_COLORS: [RGBColor; 2] = [GREEN, RED];

/// Chart size in pixels.
pub const CHART_SIZE: (u32, u32) = (600, 400);

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Render `counts` (label → raw count, in display order) as a PNG bar chart
/// and return the encoded bytes.
pub fn render_bar_chart(counts: &[(String, usize)]) -> Result<Vec<u8>> {
    render_bar_chart_in(&std::env::temp_dir(), counts)
}

/// Same as [`render_bar_chart`], using `scratch_dir` for the intermediate
/// image file. Every failure here is a [`ChurnError::Render`].
pub fn render_bar_chart_in(scratch_dir: &Path, counts: &[(String, usize)]) -> Result<Vec<u8>> {
    ensure_font()?;

    // The bitmap backend encodes by file extension, so go through a temp file.
    let file = tempfile::Builder::new()
        .prefix("churn-chart-")
        .suffix(".png")
        .tempfile_in(scratch_dir)
        .map_err(|e| ChurnError::Render(format!("cannot create chart file: {}", e)))?;

    draw_bar_chart(file.path(), counts).map_err(|e| ChurnError::Render(format!("{:#}", e)))?;

    std::fs::read(file.path())
        .map_err(|e| ChurnError::Render(format!("cannot read chart file: {}", e)))
}

/// `data:` URI embedding PNG bytes as base64.
pub fn png_data_uri(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

/// Register the bundled font under the family name the chart asks for.
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let registered = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if registered {
        Ok(())
    } else {
        Err(ChurnError::Render(
            "bundled chart font could not be loaded".to_string(),
        ))
    }
}

fn draw_bar_chart(path: &Path, counts: &[(String, usize)]) -> anyhow::Result<()> {
    let categories = counts.len().max(1);
    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1) as f64;
    let labels: Vec<&str> = counts.iter().map(|(label, _)| label.as_str()).collect();

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Churn distribution", (FONT_FAMILY, 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..(categories as f64 - 0.5), 0f64..(max_count * 1.1))?;

    let label_at = |x: &f64| -> String {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels
            .get(idx as usize)
            .map(|l| l.to_string())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(categories)
        .x_label_formatter(&label_at)
        .x_desc("Churn")
        .y_desc("Customers")
        .label_style((FONT_FAMILY, 14))
        .axis_desc_style((FONT_FAMILY, 15))
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
        let color = BAR_COLORS[i % BAR_COLORS.len()];
        Rectangle::new(
            [(i as f64 - 0.4, 0.0), (i as f64 + 0.4, *count as f64)],
            color.filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}
