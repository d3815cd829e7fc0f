//! Chart rasterization with plotters
//!
//! Charts are drawn into an in-memory RGB buffer and returned as encoded
//! PNG bytes, ready for base64 embedding.

use anyhow::{Context, Result};
use findash_core::plan::{ChartKind, ChartSpec, Series};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;

/// Per-company (single series) or per-series palette, cycled.
const PALETTE: &[RGBColor] = &[
    RGBColor(0x2e, 0x86, 0xab),
    RGBColor(0xa2, 0x3b, 0x72),
    RGBColor(0xf1, 0x8f, 0x01),
    RGBColor(0xc7, 0x3e, 0x1d),
    RGBColor(0x3b, 0x1f, 0x2b),
    RGBColor(0x95, 0xc6, 0x23),
    RGBColor(0x5c, 0x4d, 0x7d),
];
const AVERAGE_COLOR: RGBColor = RGBColor(0x88, 0x88, 0x88);
const BASELINE_COLOR: RGBColor = RGBColor(0xff, 0x6b, 0x6b);

pub fn palette_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Render a chart spec to PNG bytes at the given resolution.
pub fn render_chart(spec: &ChartSpec, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw(spec, &root).with_context(|| format!("Failed to draw chart '{}'", spec.title))?;
        root.present()
            .with_context(|| format!("Failed to finalize chart '{}'", spec.title))?;
    }
    let image = RgbImage::from_raw(width, height, buffer)
        .context("Chart buffer has an unexpected size")?;
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("Failed to encode chart as PNG")?;
    Ok(png)
}

fn draw(spec: &ChartSpec, root: &DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()> {
    root.fill(&WHITE)?;

    let slots = spec.x_labels.len().max(1) as f64;
    let (y_min, y_max) = y_range(spec);
    let x_labels = spec.x_labels.clone();

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..slots, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(spec.x_labels.len())
        .x_label_formatter(&move |x: &f64| {
            x_labels
                .get(x.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_label_formatter(&|y: &f64| format!("{y:.1}"))
        .draw()?;

    match spec.kind {
        ChartKind::Bar => draw_bars(&mut chart, spec)?,
        ChartKind::Line => draw_lines(&mut chart, spec)?,
    }

    if let Some(average) = spec.average {
        chart.draw_series(LineSeries::new(
            vec![(0.0, average), (slots, average)],
            AVERAGE_COLOR.stroke_width(1),
        ))?;
    }
    if let Some(baseline) = spec.baseline {
        chart.draw_series(LineSeries::new(
            vec![(0.0, baseline), (slots, baseline)],
            BASELINE_COLOR.stroke_width(1),
        ))?;
    }

    if spec.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    Ok(())
}

type Chart2d<'a, 'b> = ChartContext<
    'a,
    BitMapBackend<'b>,
    Cartesian2d<
        plotters::coord::types::RangedCoordf64,
        plotters::coord::types::RangedCoordf64,
    >,
>;

fn draw_bars(chart: &mut Chart2d<'_, '_>, spec: &ChartSpec) -> Result<()> {
    let series_count = spec.series.len().max(1);
    // 0.8 of each slot is usable; the rest is padding between company groups.
    let bar_width = 0.8 / series_count as f64;

    for (series_idx, series) in spec.series.iter().enumerate() {
        let color = palette_color(series_idx);
        let single = spec.series.len() == 1;
        let bars = series.values.iter().enumerate().filter_map(|(i, v)| {
            if !v.is_finite() {
                return None;
            }
            let x0 = i as f64 + 0.1 + series_idx as f64 * bar_width;
            let x1 = x0 + bar_width;
            // Single-series charts color by company, like the palette of
            // the comparative views; grouped charts color by series.
            let fill = if single { palette_color(i) } else { color };
            Some(Rectangle::new(
                [(x0, v.min(0.0)), (x1, v.max(0.0))],
                fill.filled(),
            ))
        });
        let drawn = chart.draw_series(bars)?;
        if !series.label.is_empty() {
            drawn
                .label(&series.label)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }
    }
    Ok(())
}

fn draw_lines(chart: &mut Chart2d<'_, '_>, spec: &ChartSpec) -> Result<()> {
    for (series_idx, series) in spec.series.iter().enumerate() {
        let color = palette_color(series_idx);
        let points = line_points(series);
        let drawn = chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?;
        if !series.label.is_empty() {
            drawn.label(&series.label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
            });
        }
        chart.draw_series(
            points
                .into_iter()
                .map(|p| Circle::new(p, 4, color.filled())),
        )?;
    }
    Ok(())
}

/// Finite points at slot centers; NaN values leave a gap.
fn line_points(series: &Series) -> Vec<(f64, f64)> {
    series
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| (i as f64 + 0.5, *v))
        .collect()
}

/// Padded y range over every finite value, overlay, and the zero axis for
/// bar charts.
fn y_range(spec: &ChartSpec) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut consider = |v: f64| {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    };
    for series in &spec.series {
        for v in &series.values {
            consider(*v);
        }
    }
    if let Some(average) = spec.average {
        consider(average);
    }
    if let Some(baseline) = spec.baseline {
        consider(baseline);
    }
    if spec.kind == ChartKind::Bar {
        consider(0.0);
    }
    if min > max {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.08;
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use findash_core::plan::{ChartKind, ChartSpec, Series};

    fn spec(kind: ChartKind) -> ChartSpec {
        ChartSpec {
            title: "test".to_string(),
            kind,
            x_labels: vec!["A".to_string(), "B".to_string()],
            series: vec![Series {
                label: String::new(),
                values: vec![10.0, -4.0],
            }],
            average: Some(3.0),
            baseline: Some(0.0),
        }
    }

    #[test]
    fn test_renders_png_bytes() {
        for kind in [ChartKind::Bar, ChartKind::Line] {
            let png = render_chart(&spec(kind), 320, 240).unwrap();
            assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
        }
    }

    #[test]
    fn test_nan_values_leave_gaps() {
        let series = Series {
            label: String::new(),
            values: vec![1.0, f64::NAN, 3.0],
        };
        let points = line_points(&series);
        assert_eq!(points, vec![(0.5, 1.0), (2.5, 3.0)]);
    }

    #[test]
    fn test_y_range_covers_overlays_and_zero() {
        let spec = spec(ChartKind::Bar);
        let (min, max) = y_range(&spec);
        assert!(min < -4.0 && max > 10.0);
    }

    #[test]
    fn test_degenerate_y_range() {
        let mut spec = spec(ChartKind::Line);
        spec.series[0].values = vec![f64::NAN, f64::NAN];
        spec.average = None;
        spec.baseline = None;
        assert_eq!(y_range(&spec), (0.0, 1.0));
    }
}
