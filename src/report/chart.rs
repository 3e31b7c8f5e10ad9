// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chart rendering
//!
//! PNG charts via plotters. X coordinates are fractional years (monthly data)
//! or whole years (annual data); cohort colors follow definition order.

use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::error::{MetroflowError, Result};

/// Cohort palette, by cohort ordinal: blue, orange, green.
const COHORT_COLORS: [RGBColor; 3] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
];

const FALLBACK_COLOR: RGBColor = RGBColor(127, 127, 127);

/// Color for the nth cohort in definition order.
pub fn cohort_color(ordinal: usize) -> RGBColor {
    COHORT_COLORS
        .get(ordinal)
        .copied()
        .unwrap_or(FALLBACK_COLOR)
}

/// A text annotation placed in data coordinates.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub lines: Vec<String>,
    pub x: f64,
    pub y: f64,
}

fn chart_error<E: std::fmt::Display>(e: E) -> MetroflowError {
    MetroflowError::Chart(e.to_string())
}

/// Pad a data range by 5% on each side.
fn padded(min: f64, max: f64) -> Range<f64> {
    let span = (max - min).max(1e-6);
    (min - 0.05 * span)..(max + 0.05 * span)
}

fn xy_ranges(points: impl Iterator<Item = (f64, f64)>) -> Result<(Range<f64>, Range<f64>)> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !x_min.is_finite() || !y_min.is_finite() {
        return Err(MetroflowError::Chart("no points to plot".to_string()));
    }
    // The zero line must stay visible.
    Ok((padded(x_min, x_max), padded(y_min.min(0.0), y_max.max(0.0))))
}

/// One line per cohort, with legend, zero axis line and optional annotation.
pub fn render_cohort_lines(
    path: &Path,
    dims: (u32, u32),
    title: &str,
    x_desc: &str,
    y_desc: &str,
    series: &[(String, Vec<(f64, f64)>)],
    annotation: Option<Annotation>,
) -> Result<()> {
    let (x_range, y_range) =
        xy_ranges(series.iter().flat_map(|(_, pts)| pts.iter().copied()))?;

    let root = BitMapBackend::new(path, dims).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), y_range.clone())
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .light_line_style(&BLACK.mix(0.08))
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(LineSeries::new(
            vec![(x_range.start, 0.0), (x_range.end, 0.0)],
            &BLACK,
        ))
        .map_err(chart_error)?;

    for (ordinal, (label, points)) in series.iter().enumerate() {
        let color = cohort_color(ordinal);
        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                ShapeStyle::from(&color).stroke_width(3),
            ))
            .map_err(chart_error)?
            .label(label.clone())
            .legend(move |(x, y)| {
                PathElement::new(
                    vec![(x, y), (x + 18, y)],
                    ShapeStyle::from(&color).stroke_width(3),
                )
            });
    }

    if let Some(annotation) = annotation {
        let line_height = (y_range.end - y_range.start) * 0.035;
        for (i, line) in annotation.lines.iter().enumerate() {
            chart
                .draw_series(std::iter::once(Text::new(
                    line.clone(),
                    (annotation.x, annotation.y - line_height * i as f64),
                    ("sans-serif", 18),
                )))
                .map_err(chart_error)?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

/// Mean line plus a shaded min/max band per cohort, with a vertical marker at
/// the baseline. The first cohort's mean line is dashed.
#[allow(clippy::too_many_arguments)]
pub fn render_cohort_bands(
    path: &Path,
    dims: (u32, u32),
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bands: &[(String, Vec<(f64, f64, f64, f64)>)],
    baseline_x: f64,
) -> Result<()> {
    let (x_range, y_range) = xy_ranges(bands.iter().flat_map(|(_, pts)| {
        pts.iter()
            .flat_map(|(x, _, min, max)| [(*x, *min), (*x, *max)])
    }))?;

    let root = BitMapBackend::new(path, dims).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), y_range.clone())
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .light_line_style(&BLACK.mix(0.08))
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(LineSeries::new(
            vec![(x_range.start, 0.0), (x_range.end, 0.0)],
            &BLACK,
        ))
        .map_err(chart_error)?;

    // Shock marker
    chart
        .draw_series(DashedLineSeries::new(
            vec![(baseline_x, y_range.start), (baseline_x, y_range.end)],
            6,
            4,
            ShapeStyle::from(&RED.mix(0.5)).stroke_width(2),
        ))
        .map_err(chart_error)?;

    for (ordinal, (label, points)) in bands.iter().enumerate() {
        let color = cohort_color(ordinal);

        let mut polygon: Vec<(f64, f64)> =
            points.iter().map(|(x, _, min, _)| (*x, *min)).collect();
        polygon.extend(points.iter().rev().map(|(x, _, _, max)| (*x, *max)));
        chart
            .draw_series(std::iter::once(Polygon::new(polygon, &color.mix(0.15))))
            .map_err(chart_error)?;

        let mean_points: Vec<(f64, f64)> =
            points.iter().map(|(x, mean, _, _)| (*x, *mean)).collect();
        let style = ShapeStyle::from(&color).stroke_width(3);
        let anno = if ordinal == 0 {
            chart
                .draw_series(DashedLineSeries::new(mean_points, 10, 6, style))
                .map_err(chart_error)?
        } else {
            chart
                .draw_series(LineSeries::new(mean_points, style))
                .map_err(chart_error)?
        };
        anno.label(label.clone()).legend(move |(x, y)| {
            PathElement::new(
                vec![(x, y), (x + 18, y)],
                ShapeStyle::from(&color).stroke_width(3),
            )
        });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}

/// Representative-city view: price level line on the left axis, migration
/// rate bars on the right axis.
pub fn render_dual_axis(
    path: &Path,
    dims: (u32, u32),
    title: &str,
    y_left: &str,
    y_right: &str,
    line: &[(f64, f64)],
    bars: &[(f64, f64)],
) -> Result<()> {
    let (x_range, y_left_range) = xy_ranges(line.iter().copied())?;
    let (_, y_right_range) = xy_ranges(bars.iter().copied())?;

    let root = BitMapBackend::new(path, dims).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(90)
        .right_y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), y_left_range)
        .map_err(chart_error)?
        .set_secondary_coord(x_range.clone(), y_right_range);

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(y_left)
        .light_line_style(&BLACK.mix(0.08))
        .draw()
        .map_err(chart_error)?;

    chart
        .configure_secondary_axes()
        .y_desc(y_right)
        .draw()
        .map_err(chart_error)?;

    let price_color = cohort_color(0);
    chart
        .draw_series(LineSeries::new(
            line.iter().copied(),
            ShapeStyle::from(&price_color).stroke_width(4),
        ))
        .map_err(chart_error)?
        .label("Housing Price (ZHVI)")
        .legend(move |(x, y)| {
            PathElement::new(
                vec![(x, y), (x + 18, y)],
                ShapeStyle::from(&price_color).stroke_width(4),
            )
        });

    let bar_color = RED;
    chart
        .draw_secondary_series(bars.iter().map(|(x, value)| {
            Rectangle::new([(*x - 0.35, 0.0), (*x + 0.35, *value)], bar_color.mix(0.3).filled())
        }))
        .map_err(chart_error)?
        .label("Net Migration")
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - 5), (x + 14, y + 5)], bar_color.mix(0.3).filled())
        });

    chart
        .draw_secondary_series(DashedLineSeries::new(
            vec![(x_range.start, 0.0), (x_range.end, 0.0)],
            6,
            4,
            ShapeStyle::from(&BLACK).stroke_width(1),
        ))
        .map_err(chart_error)?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}
