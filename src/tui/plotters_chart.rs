//! Plotters-powered chart widgets for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`, delegating to its `widget_fn` helper to avoid
//! coupling our code to its internal backend types. The widgets are
//! data-driven: all binning and aggregation happens in `crate::chart`, so
//! `render()` stays draw-only.

use plotters::prelude::*;
// Bring the `Color` trait into scope (anonymously) so methods like
// `.filled()` resolve. The glob import's `Color` is shadowed by ratatui's
// `Color` imported below, so we import the trait explicitly for its methods.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::{BarSpec, BoxplotSpec, HistogramSpec};

/// Marker palette, in `markers` order (mean, median, mode).
const MARKER_COLORS: [RGBColor; 3] = [
    RGBColor(255, 0, 0),   // mean: red
    RGBColor(0, 128, 255), // median: blue
    RGBColor(0, 255, 0),   // mode: green
];

const BAR_COLOR: RGBColor = RGBColor(0, 255, 255); // cyan
const DENSITY_COLOR: RGBColor = RGBColor(255, 255, 0); // yellow

/// Distribution histogram with density overlay and labeled markers.
pub struct HistogramChart<'a> {
    pub spec: &'a HistogramSpec,
}

impl Widget for HistogramChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if render_guard(area, buf, self.spec.is_empty()) {
            return;
        }

        let bins = self.spec.bins.clone();
        let mut x0 = bins[0].left;
        let mut x1 = bins[bins.len() - 1].right;
        for &(x, _) in &self.spec.density {
            x0 = x0.min(x);
            x1 = x1.max(x);
        }

        let mut y_top = self.spec.max_count() as f64;
        for &(_, y) in &self.spec.density {
            y_top = y_top.max(y);
        }
        let y1 = if y_top.is_finite() && y_top > 0.0 {
            y_top * 1.05
        } else {
            1.0
        };

        if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 {
            return;
        }

        let density = self.spec.density.clone();
        let markers = self.spec.markers.clone();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, 0.0..y1)?;

            // Axes + tick labels, no mesh lines: low-resolution terminal
            // rendering gets cluttered fast.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("units sold")
                .y_desc("count")
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.1}"))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // 1) Binned distribution.
            chart.draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.left, 0.0), (b.right, b.count as f64)], BAR_COLOR.filled())
            }))?;

            // 2) Smoothed density overlay (count units).
            chart.draw_series(LineSeries::new(density.iter().copied(), &DENSITY_COLOR))?;

            // 3) Labeled central-tendency markers.
            for (i, marker) in markers.iter().enumerate() {
                let color = MARKER_COLORS[i % MARKER_COLORS.len()];
                chart
                    .draw_series(LineSeries::new(
                        [(marker.value, 0.0), (marker.value, y1)],
                        &color,
                    ))?
                    .label(marker.label.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));
            }

            if !markers.is_empty() {
                chart
                    .configure_series_labels()
                    .position(SeriesLabelPosition::UpperRight)
                    .label_font(("sans-serif", 10).into_font().color(&WHITE))
                    .border_style(&WHITE)
                    .draw()?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// One five-number box per category.
pub struct BoxplotChart<'a> {
    pub spec: &'a BoxplotSpec,
}

impl Widget for BoxplotChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if render_guard(area, buf, self.spec.is_empty()) {
            return;
        }
        let Some((lo, hi)) = self.spec.value_range() else {
            return;
        };
        let pad = ((hi - lo).abs() * 0.05).max(0.5);
        let (y0, y1) = (lo - pad, hi + pad);

        let n = self.spec.boxes.len();
        let boxes = self.spec.boxes.clone();
        let names: Vec<String> = boxes.iter().map(|b| b.category.clone()).collect();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(-0.5..(n as f64 - 0.5), y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc("units sold")
                .x_labels(n)
                .y_labels(5)
                .x_label_formatter(&category_tick_formatter(&names))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (i, b) in boxes.iter().enumerate() {
                let x = i as f64;

                // Whisker stems and caps.
                chart.draw_series(LineSeries::new([(x, b.whisker_low), (x, b.q1)], &WHITE))?;
                chart.draw_series(LineSeries::new([(x, b.q3), (x, b.whisker_high)], &WHITE))?;
                chart.draw_series(LineSeries::new(
                    [(x - 0.15, b.whisker_low), (x + 0.15, b.whisker_low)],
                    &WHITE,
                ))?;
                chart.draw_series(LineSeries::new(
                    [(x - 0.15, b.whisker_high), (x + 0.15, b.whisker_high)],
                    &WHITE,
                ))?;

                // Interquartile box (outline) + median line.
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.3, b.q1), (x + 0.3, b.q3)],
                    BAR_COLOR,
                )))?;
                chart.draw_series(LineSeries::new(
                    [(x - 0.3, b.median), (x + 0.3, b.median)],
                    &DENSITY_COLOR,
                ))?;

                // Outliers beyond the whiskers.
                //
                // A colored `Pixel` gives a clean dot that looks right in
                // terminals; circle markers map radii incorrectly through the
                // ratatui backend.
                chart.draw_series(
                    b.outliers
                        .iter()
                        .map(|&o| Pixel::new((x, o), RGBColor(255, 0, 0))),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Per-category totals.
pub struct BarChart<'a> {
    pub spec: &'a BarSpec,
}

impl Widget for BarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if render_guard(area, buf, self.spec.is_empty()) {
            return;
        }

        let n = self.spec.totals.len();
        let top = self.spec.max_total() as f64;
        let y1 = if top > 0.0 { top * 1.05 } else { 1.0 };
        let totals = self.spec.totals.clone();
        let names: Vec<String> = totals.iter().map(|t| t.category.clone()).collect();

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(-0.5..(n as f64 - 0.5), 0.0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc("total units sold")
                .x_labels(n)
                .y_labels(5)
                .x_label_formatter(&category_tick_formatter(&names))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            chart.draw_series(totals.iter().enumerate().map(|(i, t)| {
                let x = i as f64;
                Rectangle::new(
                    [(x - 0.35, 0.0), (x + 0.35, t.total as f64)],
                    BAR_COLOR.filled(),
                )
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Tick formatter that maps integer x positions onto category names.
fn category_tick_formatter(names: &[String]) -> impl Fn(&f64) -> String + '_ {
    move |v: &f64| {
        let idx = v.round() as isize;
        if idx >= 0 && (idx as usize) < names.len() && (v - idx as f64).abs() < 0.25 {
            names[idx as usize].clone()
        } else {
            String::new()
        }
    }
}

/// Common guard: tiny areas and empty specs render a hint, not a panic.
///
/// Returns `true` when the caller should bail out.
fn render_guard(area: Rect, buf: &mut Buffer, empty: bool) -> bool {
    if area.width < 20 || area.height < 8 {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(Color::Yellow),
        );
        return true;
    }
    if empty {
        buf.set_string(
            area.x,
            area.y,
            "No data to chart.",
            Style::default().fg(Color::Yellow),
        );
        return true;
    }
    false
}
