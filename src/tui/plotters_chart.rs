//! Plotters-powered dashboard chart widgets for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`. Both widgets are render-only: series, colours and
//! bounds come precomputed from `chart::LineChartSpec` / `chart::BarChartSpec`.

use plotters::prelude::*;
// `ratatui::style::Color` below shadows the prelude's trait name.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::{BarChartSpec, LineChartSpec, Rgba};

/// Linear steps per segment when densifying a dashed series.
const DASH_STEPS: usize = 16;
/// Points per dash (and per gap).
const DASH_LEN: usize = 4;

/// Sales vs last-year lines.
pub struct LinePlottersChart<'a> {
    pub spec: &'a LineChartSpec,
    pub axis: Rgba,
    /// Formatting of y tick labels.
    pub fmt_y: fn(f64) -> String,
}

/// YoY change bars.
pub struct BarPlottersChart<'a> {
    pub spec: &'a BarChartSpec,
    pub axis: Rgba,
}

fn rgb(c: Rgba) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

fn too_small(area: Rect, buf: &mut Buffer) -> bool {
    // When the available area is too small, Plotters may fail to build a chart.
    // In that case, we render a small hint rather than panicking.
    if area.width < 20 || area.height < 8 {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(Color::Yellow),
        );
        return true;
    }
    false
}

/// Category axis spans `[-0.5, n - 0.5]` so the first and last slots are whole.
fn category_bounds(n: usize) -> (f64, f64) {
    (-0.5, n.max(1) as f64 - 0.5)
}

fn category_label(categories: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

impl<'a> Widget for LinePlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) || self.spec.categories.is_empty() {
            return;
        }

        let (x0, x1) = category_bounds(self.spec.categories.len());
        let [y0, y1] = self.spec.y_bounds;
        if !(y0.is_finite() && y1.is_finite()) || y1 <= y0 {
            return;
        }

        let spec = self.spec;
        let axis = rgb(self.axis);
        let fmt_y = self.fmt_y;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(spec.x_axis_title.as_str())
                .y_desc(spec.y_axis_title.as_str())
                .x_labels(spec.categories.len().min(6))
                .y_labels(5)
                .x_label_formatter(&|v| category_label(&spec.categories, *v))
                .y_label_formatter(&|v| fmt_y(*v))
                .label_style(("sans-serif", 10).into_font().color(&axis))
                .axis_style(&axis)
                .bold_line_style(&axis)
                .draw()?;

            for series in &spec.series {
                let color = rgb(series.color);
                let points = series.points(spec.shape);

                if series.dashed {
                    for dash in dash_segments(&points) {
                        chart.draw_series(std::iter::once(PathElement::new(dash, &color)))?;
                    }
                } else {
                    chart.draw_series(LineSeries::new(points, &color))?;
                }

                // Data-point markers. We avoid `Circle` markers: the backend maps
                // circle radii incorrectly and draws huge circles.
                chart.draw_series(
                    series
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, &v)| Pixel::new((i as f64, v), WHITE)),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

impl<'a> Widget for BarPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) || self.spec.values.is_empty() {
            return;
        }

        let (x0, x1) = category_bounds(self.spec.values.len());
        let [y0, y1] = self.spec.y_bounds;
        if !(y0.is_finite() && y1.is_finite()) || y1 <= y0 {
            return;
        }

        let spec = self.spec;
        let axis = rgb(self.axis);
        let half_width = ((1.0 - spec.bar_gap) / 2.0).max(0.05);

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(spec.x_axis_title.as_str())
                .y_desc(spec.y_axis_title.as_str())
                .x_labels(spec.categories.len().min(6))
                .y_labels(5)
                .x_label_formatter(&|v| category_label(&spec.categories, *v))
                .y_label_formatter(&|v| format!("{v:.0}%"))
                .label_style(("sans-serif", 10).into_font().color(&axis))
                .axis_style(&axis)
                .bold_line_style(&axis)
                .draw()?;

            chart.draw_series(spec.values.iter().zip(&spec.colors).enumerate().map(|(i, (&v, &c))| {
                let x = i as f64;
                Rectangle::new([(x - half_width, 0.0), (x + half_width, v)], rgb(c).filled())
            }))?;

            // Zero baseline.
            chart.draw_series(LineSeries::new([(x0, 0.0), (x1, 0.0)], &axis))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Split a polyline into alternating dash pieces.
fn dash_segments(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let dense = densify(points, DASH_STEPS);
    dense
        .chunks(DASH_LEN)
        .step_by(2)
        .filter(|c| c.len() >= 2)
        .map(|c| c.to_vec())
        .collect()
}

fn densify(points: &[(f64, f64)], steps: usize) -> Vec<(f64, f64)> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity((points.len() - 1) * steps + 1);
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        for s in 0..steps {
            let t = s as f64 / steps as f64;
            out.push((a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t));
        }
    }
    if let Some(&last) = points.last() {
        out.push(last);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_on_whole_categories() {
        let cats = vec!["2024-01".to_string(), "2024-02".to_string()];
        assert_eq!(category_label(&cats, 1.0), "2024-02");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, -1.0), "");
        assert_eq!(category_label(&cats, 7.0), "");
    }

    #[test]
    fn dashes_alternate() {
        let pts = vec![(0.0, 0.0), (1.0, 1.0)];
        let dashes = dash_segments(&pts);
        // 17 dense points -> chunks of 4: [0..4), [8..12), [16..17) (too short, dropped).
        assert_eq!(dashes.len(), 2);
        assert_eq!(dashes[1][0], (0.5, 0.5));
    }

    #[test]
    fn widgets_render_into_small_buffer_without_panicking() {
        let ds = crate::data::sample_dataset();
        let config = crate::domain::DashboardConfig::default();
        let chart = crate::chart::build_dashboard_chart(&ds, &crate::kpi::compute_kpis(&ds), &config);

        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        LinePlottersChart {
            spec: &chart.line,
            axis: chart.palette.axis_text,
            fmt_y: |v| format!("{v:.0}"),
        }
        .render(area, &mut buf);
        BarPlottersChart {
            spec: &chart.bar,
            axis: chart.palette.axis_text,
        }
        .render(area, &mut buf);
    }

    #[test]
    fn bar_widget_fills_a_full_size_buffer() {
        let ds = crate::data::sample_dataset();
        let config = crate::domain::DashboardConfig::default();
        let chart = crate::chart::build_dashboard_chart(&ds, &crate::kpi::compute_kpis(&ds), &config);

        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        BarPlottersChart {
            spec: &chart.bar,
            axis: chart.palette.axis_text,
        }
        .render(area, &mut buf);

        let drawn = buf.content().iter().filter(|c| c.symbol() != " ").count();
        assert!(drawn > 0);
    }
}
