//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal or a CI log
//! - deterministic output (helpful for golden tests)
//!
//! Line chart elements:
//! - sales markers: `o`, prior-year markers: `x`
//! - connecting lines: `.`
//!
//! Bar chart elements:
//! - zero axis: `=`
//! - positive bars: `+`, negative bars: `-`

use crate::chart::{BarChartSpec, LineChartSpec};

/// Data-point markers, one per line series in order.
const SERIES_MARKERS: [char; 2] = ['o', 'x'];

/// Render the sales vs last-year chart.
pub fn render_line_chart(spec: &LineChartSpec, width: usize, height: usize) -> String {
    let n = spec.categories.len();
    if n == 0 {
        return format!("Plot: {} (no data)\n", spec.title);
    }

    let width = width.max(10);
    let height = height.max(5);
    let [y_min, y_max] = spec.y_bounds;
    let x_max = (n - 1) as f64;

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so markers overlay them.
    for series in &spec.series {
        let pts = series.points(spec.shape);
        let mut prev = None;
        for (x, y) in pts {
            let cx = map_x(x, 0.0, x_max, width);
            let cy = map_y(y, y_min, y_max, height);
            if let Some((x0, y0)) = prev {
                draw_line(&mut grid, x0, y0, cx, cy, '.');
            }
            prev = Some((cx, cy));
        }
    }

    for (series, &marker) in spec.series.iter().zip(SERIES_MARKERS.iter()) {
        for (i, &v) in series.values.iter().enumerate() {
            let cx = map_x(i as f64, 0.0, x_max, width);
            let cy = map_y(v, y_min, y_max, height);
            grid[cy][cx] = marker;
        }
    }

    let legend = spec
        .series
        .iter()
        .zip(SERIES_MARKERS.iter())
        .map(|(s, m)| format!("{} ({m})", s.name))
        .collect::<Vec<_>>()
        .join(" vs ");

    let mut out = String::new();
    out.push_str(&format!("Plot: {legend} | y=[{y_min:.0}, {y_max:.0}]\n"));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&axis_footer(&spec.categories, width));
    out
}

/// Render the YoY change bar chart.
///
/// `width` is the total width budget; each category gets an equal slot and the
/// bar fills `1 - bar_gap` of it.
pub fn render_bar_chart(spec: &BarChartSpec, width: usize, height: usize) -> String {
    let n = spec.values.len();
    if n == 0 {
        return format!("Bars: {} (no data)\n", spec.title);
    }

    let height = height.max(5);
    let slot = (width / n).max(1);
    let bar_cols = ((slot as f64 * (1.0 - spec.bar_gap)).round() as usize).clamp(1, slot);
    let offset = (slot - bar_cols) / 2;
    let grid_width = slot * n;
    let [y_min, y_max] = spec.y_bounds;

    let mut grid = vec![vec![' '; grid_width]; height];
    let zero = map_y(0.0, y_min, y_max, height);
    grid[zero].iter_mut().for_each(|c| *c = '=');

    for (i, &v) in spec.values.iter().enumerate() {
        let top = map_y(v.max(0.0), y_min, y_max, height);
        let bottom = map_y(v.min(0.0), y_min, y_max, height);
        let ch = if v >= 0.0 { '+' } else { '-' };
        let start = i * slot + offset;
        for row in grid.iter_mut().take(bottom + 1).skip(top) {
            for cell in &mut row[start..start + bar_cols] {
                *cell = ch;
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!("Bars: {} | y=[{y_min:.1}, {y_max:.1}]\n", spec.title));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&axis_footer(&spec.categories, grid_width));
    out
}

/// First and last category, left and right aligned under the plot.
fn axis_footer(categories: &[String], width: usize) -> String {
    match categories {
        [] => String::new(),
        [only] => format!("{only}\n"),
        [first, .., last] => {
            let used = first.chars().count() + last.chars().count();
            let gap = width.saturating_sub(used).max(1);
            format!("{first}{}{last}\n", " ".repeat(gap))
        }
    }
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    if x_max <= x_min {
        return 0;
    }
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    if y_max <= y_min {
        return height - 1;
    }
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{build_bar_chart, build_line_chart, Palette};
    use crate::data::sample_dataset;
    use crate::domain::{ColumnNames, DashboardConfig, Dataset, Record, Theme};

    fn two_month_dataset() -> Dataset {
        Dataset::new(
            ColumnNames::default(),
            vec![
                Record::new("2024-01", 100.0, 90.0, 10.0),
                Record::new("2024-02", 90.0, 100.0, -10.0),
            ],
        )
    }

    #[test]
    fn bar_golden_snapshot_small() {
        let mut config = DashboardConfig::default();
        config.bar_width_pct = 0;
        let spec = build_bar_chart(&two_month_dataset(), &Palette::for_theme(Theme::Dark), &config);
        assert_eq!(spec.bar_gap, 0.5);

        let txt = render_bar_chart(&spec, 8, 5);
        let expected = concat!(
            "Bars: YoY change (%) | y=[-11.0, 11.0]\n",
            " ++     \n",
            " ++     \n",
            "=++==--=\n",
            "     -- \n",
            "     -- \n",
            "2024-01 2024-02\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn line_chart_marks_every_point() {
        let ds = sample_dataset();
        let mut config = DashboardConfig::default();
        config.smooth_line = false;
        let spec = build_line_chart(&ds, &Palette::for_theme(Theme::Dark), &config);
        let txt = render_line_chart(&spec, 60, 20);

        let body: String = txt.lines().skip(1).take(20).collect();
        let markers = body.chars().filter(|c| *c == 'o' || *c == 'x').count();
        // Two series of 12 points; a marker may hide another at the same cell.
        assert!(markers >= 12 && markers <= 24);
        assert!(txt.starts_with("Plot: Sales (o) vs Last year (x)"));
        assert!(txt.trim_end().ends_with("2024-12"));
    }

    #[test]
    fn spline_and_linear_share_marker_positions() {
        let ds = two_month_dataset();
        let mut config = DashboardConfig::default();
        let palette = Palette::for_theme(Theme::Dark);
        let smooth = render_line_chart(&build_line_chart(&ds, &palette, &config), 20, 6);
        config.smooth_line = false;
        let linear = render_line_chart(&build_line_chart(&ds, &palette, &config), 20, 6);
        // Two points cannot be smoothed, so the output is identical.
        assert_eq!(smooth, linear);
    }

    #[test]
    fn empty_charts_say_so() {
        let ds = Dataset::default();
        let config = DashboardConfig::default();
        let palette = Palette::for_theme(Theme::Dark);
        assert_eq!(
            render_line_chart(&build_line_chart(&ds, &palette, &config), 40, 10),
            "Plot: Sales vs last year (no data)\n"
        );
        assert_eq!(
            render_bar_chart(&build_bar_chart(&ds, &palette, &config), 40, 10),
            "Bars: YoY change (%) (no data)\n"
        );
    }
}
