//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed prices: `o`
//! - history line: `-`
//! - forecast overlay: `.` (dashed)

use crate::report::ChartSpec;

/// Render a chart spec to a fixed-size character grid.
pub fn render_ascii_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some((x_min, x_max)), Some((y_min, y_max))) = (spec.x_bounds(), spec.y_bounds()) else {
        return format!("Plot: {} (no data)\n", spec.title);
    };
    let (x_min, x_max) = widen_if_flat(x_min, x_max, 0.5);
    let (y_min, y_max) = widen_if_flat(y_min, y_max, 0.5);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let frame = Frame {
        x_min,
        x_max,
        y_min,
        y_max,
        width,
        height,
    };

    let history: Vec<(f64, f64)> = spec.history.iter().map(|p| (p.x, p.price)).collect();
    draw_polyline(&mut grid, &history, &frame, '-');

    if let Some(forecast) = &spec.forecast {
        // Join the overlay to the last observation so the dashes read as a continuation.
        let mut overlay: Vec<(f64, f64)> = history.last().copied().into_iter().collect();
        overlay.extend(forecast.iter().map(|p| (p.x, p.price)));
        draw_polyline(&mut grid, &overlay, &frame, '.');
    }

    for &(x, y) in &history {
        let col = map_x(x, &frame);
        let row = map_y(y, &frame);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | x=[{x_min:.2}, {x_max:.2}] | y=[{y_min:.2}, {y_max:.2}] {}\n",
        spec.title, spec.y_label
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: usize,
    height: usize,
}

fn widen_if_flat(min: f64, max: f64, half_width: f64) -> (f64, f64) {
    if max > min {
        (min, max)
    } else {
        (min - half_width, max + half_width)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, f: &Frame) -> usize {
    let u = ((x - f.x_min) / (f.x_max - f.x_min)).clamp(0.0, 1.0);
    (u * (f.width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, f: &Frame) -> usize {
    let u = ((y - f.y_min) / (f.y_max - f.y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (f.height as f64 - 1.0 - (u * (f.height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], points: &[(f64, f64)], frame: &Frame, ch: char) {
    let mut prev = None;
    for &(x, y) in points {
        let col = map_x(x, frame);
        let row = map_y(y, frame);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None => {
                if grid[row][col] == ' ' {
                    grid[row][col] = ch;
                }
            }
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish). Never overwrites existing marks.
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
    use crate::domain::Granularity;
    use crate::report::ChartPoint;

    fn point(x: f64, price: f64) -> ChartPoint {
        ChartPoint {
            x,
            label: String::new(),
            price,
        }
    }

    fn spec(history: Vec<ChartPoint>, forecast: Option<Vec<ChartPoint>>) -> ChartSpec {
        ChartSpec {
            title: "T".to_string(),
            x_label: "Date".to_string(),
            y_label: "¢/kWh".to_string(),
            granularity: Granularity::Monthly,
            history,
            forecast,
        }
    }

    #[test]
    fn flat_history_golden_snapshot() {
        let txt = render_ascii_chart(&spec(vec![point(2023.0, 10.0), point(2024.0, 10.0)], None), 10, 5);
        let expected = concat!(
            "Plot: T | x=[2023.00, 2024.00] | y=[9.45, 10.55] ¢/kWh\n",
            "\n",
            "\n",
            "o--------o\n",
            "\n",
            "\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn forecast_overlay_is_dotted() {
        let history = vec![point(2023.0, 10.0), point(2023.5, 11.0)];
        let forecast = vec![point(2023.75, 12.0), point(2024.0, 13.0)];
        let txt = render_ascii_chart(&spec(history, Some(forecast)), 40, 10);

        assert_eq!(txt.lines().count(), 11);
        assert!(txt.contains('.'));
        let marks: usize = txt.lines().skip(1).map(|l| l.matches('o').count()).sum();
        assert_eq!(marks, 2);
        // The latest forecast point sits top-right.
        assert!(txt.lines().nth(1).unwrap().ends_with('.'));
    }

    #[test]
    fn empty_spec_renders_placeholder() {
        assert_eq!(render_ascii_chart(&spec(vec![], None), 10, 5), "Plot: T (no data)\n");
    }
}
