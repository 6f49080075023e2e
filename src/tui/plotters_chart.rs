//! Plotters-powered price trend chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - a real dashed line series for the forecast overlay
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct PriceTrendChart<'a> {
    /// Observed (or yearly-averaged) prices.
    pub history: &'a [(f64, f64)],
    /// Forecast overlay, drawn dashed. Empty when disabled.
    pub forecast: &'a [(f64, f64)],
    /// X bounds (fractional years).
    pub x_bounds: [f64; 2],
    /// Y bounds (¢/kWh).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for PriceTrendChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

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
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let history_color = RGBColor(0, 255, 255); // cyan

            // 1) Price line.
            chart.draw_series(LineSeries::new(self.history.iter().copied(), &history_color))?;

            // 2) Observed points, so single-point series stay visible.
            chart.draw_series(
                self.history
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), WHITE)),
            )?;

            // 3) Forecast overlay, joined to the last observation.
            if !self.forecast.is_empty() {
                let overlay = self
                    .history
                    .last()
                    .copied()
                    .into_iter()
                    .chain(self.forecast.iter().copied());
                chart.draw_series(DashedLineSeries::new(overlay, 4, 3, forecast_style()))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Orange, one pixel wide.
fn forecast_style() -> ShapeStyle {
    ShapeStyle::from(&RGBColor(255, 165, 0)).stroke_width(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart<'a>(history: &'a [(f64, f64)], forecast: &'a [(f64, f64)]) -> PriceTrendChart<'a> {
        PriceTrendChart {
            history,
            forecast,
            x_bounds: [2023.0, 2024.0],
            y_bounds: [9.0, 12.0],
            x_label: "Date",
            y_label: "¢/kWh",
            fmt_x: |v| format!("{v:.1}"),
            fmt_y: |v| format!("{v:.1}"),
        }
    }

    #[test]
    fn forecast_line_is_thin_orange() {
        let style = forecast_style();
        assert_eq!(style.stroke_width, 1);
        assert_eq!((style.color.0, style.color.1, style.color.2), (255, 165, 0));
    }

    #[test]
    fn tiny_area_shows_resize_hint() {
        let history = [(2023.0, 10.0), (2023.5, 11.0)];
        let forecast = [(2024.0, 11.5)];
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        chart(&history, &forecast).render(area, &mut buf);
        let first_row: String = (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(first_row, "Chart area");
    }
}
