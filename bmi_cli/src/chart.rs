//! Terminal line plot of a user's BMI trend.
//!
//! The series is drawn with ratatui's `Chart` widget into an off-screen
//! buffer, which is then printed as plain text.

use bmi_core::{format_2dp, TrendPoint};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Widget};

/// Render `points` (oldest first) into a `width` x `height` cell chart with
/// BMI labels on the left and the first and last dates underneath.
pub fn render(points: &[TrendPoint], width: usize, height: usize) -> String {
    if points.is_empty() {
        return String::new();
    }
    let area = Rect::new(0, 0, to_cells(width), to_cells(height));

    // x is seconds since the first entry
    let start = points[0].created_at;
    let data: Vec<(f64, f64)> = points
        .iter()
        .map(|p| ((p.created_at - start).num_milliseconds() as f64 / 1000.0, p.bmi))
        .collect();

    let x_max = data.last().map_or(0.0, |&(x, _)| x).max(1.0);
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.bmi), hi.max(p.bmi))
        });
    // A flat series still needs a vertical range to place it in
    let (lo, hi) = if max - min < 1e-9 {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    };

    let first = points[0].created_at.format("%Y-%m-%d").to_string();
    let last = points[points.len() - 1].created_at.format("%Y-%m-%d").to_string();

    let datasets = vec![
        Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .data(&data),
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .data(&data),
    ];
    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec![Span::raw(format_2dp(lo)), Span::raw(format_2dp(hi))]),
        );

    let mut buf = Buffer::empty(area);
    chart.render(area, &mut buf);
    buffer_to_string(&buf)
}

fn to_cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buf[(x, y)].symbol());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
