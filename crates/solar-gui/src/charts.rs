//! Bar and line charts drawn with the egui painter

use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Ui};
use solar_app::report::{BarChart, LineChart};

const CHART_HEIGHT: f32 = 260.0;
const MAX_CHART_WIDTH: f32 = 560.0;
const MARGIN_LEFT: f32 = 16.0;
const MARGIN_RIGHT: f32 = 16.0;
const MARGIN_TOP: f32 = 24.0;
const MARGIN_BOTTOM: f32 = 28.0;

fn color([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Pixel offset of `value` above the baseline of a `height` tall plot
fn scale(value: f64, max: f64, height: f32) -> f32 {
    if max <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    ((value.max(0.0) / max) as f32 * height).min(height)
}

fn plot_area(ui: &mut Ui) -> (egui::Painter, Rect) {
    let width = ui.available_width().min(MAX_CHART_WIDTH);
    let (response, painter) = ui.allocate_painter(vec2(width, CHART_HEIGHT), Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);

    let plot = Rect::from_min_max(
        pos2(rect.left() + MARGIN_LEFT, rect.top() + MARGIN_TOP),
        pos2(rect.right() - MARGIN_RIGHT, rect.bottom() - MARGIN_BOTTOM),
    );
    let axis = Stroke::new(1.0, ui.visuals().weak_text_color());
    painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
    (painter, plot)
}

pub fn bar_chart(ui: &mut Ui, chart: &BarChart) {
    ui.label(RichText::new(&chart.title).strong());
    let text_color = ui.visuals().text_color();
    let (painter, plot) = plot_area(ui);

    let max = chart.bars.iter().map(|b| b.value).fold(0.0, f64::max);
    let slot = plot.width() / chart.bars.len().max(1) as f32;

    for (i, bar) in chart.bars.iter().enumerate() {
        let left = plot.left() + slot * i as f32;
        let height = scale(bar.value, max, plot.height());
        let bar_rect = Rect::from_min_max(
            pos2(left + slot * 0.2, plot.bottom() - height),
            pos2(left + slot * 0.8, plot.bottom()),
        );
        painter.rect_filled(bar_rect, 2.0, color(bar.color));
        painter.text(
            pos2(bar_rect.center().x, bar_rect.top() - 2.0),
            Align2::CENTER_BOTTOM,
            &bar.text,
            FontId::proportional(12.0),
            text_color,
        );
        painter.text(
            pos2(bar_rect.center().x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            &bar.label,
            FontId::proportional(12.0),
            text_color,
        );
    }
}

pub fn line_chart(ui: &mut Ui, chart: &LineChart) {
    ui.label(RichText::new(&chart.title).strong());

    ui.horizontal(|ui| {
        for series in &chart.series {
            ui.label(RichText::new("■").color(color(series.color)));
            ui.label(&series.name);
            ui.add_space(12.0);
        }
    });

    let text_color = ui.visuals().text_color();
    let (painter, plot) = plot_area(ui);

    let max = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0, f64::max);
    let count = chart.categories.len().max(2);
    let step = plot.width() / (count - 1) as f32;
    let x_at = |i: usize| plot.left() + step * i as f32;

    for (i, category) in chart.categories.iter().enumerate() {
        painter.text(
            pos2(x_at(i), plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            category,
            FontId::proportional(11.0),
            text_color,
        );
    }

    for series in &chart.series {
        let stroke = Stroke::new(2.0, color(series.color));
        let points: Vec<Pos2> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| pos2(x_at(i), plot.bottom() - scale(*v, max, plot.height())))
            .collect();

        for pair in points.windows(2) {
            painter.line_segment([pair[0], pair[1]], stroke);
        }
        for (point, label) in points.iter().zip(&series.labels) {
            painter.circle_filled(*point, 3.0, color(series.color));
            if let Some(hovered) = ui.ctx().pointer_hover_pos() {
                if hovered.distance(*point) < 6.0 {
                    painter.text(
                        *point - vec2(0.0, 6.0),
                        Align2::CENTER_BOTTOM,
                        label,
                        FontId::proportional(11.0),
                        text_color,
                    );
                }
            }
        }
    }
}
