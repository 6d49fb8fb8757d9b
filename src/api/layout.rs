use tracing::debug;

use crate::core::{AxisTicks, Viewport};
use crate::render::PlotRect;

use super::ChartStyle;
use super::label_format::default_label;

/// Deterministic, backend-independent label width estimate.
pub(super) fn estimate_label_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' | ':' => 0.34,
            '-' | '+' | '%' | '/' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

/// Resolves the plot rectangle: the viewport minus room for the y labels on
/// the left and the rotated x labels underneath.
///
/// Returns `None` when nothing drawable remains, in which case no surface
/// should exist.
pub(super) fn resolve_plot_rect(
    viewport: Viewport,
    style: &ChartStyle,
    y_ticks: &AxisTicks,
) -> Option<PlotRect> {
    let padding = style.padding_px();
    let label_padding = style.axis_label_padding_px();
    let font = style.label_font_size_px();

    let left = (estimate_label_text_width_px(&default_label(y_ticks.value_max), font)
        + padding
        + label_padding)
        .trunc();
    let bottom = (estimate_label_text_width_px("00000", font) + padding + label_padding).trunc();
    let top = padding;
    let right = padding;

    let width = f64::from(viewport.width) - left - right;
    let height = f64::from(viewport.height) - top - bottom;
    debug!(
        viewport_width = viewport.width,
        viewport_height = viewport.height,
        left,
        bottom,
        plot_width = width,
        plot_height = height,
        "resolved plot layout"
    );

    let rect = PlotRect::new(left, top, width, height);
    if rect.is_drawable() && width >= 1.0 && height >= 1.0 {
        Some(PlotRect::new(left, top, width.trunc(), height.trunc()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{estimate_label_text_width_px, resolve_plot_rect};
    use crate::api::ChartStyle;
    use crate::core::{AxisTicks, Viewport};

    #[test]
    fn width_estimate_has_font_size_floor() {
        assert_eq!(estimate_label_text_width_px("1", 10.0), 10.0);
        assert!(estimate_label_text_width_px("100000", 10.0) > 30.0);
    }

    #[test]
    fn tiny_viewport_has_no_plot_area() {
        let style = ChartStyle::default();
        let ticks = AxisTicks::default();
        assert!(resolve_plot_rect(Viewport::new(20, 20), &style, &ticks).is_none());
    }

    #[test]
    fn plot_rect_stays_inside_viewport() {
        let style = ChartStyle::default();
        let ticks = AxisTicks::default();
        let rect = resolve_plot_rect(Viewport::new(400, 300), &style, &ticks)
            .expect("room for a plot");
        assert!(rect.x > 0.0 && rect.y > 0.0);
        assert!(rect.right() <= 400.0);
        assert!(rect.bottom() <= 300.0);
    }
}
