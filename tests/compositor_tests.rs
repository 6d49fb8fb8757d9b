use expanding_chart::api::{
    AxisValueKind, ChartEngine, ChartEngineConfig, ChartParams, ManualFrameHost,
    X_LABEL_ROTATION_DEG,
};
use expanding_chart::core::{DataPoint, Viewport};
use expanding_chart::render::{NullRenderer, RenderFrame, TextHAlign};

type TestEngine = ChartEngine<NullRenderer, ManualFrameHost>;

fn engine_with(params: ChartParams) -> TestEngine {
    let config = ChartEngineConfig::new(Viewport::new(400, 300)).with_params(params);
    ChartEngine::new(NullRenderer::default(), ManualFrameHost::new(), config).expect("engine init")
}

fn series_a() -> Vec<DataPoint> {
    vec![
        DataPoint::new(10.0, 10.0),
        DataPoint::new(20.0, 15.0),
        DataPoint::new(30.0, 10.0),
        DataPoint::new(40.0, 20.0),
        DataPoint::new(50.0, 25.0),
    ]
}

fn loaded(params: ChartParams) -> TestEngine {
    let mut engine = engine_with(params.with_draw_count_per_frame(100));
    engine
        .set_data(vec![Some("A".to_owned())], vec![series_a()], &[])
        .expect("set data");
    while engine.host_mut().take_pending_frame().is_some() {
        engine.on_frame_tick().expect("frame");
    }
    engine
}

fn painted(engine: &mut TestEngine) -> RenderFrame {
    engine.paint().expect("paint");
    engine
        .renderer()
        .last_frame
        .clone()
        .expect("renderer received a frame")
}

#[test]
fn frame_has_grid_labels_blit_and_axes() {
    let mut engine = loaded(ChartParams::default().with_value_labels(false, false));
    let frame = painted(&mut engine);
    let plot = engine.plot_rect().expect("plot rect");

    // y ticks 0..30 by 10, x ticks 0..60 by 10
    assert_eq!(frame.grid_lines.len(), 4 + 7);
    assert_eq!(frame.texts.len(), 4 + 7);
    assert_eq!(frame.plot, Some(plot));
    assert_eq!(frame.axis_lines.len(), 2);
    assert_eq!(engine.renderer().last_blitted_segment_count, 4);

    let labels: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert_eq!(&labels[..4], &["0", "10", "20", "30"]);
    assert_eq!(&labels[4..], &["0", "10", "20", "30", "40", "50", "60"]);
}

#[test]
fn y_labels_are_right_aligned_left_of_the_plot() {
    let mut engine = loaded(ChartParams::default().with_value_labels(false, false));
    let frame = painted(&mut engine);
    let plot = engine.plot_rect().expect("plot rect");
    let padding = engine.style().axis_label_padding_px();
    let font = engine.style().label_font_size_px();

    let bottom_label = &frame.texts[0];
    assert_eq!(bottom_label.h_align, TextHAlign::Right);
    assert_eq!(bottom_label.rotation_deg, 0.0);
    assert_eq!(bottom_label.x, plot.x - padding);
    assert_eq!(bottom_label.y, plot.bottom() + font / 2.0);

    let bottom_grid = frame.grid_lines[0];
    assert_eq!((bottom_grid.x1, bottom_grid.x2), (plot.x, plot.right()));
    assert_eq!(bottom_grid.y1, plot.bottom());
}

#[test]
fn x_labels_are_rotated_below_the_plot() {
    let mut engine = loaded(ChartParams::default().with_value_labels(false, false));
    let frame = painted(&mut engine);
    let plot = engine.plot_rect().expect("plot rect");
    let font = engine.style().label_font_size_px();

    let first_x_label = &frame.texts[4];
    assert_eq!(first_x_label.rotation_deg, X_LABEL_ROTATION_DEG);
    assert_eq!(first_x_label.x, plot.x + font / 2.0);
    assert!(first_x_label.y > plot.bottom());

    let first_x_grid = frame.grid_lines[4];
    assert_eq!((first_x_grid.x1, first_x_grid.x2), (plot.x, plot.x));
    assert_eq!((first_x_grid.y1, first_x_grid.y2), (plot.y, plot.bottom()));
}

#[test]
fn axis_baselines_frame_the_plot() {
    let mut engine = loaded(ChartParams::default());
    let frame = painted(&mut engine);
    let plot = engine.plot_rect().expect("plot rect");
    let axis_width = engine.style().axis_stroke_width_px();

    let left = frame.axis_lines[0];
    assert_eq!((left.x1, left.y1), (plot.x, plot.y));
    assert_eq!((left.x2, left.y2), (plot.x, plot.bottom() + axis_width / 2.0));

    let bottom = frame.axis_lines[1];
    assert_eq!((bottom.x1, bottom.y1), (plot.x, plot.bottom()));
    assert_eq!((bottom.x2, bottom.y2), (plot.right(), plot.bottom()));
}

#[test]
fn value_labels_annotate_every_point() {
    let mut engine = loaded(ChartParams::default().with_value_labels(true, false));
    let frame = painted(&mut engine);
    assert_eq!(frame.texts.len(), 4 + 7 + 5);
    assert_eq!(frame.grid_lines.len(), 4 + 7 + 5);

    engine.set_y_value_label_enabled(true);
    let frame = painted(&mut engine);
    assert_eq!(frame.texts.len(), 4 + 7 + 5 + 5);

    engine.set_x_value_label_enabled(false);
    engine.set_y_value_label_enabled(false);
    let frame = painted(&mut engine);
    assert_eq!(frame.texts.len(), 4 + 7);
}

#[test]
fn disabled_ticks_skip_grid_and_labels() {
    let params = ChartParams::default()
        .with_value_labels(false, false)
        .with_y_ticks(expanding_chart::core::AxisTicks::default().with_enabled(false));
    let mut engine = loaded(params);
    let frame = painted(&mut engine);

    assert_eq!(frame.texts.len(), 7);
    assert_eq!(frame.axis_lines.len(), 2);
}

#[test]
fn custom_formatter_falls_back_to_default_text() {
    let params = ChartParams::default()
        .with_value_labels(false, false)
        .with_y_label_formatter(|value| match value as i64 {
            10 => None,
            20 => Some(String::new()),
            other => Some(format!("v{other}")),
        });
    let mut engine = loaded(params);
    let frame = painted(&mut engine);

    let y_labels: Vec<&str> = frame.texts[..4].iter().map(|t| t.text.as_str()).collect();
    assert_eq!(y_labels, vec!["v0", "10", "20", "v30"]);
}

#[test]
fn number_format_applies_to_tick_labels() {
    let params = ChartParams::default()
        .with_value_labels(false, false)
        .with_y_format(AxisValueKind::Number, "%.1f%%");
    let mut engine = loaded(params);
    let frame = painted(&mut engine);

    assert_eq!(frame.texts[1].text, "10.0%");
}

#[test]
fn no_data_paints_an_empty_frame() {
    let mut engine = engine_with(ChartParams::default());
    let frame = painted(&mut engine);
    assert!(frame.is_empty());
}

#[test]
fn hidden_chart_paints_an_empty_frame() {
    let mut engine = loaded(ChartParams::default());
    engine.set_visible(false).expect("hide");
    let frame = painted(&mut engine);
    assert!(frame.is_empty());
}
