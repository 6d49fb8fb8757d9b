#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use expanding_chart::ChartError;
use expanding_chart::api::{ChartEngine, ChartEngineConfig, ChartParams, ManualFrameHost};
use expanding_chart::core::{DataPoint, Viewport};
use expanding_chart::render::{CairoRenderer, PlotSurface};

type CairoEngine = ChartEngine<CairoRenderer, ManualFrameHost>;

fn drawn_engine(width: u32, height: u32) -> CairoEngine {
    let renderer = CairoRenderer::new(width as i32, height as i32).expect("renderer");
    let params = ChartParams::default()
        .with_value_labels(false, false)
        .with_draw_count_per_frame(100);
    let config = ChartEngineConfig::new(Viewport::new(width, height)).with_params(params);
    let mut engine =
        ChartEngine::new(renderer, ManualFrameHost::new(), config).expect("engine init");
    engine
        .set_data(
            vec![Some("A".to_owned())],
            vec![vec![
                DataPoint::new(10.0, 10.0),
                DataPoint::new(20.0, 15.0),
                DataPoint::new(30.0, 10.0),
                DataPoint::new(40.0, 20.0),
                DataPoint::new(50.0, 25.0),
            ]],
            &[Some("#1e88e5".to_owned())],
        )
        .expect("set data");
    while engine.host_mut().take_pending_frame().is_some() {
        engine.on_frame_tick().expect("frame");
    }
    engine
}

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn cairo_renderer_composites_grid_labels_and_plot() {
    let mut engine = drawn_engine(900, 500);
    engine.paint().expect("paint");
    let stats = engine.renderer().last_stats();

    // 4 y grid lines + 7 x grid lines + 2 axes
    assert_eq!(stats.lines_drawn, 13);
    assert_eq!(stats.texts_drawn, 11);
    assert_eq!(stats.surfaces_blitted, 1);

    let surface = engine.plot_surface().expect("plot surface");
    let plot = engine.plot_rect().expect("plot rect");
    assert_eq!(surface.width(), plot.width as u32);
}

#[test]
fn cairo_renderer_can_paint_on_external_context() {
    let mut engine = drawn_engine(600, 320);

    let target = ImageSurface::create(Format::ARgb32, 600, 320).expect("surface");
    let context = Context::new(&target).expect("context");
    engine
        .paint_on_cairo_context(&context)
        .expect("paint on context");

    assert_eq!(engine.renderer().last_stats().surfaces_blitted, 1);
}
