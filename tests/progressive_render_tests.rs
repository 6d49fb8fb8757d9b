use std::time::Duration;

use expanding_chart::api::{
    ChartEngine, ChartEngineConfig, ChartParams, ManualFrameHost, RenderPhase,
};
use expanding_chart::core::{DataPoint, Viewport};
use expanding_chart::render::{LinePrimitive, NullRenderer, SurfaceCommand};
use proptest::prelude::*;

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

fn set_single(engine: &mut TestEngine, points: Vec<DataPoint>) {
    engine
        .set_data(vec![Some("A".to_owned())], vec![points], &[])
        .expect("set data");
}

/// Fires pending frames until the chain stops; returns how many fired.
fn drive(engine: &mut TestEngine) -> usize {
    let mut fired = 0;
    while engine.host_mut().take_pending_frame().is_some() {
        engine.on_frame_tick().expect("frame tick");
        fired += 1;
        assert!(fired < 10_000, "animation chain did not terminate");
    }
    fired
}

fn sorted_segments(engine: &TestEngine) -> Vec<LinePrimitive> {
    let mut segments = engine.plot_surface().expect("surface").segments();
    segments.sort_by(|a, b| {
        a.x1.total_cmp(&b.x1)
            .then(a.y1.total_cmp(&b.y1))
            .then(a.x2.total_cmp(&b.x2))
            .then(a.y2.total_cmp(&b.y2))
    });
    segments
}

#[test]
fn five_points_one_per_frame_take_five_frames() {
    let mut engine = engine_with(ChartParams::default().with_draw_count_per_frame(1));
    set_single(&mut engine, series_a());

    // The clearing frame runs synchronously inside set_data.
    assert_eq!(engine.phase(), RenderPhase::DrawingSegment);
    let fired = drive(&mut engine);

    assert_eq!(1 + fired, 5);
    assert_eq!(engine.host().scheduled_total(), 4);
    assert_eq!(engine.phase(), RenderPhase::Idle);
    assert_eq!(engine.cursor().next_point_index, 5);
    assert_eq!(engine.plot_surface().expect("surface").segments().len(), 4);
}

#[test]
fn frames_use_the_configured_interval() {
    let mut engine = engine_with(ChartParams::default().with_fps(20));
    set_single(&mut engine, series_a());

    assert_eq!(
        engine.host().pending_frame(),
        Some(Duration::from_millis(50))
    );
}

#[test]
fn each_frame_issues_one_line_call_per_series() {
    let mut engine = engine_with(ChartParams::default().with_draw_count_per_frame(2));
    engine
        .set_data(
            vec![Some("A".to_owned()), Some("B".to_owned())],
            vec![series_a(), series_a()],
            &[Some("red".to_owned()), Some("blue".to_owned())],
        )
        .expect("set data");

    engine.host_mut().take_pending_frame();
    engine.on_frame_tick().expect("first drawing frame");

    let commands = engine.plot_surface().expect("surface").commands_since_clear();
    let line_calls = commands
        .iter()
        .filter(|command| matches!(command, SurfaceCommand::Lines { .. }))
        .count();
    assert_eq!(line_calls, 2);
    // Column 0 plus one column of two new points (one per series).
    assert_eq!(engine.cursor().next_point_index, 2);
}

#[test]
fn consecutive_batches_connect_without_gaps() {
    let mut engine = engine_with(ChartParams::default().with_draw_count_per_frame(1));
    set_single(&mut engine, series_a());
    drive(&mut engine);

    let segments = engine.plot_surface().expect("surface").segments();
    for pair in segments.windows(2) {
        assert_eq!((pair[0].x2, pair[0].y2), (pair[1].x1, pair[1].y1));
    }
}

#[test]
fn points_map_through_each_axis_range() {
    let mut engine = engine_with(ChartParams::default().with_draw_count_per_frame(100));
    set_single(&mut engine, series_a());
    drive(&mut engine);

    // x axis 0..60, y axis 0..30
    let surface = engine.plot_surface().expect("surface");
    let width = f64::from(expanding_chart::render::PlotSurface::width(surface));
    let height = f64::from(expanding_chart::render::PlotSurface::height(surface));
    let first = surface.segments()[0];
    assert!((first.x1 - 10.0 * width / 60.0).abs() < 1e-9);
    assert!((first.y1 - (height - 10.0 * height / 30.0)).abs() < 1e-9);
}

#[test]
fn one_point_series_draws_a_dot() {
    let mut engine = engine_with(ChartParams::default());
    set_single(&mut engine, vec![DataPoint::new(5.0, 7.0)]);
    drive(&mut engine);

    let surface = engine.plot_surface().expect("surface");
    assert!(surface.segments().is_empty());
    let dots = surface.dots();
    assert_eq!(dots.len(), 1);
    assert_eq!(dots[0].2, engine.style().series_stroke_width_px() / 2.0);
    assert!(dots[0].0.is_finite() && dots[0].1.is_finite());
}

#[test]
fn unnamed_series_is_never_drawn() {
    let mut engine = engine_with(ChartParams::default().with_draw_count_per_frame(100));
    engine
        .set_data(
            vec![None, Some("B".to_owned())],
            vec![series_a(), vec![DataPoint::new(10.0, 1.0), DataPoint::new(20.0, 2.0)]],
            &[],
        )
        .expect("set data");
    drive(&mut engine);

    assert_eq!(engine.plot_surface().expect("surface").segments().len(), 1);
    assert_eq!(engine.phase(), RenderPhase::Idle);
}

#[test]
fn hiding_halts_without_losing_the_cursor() {
    let mut engine = engine_with(ChartParams::default().with_draw_count_per_frame(1));
    set_single(&mut engine, series_a());
    for _ in 0..2 {
        engine.host_mut().take_pending_frame();
        engine.on_frame_tick().expect("frame");
    }
    let cursor = engine.cursor().next_point_index;
    assert_eq!(cursor, 3);

    engine.set_visible(false).expect("hide");
    assert!(engine.host_mut().take_pending_frame().is_some());
    engine.on_frame_tick().expect("hidden frame");

    assert_eq!(engine.phase(), RenderPhase::Idle);
    assert_eq!(engine.cursor().next_point_index, cursor);
    assert!(engine.host().pending_frame().is_none());

    engine.set_visible(true).expect("show");
    assert_eq!(engine.cursor().next_point_index, 0);
    assert_eq!(engine.phase(), RenderPhase::DrawingSegment);
    drive(&mut engine);
    assert_eq!(engine.cursor().next_point_index, 5);
}

#[test]
fn restart_while_in_flight_does_not_start_a_second_chain() {
    let mut engine = engine_with(ChartParams::default().with_draw_count_per_frame(1));
    set_single(&mut engine, series_a());
    engine.host_mut().take_pending_frame();
    engine.on_frame_tick().expect("frame");
    let scheduled = engine.host().scheduled_total();
    let clears = engine.plot_surface().expect("surface").clear_count();

    set_single(&mut engine, series_a());

    assert_eq!(engine.host().scheduled_total(), scheduled);
    assert_eq!(engine.phase(), RenderPhase::ClearingBuffer);
    assert_eq!(engine.cursor().next_point_index, 0);
    assert!(engine.cursor().buffer_dirty);

    drive(&mut engine);
    assert_eq!(engine.plot_surface().expect("surface").clear_count(), clears + 1);
    assert_eq!(engine.plot_surface().expect("surface").segments().len(), 4);
    assert_eq!(engine.phase(), RenderPhase::Idle);
}

#[test]
fn restart_after_a_lost_frame_starts_a_new_chain() {
    let mut engine = engine_with(ChartParams::default().with_draw_count_per_frame(1));
    set_single(&mut engine, series_a());
    // The host drops the frame without ever firing it.
    engine.host_mut().take_pending_frame();
    assert_eq!(engine.phase(), RenderPhase::DrawingSegment);

    set_single(&mut engine, series_a());

    assert!(engine.host().pending_frame().is_some());
    assert_eq!(engine.phase(), RenderPhase::DrawingSegment);
    drive(&mut engine);
    assert_eq!(engine.phase(), RenderPhase::Idle);
    assert_eq!(engine.plot_surface().expect("surface").segments().len(), 4);
}

#[test]
fn degenerate_plot_area_disables_drawing() {
    let config = ChartEngineConfig::new(Viewport::new(20, 20));
    let mut engine =
        ChartEngine::new(NullRenderer::default(), ManualFrameHost::new(), config).expect("init");
    set_single(&mut engine, series_a());

    assert!(engine.plot_surface().is_none());
    assert!(engine.plot_rect().is_none());
    assert_eq!(engine.phase(), RenderPhase::Idle);
    assert_eq!(engine.host().scheduled_total(), 0);

    engine.paint().expect("paint");
    let frame = engine.renderer().last_frame.as_ref().expect("frame");
    assert!(frame.is_empty());
}

#[test]
fn resize_recreates_the_surface_and_restarts() {
    let mut engine = engine_with(ChartParams::default().with_draw_count_per_frame(100));
    set_single(&mut engine, series_a());
    drive(&mut engine);
    let created = engine.renderer().surfaces_created;

    engine.resize(800, 600).expect("resize");
    assert_eq!(engine.renderer().surfaces_created, created + 1);
    assert_eq!(engine.cursor().next_point_index, 0);
    drive(&mut engine);
    assert_eq!(engine.plot_surface().expect("surface").segments().len(), 4);
}

#[test]
fn zero_sized_resize_is_ignored() {
    let mut engine = engine_with(ChartParams::default().with_draw_count_per_frame(100));
    set_single(&mut engine, series_a());
    drive(&mut engine);

    engine.resize(0, 300).expect("zero resize");
    assert_eq!(engine.viewport(), Viewport::new(400, 300));
    assert!(engine.plot_surface().is_some());
    assert_eq!(engine.phase(), RenderPhase::Idle);

    engine.resize(500, 300).expect("resize");
    assert_eq!(engine.phase(), RenderPhase::DrawingSegment);
}

#[test]
fn shutdown_and_drop_cancel_the_pending_frame() {
    let mut host = ManualFrameHost::new();
    {
        let config = ChartEngineConfig::new(Viewport::new(400, 300));
        let mut engine =
            ChartEngine::new(NullRenderer::default(), &mut host, config).expect("init");
        engine
            .set_data(vec![Some("A".to_owned())], vec![series_a()], &[])
            .expect("set data");
    }
    assert!(host.pending_frame().is_none());
    assert_eq!(host.cancelled_total(), 1);

    let mut engine = engine_with(ChartParams::default());
    set_single(&mut engine, series_a());
    engine.shutdown();
    assert!(engine.host().pending_frame().is_none());
    assert_eq!(engine.phase(), RenderPhase::Idle);
}

#[test]
fn draw_count_change_applies_to_the_running_chain() {
    let mut engine = engine_with(ChartParams::default().with_draw_count_per_frame(1));
    let points: Vec<DataPoint> = (0..20).map(|i| DataPoint::new(f64::from(i), 1.0)).collect();
    set_single(&mut engine, points);

    engine.set_draw_count_per_frame(10).expect("draw count");
    let fired = drive(&mut engine);
    // 19 new points after column 0, ten per frame.
    assert_eq!(fired, 2);
    assert!(engine.set_draw_count_per_frame(0).is_err());
}

proptest! {
    #[test]
    fn progressive_draw_matches_single_pass(
        lengths in prop::collection::vec(1usize..24, 1..4),
        draw_per_tick in 1u32..7,
        seed in 0u32..1_000
    ) {
        let names: Vec<Option<String>> =
            (0..lengths.len()).map(|i| Some(format!("s{i}"))).collect();
        let series: Vec<Vec<DataPoint>> = lengths
            .iter()
            .enumerate()
            .map(|(s, &len)| {
                (0..len)
                    .map(|i| {
                        let x = i as f64 * 3.0 + s as f64;
                        let y = f64::from((seed + (i as u32) * 7 + (s as u32) * 13) % 41);
                        DataPoint::new(x, y)
                    })
                    .collect()
            })
            .collect();

        let mut progressive =
            engine_with(ChartParams::default().with_draw_count_per_frame(draw_per_tick));
        progressive.set_data(names.clone(), series.clone(), &[]).expect("set data");
        let fired = drive(&mut progressive);

        let mut single = engine_with(ChartParams::default().with_draw_count_per_frame(10_000));
        single.set_data(names, series, &[]).expect("set data");
        drive(&mut single);

        let longest = lengths.iter().copied().max().unwrap_or(0);
        let expected_frames = (longest.saturating_sub(1)).div_ceil(draw_per_tick as usize).max(1);
        if lengths.len() == 1 {
            prop_assert_eq!(fired, expected_frames);
        }
        prop_assert_eq!(sorted_segments(&progressive), sorted_segments(&single));
        prop_assert_eq!(
            progressive.plot_surface().expect("surface").dots(),
            single.plot_surface().expect("surface").dots()
        );
    }
}
