use chart_panes::api::indicator::{Indicator, IndicatorFigure, IndicatorRow};
use chart_panes::api::styles::{TooltipIconPosition, TooltipIconStyles};
use chart_panes::core::{AxisName, AxisOptions, Coordinate, KLineData, PaneId, PaneOptionsUpdate};
use chart_panes::interaction::{ActionType, FigureEventAction, PointerEvent, TooltipIconKey, TooltipTitleKey};
use chart_panes::render::figure::{FigureAttrs, FigureStyles, get_text_rect};
use chart_panes::render::{DrawCommand, EstimatedTextMeasurer, RecordingSurface};
use chart_panes::{ChartEngine, ChartEngineConfig, ChartStore, MemoryStore, UpdateLevel};

fn bars(count: usize) -> Vec<KLineData> {
    (0..count)
        .map(|i| {
            let base = 50.0 + (i % 7) as f64;
            let timestamp = 1_700_000_000_000 + i as i64 * 3_600_000;
            KLineData::new(timestamp, base, base + 1.5, base - 1.5, base + 0.5).expect("valid bar")
        })
        .collect()
}

fn moving_average(count: usize) -> Indicator {
    let result: Vec<IndicatorRow> = (0..count)
        .map(|i| [("ma5".to_owned(), 50.0 + i as f64 * 0.1)].into_iter().collect())
        .collect();
    Indicator::new("MA")
        .with_calc_params(vec![5.0])
        .with_precision(2)
        .with_figure(IndicatorFigure::line("ma5", "MA5: "))
        .with_result(result)
}

fn engine() -> ChartEngine<MemoryStore> {
    let mut store = MemoryStore::new(bars(40));
    store.add_indicator(PaneId::Candle, moving_average(40));
    store.styles_mut().indicator.tooltip.icons = vec![TooltipIconStyles {
        id: "settings".to_owned(),
        position: TooltipIconPosition::Middle,
        icon: "S".to_owned(),
        padding_left: 2.0,
        padding_right: 2.0,
        ..TooltipIconStyles::default()
    }];
    ChartEngine::new(store, ChartEngineConfig::new(800.0, 500.0)).expect("engine")
}

/// Chart coordinate of the center of the first overlay figure on the candle
/// pane whose move handler matches `wanted`.
fn center_of(engine: &ChartEngine<MemoryStore>, wanted: impl Fn(&FigureEventAction) -> bool) -> Coordinate {
    let pane = engine.pane(PaneId::Candle).expect("candle");
    let main = pane.main_widget();
    let figure = main
        .interactive_figures()
        .find(|figure| figure.handlers.on_move.as_ref().is_some_and(&wanted))
        .expect("interactive figure");
    let (FigureAttrs::Text(items), FigureStyles::Text(style)) = (&figure.attrs, &figure.styles) else {
        panic!("expected a text figure");
    };
    let rect = get_text_rect(&items[0], style, &EstimatedTextMeasurer::default());
    Coordinate::new(
        main.bounding().left + rect.x + rect.width / 2.0,
        pane.bounding().top + main.bounding().top + rect.y + rect.height / 2.0,
    )
}

fn is_icon(action: &FigureEventAction) -> bool {
    matches!(action, FigureEventAction::ActivateTooltipIcon(_))
}

fn is_title(action: &FigureEventAction) -> bool {
    matches!(action, FigureEventAction::ActivateTooltipTitle(_))
}

#[test]
fn idle_crosshair_points_at_last_bar() {
    let engine = engine();
    let crosshair = engine.store().crosshair();
    assert_eq!(crosshair.pane_id, None);
    assert_eq!(crosshair.data_index, Some(39));
    assert!(crosshair.kline_data.is_some());
}

#[test]
fn pointer_move_snaps_crosshair_to_nearest_bar() {
    let mut engine = engine();
    let x = engine.x_axis().value_to_pixel(12.0) + 1.0;
    engine.dispatch_pointer_event(PointerEvent::moved(x, 100.0));

    let crosshair = *engine.store().crosshair();
    assert_eq!(crosshair.pane_id, Some(PaneId::Candle));
    assert_eq!(crosshair.data_index, Some(12));
    assert_eq!(crosshair.y, Some(100.0));
    assert_eq!(crosshair.kline_data, Some(engine.store().data_list()[12]));

    let candle = engine.pane(PaneId::Candle).expect("candle");
    let overlay = candle.main_widget().overlay_picture();
    let lines = overlay
        .commands()
        .iter()
        .filter(|command| matches!(command, DrawCommand::StrokeLine { .. }))
        .count();
    assert!(lines >= 2);
}

#[test]
fn hovering_icons_activates_exactly_one_key() {
    let mut engine = engine();
    let icon = center_of(&engine, is_icon);
    assert!(engine.dispatch_pointer_event(PointerEvent::moved(icon.x, icon.y)));

    let expected = TooltipIconKey::new(PaneId::Candle, "MA", "settings");
    assert_eq!(engine.store().active_tooltip_icon(), Some(&expected));
    assert_eq!(engine.store().active_tooltip_title(), None);
    let active_overlay = engine
        .pane(PaneId::Candle)
        .expect("candle")
        .main_widget()
        .overlay_picture()
        .clone();

    assert!(engine.dispatch_pointer_event(PointerEvent::moved(icon.x, icon.y)));
    assert_eq!(engine.store().active_tooltip_icon(), Some(&expected));
    let again = engine.pane(PaneId::Candle).expect("candle").main_widget().overlay_picture();
    assert_eq!(again, &active_overlay);

    let title = center_of(&engine, is_title);
    assert!(engine.dispatch_pointer_event(PointerEvent::moved(title.x, title.y)));
    assert_eq!(engine.store().active_tooltip_icon(), None);
    assert_eq!(
        engine.store().active_tooltip_title(),
        Some(&TooltipTitleKey::new(PaneId::Candle, "MA"))
    );

    assert!(!engine.dispatch_pointer_event(PointerEvent::moved(400.0, 300.0)));
    assert_eq!(engine.store().active_tooltip_icon(), None);
    assert_eq!(engine.store().active_tooltip_title(), None);
}

#[test]
fn clicking_an_icon_executes_its_action() {
    let mut engine = engine();
    let icon = center_of(&engine, is_icon);
    assert!(engine.dispatch_pointer_event(PointerEvent::clicked(icon.x, icon.y)));
    let actions = engine.store().executed_actions();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].action, ActionType::OnTooltipIconClick);
    assert_eq!(actions[0].icon.icon_id, "settings");
}

#[test]
fn image_applies_pixel_ratio_once() {
    let mut engine = engine();
    engine.set_pixel_ratio(2.0).expect("valid ratio");
    let image = engine.image(true);
    assert_eq!(image.pixel_ratio, 2.0);
    assert_eq!(image.width, 800.0);
    assert_eq!(image.height, 500.0);

    let scales: Vec<&DrawCommand> = image
        .commands()
        .iter()
        .filter(|command| matches!(command, DrawCommand::Scale { .. }))
        .collect();
    assert_eq!(scales, vec![&DrawCommand::Scale { sx: 2.0, sy: 2.0 }]);
    assert!(image.texts().count() > 0);
}

#[test]
fn image_without_overlay_drops_crosshair_and_tooltips() {
    let engine = engine();
    let with_overlay = engine.image(true);
    let without_overlay = engine.image(false);
    assert!(without_overlay.commands().len() < with_overlay.commands().len());
    assert!(!without_overlay.texts().any(|text| text.starts_with("MA")));
    assert!(with_overlay.texts().any(|text| text.starts_with("MA")));
}

#[test]
fn render_replays_at_the_host_ratio() {
    let engine = engine();
    let mut host = RecordingSurface::new(800.0, 500.0, 3.0);
    engine.render(&mut host);
    let picture = host.finish();
    let scales = picture
        .commands()
        .iter()
        .filter(|command| matches!(command, DrawCommand::Scale { .. }))
        .count();
    assert_eq!(scales, 1);
    assert_eq!(picture.commands().first(), Some(&DrawCommand::Save));
}

#[test]
fn drawing_is_idempotent() {
    let mut engine = engine();
    let first = engine.image(true);
    engine.update(UpdateLevel::Drawer);
    let second = engine.image(true);
    assert_eq!(first, second);
}

#[test]
fn moving_off_chart_restores_the_idle_crosshair() {
    let mut engine = engine();
    engine.dispatch_pointer_event(PointerEvent::moved(100.0, 100.0));
    assert!(engine.store().crosshair().is_anchored());
    engine.dispatch_pointer_event(PointerEvent::moved(-10.0, -10.0));
    let crosshair = engine.store().crosshair();
    assert!(!crosshair.is_anchored());
    assert_eq!(crosshair.data_index, Some(39));
}

#[test]
fn last_price_line_keeps_compare_rule_on_percentage_axis() {
    let data = vec![
        KLineData::new(1_700_000_000_000, 5.0, 5.5, 4.5, 5.0).expect("bar"),
        KLineData::new(1_700_000_060_000, 10.0, 10.5, 7.5, 8.0).expect("bar"),
    ];
    let mut engine =
        ChartEngine::new(MemoryStore::new(data), ChartEngineConfig::new(800.0, 500.0)).expect("engine");
    engine
        .set_pane_options(
            PaneId::Candle,
            &PaneOptionsUpdate {
                axis: Some(AxisOptions {
                    name: AxisName::Percentage,
                    ..AxisOptions::default()
                }),
                ..PaneOptionsUpdate::default()
            },
        )
        .expect("candle");

    let last = engine.store().styles().candle.price_mark.last.clone();
    let candle = engine.pane(PaneId::Candle).expect("candle");
    let line_colors: Vec<_> = candle
        .main_widget()
        .main_picture()
        .commands()
        .iter()
        .filter_map(|command| match command {
            DrawCommand::StrokeLine { stroke, .. } if !stroke.dash.is_empty() => Some(stroke.color),
            _ => None,
        })
        .collect();
    assert_eq!(line_colors, vec![last.down_color]);

    let badge_is_up = candle
        .y_axis_widget()
        .expect("y axis")
        .main_picture()
        .commands()
        .iter()
        .any(|command| matches!(command, DrawCommand::FillRect { color, .. } if *color == last.up_color));
    assert!(badge_is_up);
}
