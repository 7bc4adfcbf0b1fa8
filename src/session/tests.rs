use super::*;
use crate::config::Config;
use crate::draw::color::{GREEN, RED};
use crate::draw::{AffineTransform, BrushConfig, BrushShape, PixelBuffer};
use crate::error::PaintError;
use crate::input::{EngineSettings, EngineState, PointerEvent};
use crate::util::Rect;

fn loaded_session(seed: u64) -> PaintingSession {
    let mut session = PaintingSession::new(
        BrushConfig::new(BrushShape::Circle, 5, 150),
        EngineSettings::default(),
        Some(seed),
    );
    session
        .load_image(&PixelBuffer::filled(100, 100, RED), None)
        .unwrap();
    session
}

#[test]
fn load_image_binds_and_marks_whole_raster_dirty() {
    let mut session = loaded_session(1);
    assert!(session.is_ready());
    assert_eq!(session.engine().state(), EngineState::Ready);

    let regions = session.take_dirty_regions();
    assert_eq!(regions, vec![Rect::new(0, 0, 140, 140).unwrap()]);
    assert!(session.take_dirty_regions().is_empty());
}

#[test]
fn load_image_crops_to_visible_region() {
    let mut session = PaintingSession::default();
    session
        .load_image(
            &PixelBuffer::filled(100, 100, GREEN),
            Some(Rect::new(10, 10, 30, 20).unwrap()),
        )
        .unwrap();

    let source = session.engine().source().unwrap();
    assert_eq!((source.width(), source.height()), (30, 20));
    let raster = session.engine().raster().unwrap();
    assert_eq!((raster.width(), raster.height()), (70, 60));
}

#[test]
fn load_image_rejects_empty_crop() {
    let mut session = PaintingSession::default();
    let err = session
        .load_image(
            &PixelBuffer::filled(10, 10, RED),
            Some(Rect::new(50, 50, 5, 5).unwrap()),
        )
        .unwrap_err();
    assert!(matches!(err, PaintError::InvalidImage(_)));
    assert!(!session.is_ready());
}

#[test]
fn pointer_strokes_report_dab_damage() {
    let mut session = loaded_session(1);
    session.take_dirty_regions();

    assert!(!session.handle_pointer_event(&PointerEvent::down(10.0, 10.0, 0)));
    assert!(session.handle_pointer_event(&PointerEvent::moved(10.0, 10.0, 0)));

    let regions = session.take_dirty_regions();
    assert_eq!(regions.len(), 1);
    assert!(regions[0].contains(30, 30));

    assert!(!session.handle_pointer_event(&PointerEvent::up(10.0, 10.0, 5)));
    assert_eq!(session.engine().state(), EngineState::Ready);
}

#[test]
fn a_drag_reports_one_merged_damage_region() {
    let mut session = loaded_session(1);
    session.take_dirty_regions();

    session.handle_pointer_event(&PointerEvent::down(10.0, 10.0, 0));
    for (i, x) in [10.0, 12.0, 14.0, 16.0].into_iter().enumerate() {
        assert!(session.handle_pointer_event(&PointerEvent::moved(x, 10.0, 10 * i as i64)));
    }

    let regions = session.take_dirty_regions();
    assert_eq!(regions.len(), 1);
    assert!(regions[0].contains(30, 30));
    assert!(regions[0].contains(36, 30));
}

#[test]
fn view_size_limits_pointer_painting_to_visible_part() {
    let mut session = loaded_session(1);
    session.set_view_size(50, 50);
    assert_eq!(
        session.engine().visible_region(),
        Rect::new(0, 0, 50, 50)
    );

    session.handle_pointer_event(&PointerEvent::down(10.0, 10.0, 0));
    assert!(!session.handle_pointer_event(&PointerEvent::moved(60.0, 60.0, 100)));
    assert!(session.handle_pointer_event(&PointerEvent::moved(20.0, 20.0, 200)));
}

#[test]
fn zoomed_transform_shrinks_visible_region() {
    let mut session = loaded_session(1);
    session.set_view_size(100, 100);
    session
        .set_transform(AffineTransform::scale(2.0, 2.0))
        .unwrap();
    assert_eq!(
        session.engine().visible_region(),
        Rect::new(0, 0, 50, 50)
    );

    session
        .set_transform(AffineTransform::translation(-30.0, -30.0))
        .unwrap();
    assert_eq!(
        session.engine().visible_region(),
        Rect::new(30, 30, 70, 70)
    );
}

#[test]
fn singular_transform_is_reported_but_painting_continues() {
    let mut session = loaded_session(1);
    let err = session
        .set_transform(AffineTransform::scale(0.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, PaintError::NotInvertibleTransform { .. }));
    assert!(session.engine().is_transform_degraded());

    session.handle_pointer_event(&PointerEvent::down(10.0, 10.0, 0));
    assert!(session.handle_pointer_event(&PointerEvent::moved(12.0, 12.0, 10)));
}

#[test]
fn invalid_brush_keeps_current_one() {
    let mut session = loaded_session(1);
    let before = session.brush();
    assert!(
        session
            .set_brush(BrushConfig::new(BrushShape::Square, 0, 150))
            .is_err()
    );
    assert_eq!(session.brush(), before);

    session
        .set_brush(BrushConfig::new(BrushShape::CircleSplatter, 3, 90))
        .unwrap();
    assert_eq!(session.brush().shape, BrushShape::CircleSplatter);
}

#[test]
fn auto_paint_is_reproducible_with_a_seed() {
    let mut a = loaded_session(7);
    let mut b = loaded_session(7);
    assert_eq!(a.auto_paint(), 100);
    assert_eq!(b.auto_paint(), 100);
    assert_eq!(a.export_final(), b.export_final());

    let regions = a.take_dirty_regions();
    assert_eq!(regions, vec![Rect::new(0, 0, 140, 140).unwrap()]);
}

#[test]
fn clear_erases_painting() {
    let mut session = loaded_session(3);
    session.auto_paint();
    assert!(!session.export_final().unwrap().is_fully_transparent());

    session.clear();
    let exported = session.export_final().unwrap();
    assert_eq!((exported.width(), exported.height()), (100, 100));
    assert!(exported.is_fully_transparent());
}

#[test]
fn export_before_load_is_none() {
    let session = PaintingSession::default();
    assert!(session.export_final().is_none());
}

#[test]
fn from_config_applies_brush_and_engine_sections() {
    let config: Config = toml::from_str(
        r#"
        [brush]
        shape = "circle"
        min_radius = 8
        base_alpha = 120

        [engine]
        inset = 10
        seed = 99
        "#,
    )
    .unwrap();

    let mut session = PaintingSession::from_config(&config);
    assert_eq!(session.brush(), BrushConfig::new(BrushShape::Circle, 8, 120));
    assert_eq!(session.engine().settings().inset, 10);

    session
        .load_image(&PixelBuffer::filled(20, 20, RED), None)
        .unwrap();
    let raster = session.engine().raster().unwrap();
    assert_eq!((raster.width(), raster.height()), (40, 40));
}
