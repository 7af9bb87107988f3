//! Unit tests for the measurement store.

use bevy::math::Vec2;

use super::MeasurementStore;
use crate::constants::MAX_UNDO_DEPTH;
use crate::measure::kind::PrimitiveKind;
use crate::measure::primitive::{PrimitiveId, Rgb};
use crate::measure::snapshot::Snapshot;

fn attached_store() -> MeasurementStore {
    let mut store = MeasurementStore::default();
    store.set_surface_attached(true);
    store
}

fn add_line(store: &mut MeasurementStore, end: Vec2) -> PrimitiveId {
    let id = store.create_primitive(PrimitiveKind::Line).unwrap();
    store.push_point(id, Vec2::ZERO);
    store.push_point(id, end);
    id
}

#[test]
fn test_create_requires_surface() {
    let mut store = MeasurementStore::default();
    assert!(store.create_primitive(PrimitiveKind::Point).is_none());
    assert!(store.is_empty());
    assert!(!store.can_undo());
}

#[test]
fn test_create_assigns_defaults() {
    let mut store = attached_store();
    store.set_default_color(Rgb(0x123456));
    let id = store.create_primitive(PrimitiveKind::Polygon).unwrap();
    let p = store.primitive(id).unwrap();
    assert_eq!(p.name(), "Polygon");
    assert_eq!(p.color(), Rgb(0x123456));
    assert!(p.points().is_empty());
    assert_eq!(store.undo_count(), 1);
}

#[test]
fn test_ids_are_unique() {
    let mut store = attached_store();
    let a = store.create_primitive(PrimitiveKind::Point).unwrap();
    let b = store.create_primitive(PrimitiveKind::Point).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_every_mutation_bumps_revision() {
    let mut store = attached_store();
    let r0 = store.revision();
    let id = store.create_primitive(PrimitiveKind::Point).unwrap();
    let r1 = store.revision();
    assert!(r1 > r0);
    store.push_point(id, Vec2::ONE);
    assert!(store.revision() > r1);
}

#[test]
fn test_undo_redo_roundtrip_preserves_snapshot() {
    let mut store = attached_store();
    let mut mutations = 0;
    for i in 0..5 {
        add_line(&mut store, Vec2::new(i as f32, 10.0));
        mutations += 1;
    }
    let first = store.primitives()[0].id();
    store.rename(first, "baseline");
    mutations += 1;
    store.delete_primitive(store.primitives()[2].id());
    mutations += 1;

    let final_state = store.serialize();

    for _ in 0..mutations {
        assert!(store.undo());
    }
    assert!(store.is_empty());
    assert!(!store.undo());

    for _ in 0..mutations {
        assert!(store.redo());
    }
    assert_eq!(store.serialize(), final_state);
}

#[test]
fn test_history_is_capped() {
    let mut store = attached_store();
    for _ in 0..(MAX_UNDO_DEPTH + 15) {
        store.create_primitive(PrimitiveKind::Point);
    }
    assert_eq!(store.undo_count(), MAX_UNDO_DEPTH);

    let mut undone = 0;
    while store.undo() {
        undone += 1;
    }
    assert_eq!(undone, MAX_UNDO_DEPTH);
    // the oldest states were evicted, so some primitives remain
    assert_eq!(store.len(), 15);
}

#[test]
fn test_new_mutation_clears_redo() {
    let mut store = attached_store();
    add_line(&mut store, Vec2::ONE);
    add_line(&mut store, Vec2::ONE);
    store.undo();
    assert!(store.can_redo());

    store.create_primitive(PrimitiveKind::Point);
    assert!(!store.can_redo());
}

#[test]
fn test_undo_preserves_ids() {
    let mut store = attached_store();
    let a = add_line(&mut store, Vec2::new(3.0, 4.0));
    let b = add_line(&mut store, Vec2::new(6.0, 8.0));
    store.delete_primitive(a);
    store.undo();

    let ids: Vec<_> = store.primitives().iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec![a, b]);
    assert_eq!(store.primitive(a).unwrap().label_text(), "5.00 px");
}

#[test]
fn test_ids_stay_unique_after_restore() {
    let mut store = attached_store();
    let a = add_line(&mut store, Vec2::ONE);
    let b = add_line(&mut store, Vec2::ONE);
    store.undo();
    store.undo();
    store.redo();
    store.redo();
    let c = store.create_primitive(PrimitiveKind::Point).unwrap();
    assert_ne!(c, a);
    assert_ne!(c, b);
}

#[test]
fn test_import_advances_id_counter() {
    let mut store = attached_store();
    store.import_json(r#"[{"id": 41, "kind": "point", "points": [{"x": 1, "y": 1}]}]"#);
    let next = store.create_primitive(PrimitiveKind::Point).unwrap();
    assert!(next.0 > 41);
}

#[test]
fn test_delete_is_undoable() {
    let mut store = attached_store();
    let id = add_line(&mut store, Vec2::ONE);
    store.select(Some(id));
    assert!(store.delete_primitive(id));
    assert!(store.selected().is_none());
    assert!(store.is_empty());

    store.undo();
    assert!(store.primitive(id).is_some());
}

#[test]
fn test_delete_unknown_is_noop() {
    let mut store = attached_store();
    let before = store.undo_count();
    assert!(!store.delete_primitive(PrimitiveId(999)));
    assert_eq!(store.undo_count(), before);
}

#[test]
fn test_clear_all() {
    let mut store = attached_store();
    let id = store.create_primitive(PrimitiveKind::Polyline).unwrap();
    store.begin_construction(id);
    add_line(&mut store, Vec2::ONE);

    store.clear_all();
    assert!(store.is_empty());
    assert!(store.active().is_none());

    store.undo();
    assert_eq!(store.len(), 2);
    // restored primitives are never in construction
    assert!(store.active().is_none());
}

#[test]
fn test_restore_null_like_snapshot_is_empty() {
    let mut store = attached_store();
    add_line(&mut store, Vec2::ONE);
    store.restore(Snapshot::from_json_lenient("null"));
    assert!(store.is_empty());
}

#[test]
fn test_restore_skips_duplicate_ids() {
    let mut store = attached_store();
    store.import_json(
        r#"[{"id": 1, "kind": "point", "points": [{"x": 1, "y": 1}]},
            {"id": 1, "kind": "line"}]"#,
    );
    assert_eq!(store.len(), 1);
    assert_eq!(store.primitives()[0].kind(), PrimitiveKind::Point);
}

#[test]
fn test_restore_fills_missing_name() {
    let mut store = attached_store();
    store.import_json(r#"[{"id": 2, "type": "ellipse"}]"#);
    assert_eq!(store.primitives()[0].name(), "Ellipse");
}

#[test]
fn test_rename_trims_and_reverts() {
    let mut store = attached_store();
    let id = add_line(&mut store, Vec2::ONE);

    assert!(store.rename(id, "  Crack width  "));
    assert_eq!(store.primitive(id).unwrap().name(), "Crack width");

    assert!(store.rename(id, "   "));
    assert_eq!(store.primitive(id).unwrap().name(), "Line");

    // unchanged name does not add history
    let count = store.undo_count();
    assert!(!store.rename(id, "Line"));
    assert_eq!(store.undo_count(), count);
}

#[test]
fn test_display_name_is_one_based() {
    let mut store = attached_store();
    add_line(&mut store, Vec2::ONE);
    let p = &store.primitives()[0];
    assert_eq!(MeasurementStore::display_name(0, p), "1. Line");
}

#[test]
fn test_default_color_recolours_selection() {
    let mut store = attached_store();
    let a = add_line(&mut store, Vec2::ONE);
    let b = add_line(&mut store, Vec2::ONE);
    store.select(Some(b));
    store.set_default_color(Rgb(0x00ff00));

    assert_eq!(store.primitive(b).unwrap().color(), Rgb(0x00ff00));
    assert_eq!(store.primitive(a).unwrap().color(), Rgb::default());
    assert_eq!(store.default_color(), Rgb(0x00ff00));
}

#[test]
fn test_visibility_not_in_snapshot() {
    let mut store = attached_store();
    let id = add_line(&mut store, Vec2::ONE);
    let count = store.undo_count();
    store.set_visible(id, false);
    assert!(!store.primitive(id).unwrap().is_visible());
    assert_eq!(store.undo_count(), count);

    // restoring rebuilds primitives as visible
    store.restore(store.serialize());
    assert!(store.primitive(id).unwrap().is_visible());
}

#[test]
fn test_export_excludes_active_primitive() {
    let mut store = attached_store();
    let done = add_line(&mut store, Vec2::ONE);
    let pending = store.create_primitive(PrimitiveKind::Polyline).unwrap();
    store.begin_construction(pending);
    store.push_point(pending, Vec2::ONE);

    assert_eq!(store.serialize().len(), 2);
    let exported = store.export();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported.primitives[0].id, done);

    store.commit_active();
    assert_eq!(store.export().len(), 2);
}

#[test]
fn test_export_strips_preview() {
    let mut store = attached_store();
    let id = store.create_primitive(PrimitiveKind::Polyline).unwrap();
    store.push_point(id, Vec2::ZERO);
    store.push_point(id, Vec2::ONE);
    store.set_preview(id, Some(Vec2::splat(50.0)));

    let json = store.export_json().unwrap();
    assert!(!json.contains("50"));
}

#[test]
fn test_discard_leaves_no_trace() {
    let mut store = attached_store();
    add_line(&mut store, Vec2::ONE);
    let before = store.serialize();
    let undo_before = store.undo_count();

    let id = store.create_primitive(PrimitiveKind::Polygon).unwrap();
    store.begin_construction(id);
    store.push_point(id, Vec2::ZERO);
    assert_eq!(store.discard_active(), Some(id));

    assert_eq!(store.serialize(), before);
    assert_eq!(store.undo_count(), undo_before);
    assert!(store.active().is_none());
}

#[test]
fn test_set_point_out_of_range() {
    let mut store = attached_store();
    let id = add_line(&mut store, Vec2::ONE);
    assert!(!store.set_point(id, 5, Vec2::ZERO));
    assert!(store.set_point(id, 1, Vec2::new(0.0, 7.0)));
    assert_eq!(store.primitive(id).unwrap().label_text(), "7.00 px");
}

#[test]
fn test_select_unknown_clears() {
    let mut store = attached_store();
    let id = add_line(&mut store, Vec2::ONE);
    store.select(Some(id));
    store.select(Some(PrimitiveId(12345)));
    assert!(store.selected().is_none());
}

#[test]
fn test_history_skips_shape_under_construction() {
    let mut store = attached_store();
    let done = add_line(&mut store, Vec2::ONE);
    let pending = store.create_primitive(PrimitiveKind::Polygon).unwrap();
    store.begin_construction(pending);
    store.push_point(pending, Vec2::ZERO);
    store.push_point(pending, Vec2::new(10.0, 0.0));

    // a list edit while the polygon is still open
    assert!(store.rename(done, "Edge"));
    assert!(store.undo());
    assert!(store.primitive(pending).is_none());
    assert!(store.active().is_none());

    assert!(store.redo());
    assert_eq!(store.primitive(done).unwrap().name(), "Edge");
    assert!(store.primitive(pending).is_none());
    assert_eq!(store.serialize(), store.export());
}

#[test]
fn test_max_id_import_does_not_overflow() {
    let mut store = attached_store();
    store.import_json(&format!(
        r#"[{{"id":{},"kind":"point","name":"Far","points":[{{"x":1,"y":1}}]}},
            {{"id":{},"kind":"point","name":"Near","points":[{{"x":2,"y":2}}]}}]"#,
        u64::MAX,
        u64::MAX - 1
    ));
    assert_eq!(store.len(), 1);
    assert_eq!(store.primitives()[0].id(), PrimitiveId(u64::MAX - 1));

    // the only id left would be u64::MAX, which is never handed out
    assert!(store.create_primitive(PrimitiveKind::Point).is_none());
    assert_eq!(store.len(), 1);
    assert!(store.primitives().iter().all(|p| p.id().0 != u64::MAX));
}
