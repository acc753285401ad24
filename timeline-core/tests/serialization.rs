//! Round-trip, instancing, clone/equality and downgrade scenarios for the
//! versioned JSON serialization engine (spec.md §8).

use std::collections::BTreeMap;

use timeline_core::object::{
    append_child, AnyObject, Clip, Composable, ExternalReference, Gap, ItemBase, MediaReference,
    MissingReference, Retainer, SerializableObjectBase, Stack, Track, TrackKind,
};
use timeline_core::registry::TypeRegistry;
use timeline_core::serialization::{
    deserialize_json_from_string, serialize_json_to_string,
};
use timeline_core::value::AnyValue;
use timeline_core::{equality, RationalTime, TimeRange};

fn new_stack(name: &str) -> Retainer<Composable> {
    Retainer::new(Composable::Stack(Stack::new(name)))
}

fn new_track(name: &str, kind: TrackKind) -> Retainer<Composable> {
    Retainer::new(Composable::Track(Track::new(name, kind)))
}

fn new_gap(name: &str, duration: RationalTime) -> Retainer<Composable> {
    let mut item = ItemBase::new(name);
    item.source_range = Some(TimeRange::new(RationalTime::new(0.0, 24.0), duration));
    Retainer::new(Composable::Gap(Gap { item }))
}

fn new_clip(name: &str, target_url: &str, duration: RationalTime) -> Retainer<Composable> {
    let mut item = ItemBase::new(name);
    item.source_range = Some(TimeRange::new(RationalTime::new(0.0, 24.0), duration));
    let media_reference = Retainer::new(MediaReference::External(ExternalReference {
        base: SerializableObjectBase::default(),
        name: "media".to_string(),
        target_url: target_url.to_string(),
        available_range: None,
    }));
    Retainer::new(Composable::Clip(Clip {
        item,
        media_reference: Some(media_reference),
        active_media_reference_key: None,
    }))
}

fn sample_timeline() -> Retainer<Composable> {
    let stack = new_stack("my timeline");
    let video = new_track("V1", TrackKind::Video);
    let clip = new_clip("shot_010", "file:///shots/shot_010.mov", RationalTime::new(48.0, 24.0));
    let gap = new_gap("head gap", RationalTime::new(12.0, 24.0));
    append_child(&video, gap).unwrap();
    append_child(&video, clip).unwrap();
    append_child(&stack, video).unwrap();
    stack
}

#[test]
fn round_trips_a_timeline_through_json() {
    let stack = sample_timeline();
    let text = serialize_json_to_string(&AnyValue::Retained(AnyObject::Composable(stack.clone())), None, true).unwrap();

    assert!(text.contains("\"OTIO_SCHEMA\": \"Stack.1\""));
    assert!(text.contains("shot_010"));

    let decoded = deserialize_json_from_string(&text).unwrap();
    assert!(equality::is_equivalent_to(&AnyObject::Composable(stack), &decoded).unwrap());
}

#[test]
fn two_clips_sharing_one_media_reference_round_trip_as_a_single_instance() {
    // A Composable can only have one parent, but a MediaReference can be
    // pointed at by more than one Clip — this is the case the Writer's
    // instancing path actually has to handle.
    let media_reference = Retainer::new(MediaReference::External(ExternalReference {
        base: SerializableObjectBase::default(),
        name: "shared media".to_string(),
        target_url: "file:///a.mov".to_string(),
        available_range: None,
    }));

    let mut item_a = ItemBase::new("clip a");
    item_a.source_range = Some(TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(24.0, 24.0)));
    let clip_a = Retainer::new(Composable::Clip(Clip {
        item: item_a,
        media_reference: Some(media_reference.clone()),
        active_media_reference_key: None,
    }));

    let mut item_b = ItemBase::new("clip b");
    item_b.source_range = Some(TimeRange::new(RationalTime::new(24.0, 24.0), RationalTime::new(24.0, 24.0)));
    let clip_b = Retainer::new(Composable::Clip(Clip {
        item: item_b,
        media_reference: Some(media_reference),
        active_media_reference_key: None,
    }));

    let v1 = new_track("V1", TrackKind::Video);
    append_child(&v1, clip_a).unwrap();
    append_child(&v1, clip_b).unwrap();
    let stack = new_stack("shared");
    append_child(&stack, v1).unwrap();

    let text = serialize_json_to_string(&AnyValue::Retained(AnyObject::Composable(stack)), None, true).unwrap();
    assert_eq!(text.matches("ExternalReference.1").count(), 1);
    assert!(text.contains("SerializableObjectRef.1"));

    let decoded = deserialize_json_from_string(&text).unwrap();
    let AnyObject::Composable(root) = &decoded else { panic!("expected a composition") };
    let track = timeline_core::object::child_at(root, 0).unwrap();
    let decoded_a = timeline_core::object::child_at(&track, 0).unwrap();
    let decoded_b = timeline_core::object::child_at(&track, 1).unwrap();
    let Composable::Clip(a) = &*decoded_a.borrow() else { panic!("expected a clip") };
    let Composable::Clip(b) = &*decoded_b.borrow() else { panic!("expected a clip") };
    assert!(a.media_reference.as_ref().unwrap().ptr_eq(b.media_reference.as_ref().unwrap()));
}

#[test]
fn cycle_detection_rejects_a_composable_inserted_into_its_own_descendant() {
    use timeline_core::object::insert_child;
    use timeline_core::Error;

    let outer = new_stack("outer");
    let inner = new_track("inner", TrackKind::Video);
    append_child(&outer, inner.clone()).unwrap();

    let err = insert_child(&inner, 0, outer).unwrap_err();
    assert!(matches!(err, Error::ObjectCycle(_)));
}

#[test]
fn disabling_instancing_re_serializes_each_occurrence_in_full() {
    // Without instancing support, a shared (non-cyclic) sub-object is
    // written out in full every time it's reached, rather than becoming a
    // SerializableObjectRef after its first occurrence — its pending-map
    // entry is erased once that first occurrence's subtree finishes.
    let media_reference = Retainer::new(MediaReference::External(ExternalReference {
        base: SerializableObjectBase::default(),
        name: "shared media".to_string(),
        target_url: "file:///a.mov".to_string(),
        available_range: None,
    }));

    let mut item_a = ItemBase::new("clip a");
    item_a.source_range = Some(TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(24.0, 24.0)));
    let clip_a = Retainer::new(Composable::Clip(Clip {
        item: item_a,
        media_reference: Some(media_reference.clone()),
        active_media_reference_key: None,
    }));

    let mut item_b = ItemBase::new("clip b");
    item_b.source_range = Some(TimeRange::new(RationalTime::new(24.0, 24.0), RationalTime::new(24.0, 24.0)));
    let clip_b = Retainer::new(Composable::Clip(Clip {
        item: item_b,
        media_reference: Some(media_reference),
        active_media_reference_key: None,
    }));

    let v1 = new_track("V1", TrackKind::Video);
    append_child(&v1, clip_a).unwrap();
    append_child(&v1, clip_b).unwrap();
    let stack = new_stack("not-instanced");
    append_child(&stack, v1).unwrap();

    let text = serialize_json_to_string(&AnyValue::Retained(AnyObject::Composable(stack)), None, false).unwrap();
    assert_eq!(text.matches("ExternalReference.1").count(), 2);
    assert!(!text.contains("SerializableObjectRef.1"));
}

#[test]
fn clone_produces_an_independent_but_equivalent_graph() {
    let stack = AnyObject::Composable(sample_timeline());
    let cloned = equality::clone(&stack).unwrap();

    assert_ne!(stack.identity(), cloned.identity());
    assert!(equality::is_equivalent_to(&stack, &cloned).unwrap());
}

#[test]
fn is_equivalent_to_compares_by_value_not_identity() {
    let a = AnyObject::Composable(new_gap("g", RationalTime::new(10.0, 24.0)));
    let b = AnyObject::Composable(new_gap("g", RationalTime::new(10.0, 24.0)));
    assert_ne!(a.identity(), b.identity());
    assert!(equality::is_equivalent_to(&a, &b).unwrap());

    let c = AnyObject::Composable(new_gap("different", RationalTime::new(10.0, 24.0)));
    assert!(!equality::is_equivalent_to(&a, &c).unwrap());
}

#[test]
fn unknown_schema_round_trips_losslessly() {
    let text = r#"
    {
        "OTIO_SCHEMA": "SomeFutureThing.3",
        "widget": "blue",
        "count": 7
    }
    "#;
    let decoded = deserialize_json_from_string(text).unwrap();
    assert!(matches!(decoded, AnyObject::UnknownSchema(_)));

    let re_emitted = serialize_json_to_string(&AnyValue::Retained(decoded), None, true).unwrap();
    assert!(re_emitted.contains("\"widget\": \"blue\""));
    assert!(re_emitted.contains("\"count\": 7"));
}

#[test]
fn downgrade_manifest_rewrites_a_schema_tag_on_write() {
    TypeRegistry::global()
        .add_downgrader("Gap", 1, |_dict| {
            // A no-op downgrader is enough to exercise the chain: the
            // content doesn't change between version 1 and an invented
            // version 0, only the tag does.
        });

    let gap = AnyObject::Composable(new_gap("g", RationalTime::new(5.0, 24.0)));
    let mut manifest = BTreeMap::new();
    manifest.insert("Gap".to_string(), 0);

    let text = serialize_json_to_string(&AnyValue::Retained(gap), Some(&manifest), true).unwrap();
    assert!(text.contains("\"OTIO_SCHEMA\": \"Gap.0\""));
}

#[test]
fn malformed_document_missing_schema_version_suffix_fails_cleanly() {
    let text = r#"{ "OTIO_SCHEMA": "NoVersionHere" }"#;
    let err = deserialize_json_from_string(text).unwrap_err();
    assert!(matches!(err, timeline_core::Error::MalformedSchema { .. }));
}

#[test]
fn missing_media_reference_round_trips_as_null() {
    let mut item = ItemBase::new("floating clip");
    item.source_range = Some(TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(10.0, 24.0)));
    let clip = AnyObject::Composable(Retainer::new(Composable::Clip(Clip {
        item,
        media_reference: Some(Retainer::new(MediaReference::Missing(MissingReference {
            base: SerializableObjectBase::default(),
            name: "offline".to_string(),
            available_range: None,
        }))),
        active_media_reference_key: None,
    })));

    let text = serialize_json_to_string(&AnyValue::Retained(clip), None, true).unwrap();
    assert!(text.contains("\"OTIO_SCHEMA\": \"MissingReference.1\""));
    let decoded = deserialize_json_from_string(&text).unwrap();
    assert!(equality::is_equivalent_to(
        &deserialize_json_from_string(&text).unwrap(),
        &decoded
    )
    .unwrap());
}
