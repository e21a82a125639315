use super::*;

const SCENE: &str = r##"{
    "id": "scene_1",
    "version": 2,
    "metadata": {"question_text": "Who goes first?", "difficulty": 3},
    "blocks": [
        {
            "id": "b1",
            "type": "road_scene",
            "layout": {"x": 0, "y": 0, "w": 60, "h": 100},
            "content": {
                "background": "asphalt",
                "objects": [
                    {"id": "car", "component_id": "vehicle_sedan",
                     "transform": {"x": 20, "y": 50, "rotation": 90, "z_index": 2},
                     "props": {"color": "#ef4444"}}
                ]
            }
        },
        {"id": "b2", "type": "gauge", "title": "Speed", "content": {"value": 50, "max": 130, "unit": "km/h"}},
        {"id": "b3", "type": "icon_grid", "content": {"icons": ["a", "b"]}},
        {"id": "b4", "type": "hologram", "content": {"beam": 1}}
    ]
}"##;

#[test]
fn blocks_dispatch_on_type_tag() {
    let scene: SceneJson = serde_json::from_str(SCENE).unwrap();
    assert_eq!(scene.question_text(), Some("Who goes first?"));
    let tags: Vec<&str> = scene.blocks.iter().map(SceneBlock::type_tag).collect();
    assert_eq!(tags, ["road_scene", "gauge", "icon_grid", "hologram"]);

    match &scene.blocks[0].content {
        BlockContent::RoadScene(road) => {
            assert_eq!(road.objects[0].transform.z(), 2);
            assert_eq!(road.objects[0].transform.scale, None);
        }
        other => panic!("unexpected content {other:?}"),
    }
    assert!(matches!(
        &scene.blocks[1].content,
        BlockContent::Gauge(GaugeContent { value, min: None, .. }) if *value == 50.0
    ));
    assert_eq!(scene.blocks[3].content.kind(), None);
}

#[test]
fn round_trip_preserves_every_block() {
    let scene: SceneJson = serde_json::from_str(SCENE).unwrap();
    let text = serde_json::to_string(&scene).unwrap();
    let again: SceneJson = serde_json::from_str(&text).unwrap();
    assert_eq!(scene, again);

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["blocks"][3]["type"], "hologram");
    assert_eq!(value["blocks"][3]["content"]["beam"], 1);
    assert!(value["blocks"][0].get("title").is_none());
}

#[test]
fn road_objects_walks_only_road_scene_blocks() {
    let scene: SceneJson = serde_json::from_str(SCENE).unwrap();
    let ids: Vec<(&str, &str)> = scene
        .road_objects()
        .map(|(block, object)| (block.id.as_str(), object.component_id.as_str()))
        .collect();
    assert_eq!(ids, [("b1", "vehicle_sedan")]);
}

#[test]
fn malformed_known_content_is_kept_as_invalid_block() {
    let text = r#"{"id":"s","version":1,"blocks":[
        {"id":"r","type":"road_scene","content":{"objects":[]}},
        {"id":"g","type":"gauge","content":{"value":50}}
    ]}"#;
    let scene: SceneJson = serde_json::from_str(text).unwrap();
    assert!(matches!(scene.blocks[0].content, BlockContent::RoadScene(_)));
    match &scene.blocks[1].content {
        BlockContent::Invalid { kind, content, error } => {
            assert_eq!(*kind, BlockKind::Gauge);
            assert_eq!(content["value"], 50);
            assert!(error.contains("max"), "{error}");
        }
        other => panic!("unexpected content {other:?}"),
    }
    assert_eq!(scene.blocks[1].type_tag(), "gauge");

    let again: SceneJson = serde_json::from_str(&serde_json::to_string(&scene).unwrap()).unwrap();
    assert_eq!(again, scene);
}
