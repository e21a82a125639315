use super::*;
use crate::catalog::builtin::builtin_components;
use crate::catalog::registry::CatalogRegistry;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "quizscene_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn sedan() -> ComponentDescriptor {
    builtin_components()
        .unwrap()
        .into_iter()
        .find(|c| c.id == "vehicle_sedan")
        .unwrap()
}

#[test]
fn prepared_text_is_pretty_and_reloadable() {
    let text = prepare_for_save(&sedan()).unwrap();
    assert!(text.starts_with("{\n  \"id\": \"vehicle_sedan\""));
    assert!(text.ends_with("}\n"));
    let back: ComponentDescriptor = serde_json::from_str(&text).unwrap();
    assert_eq!(back, sedan());
}

#[test]
fn invalid_descriptors_are_not_prepared() {
    let mut d = sedan();
    d.id.clear();
    let err = prepare_for_save(&d).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"), "{err}");
}

#[test]
fn directory_store_round_trips_through_load_dir() {
    let dir = temp_dir("directory_store");
    let store = DirectoryStore::new(dir.join("components"));
    let mut truck = sedan();
    truck.id = "vehicle_truck".to_string();
    store.store(&truck).unwrap();
    store.store(&sedan()).unwrap();
    assert!(store.path_for("vehicle_truck").is_file());

    std::fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

    let mut registry = CatalogRegistry::new();
    let loaded = registry.load_dir(store.dir()).unwrap();
    assert_eq!(loaded, 2);
    let ids: Vec<&str> = registry.list().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["vehicle_sedan", "vehicle_truck"]);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn load_dir_rejects_invalid_files() {
    let dir = temp_dir("load_dir_invalid");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("broken.json"), r#"{"id": 3}"#).unwrap();

    let mut registry = CatalogRegistry::new();
    let err = registry.load_dir(&dir).unwrap_err();
    assert!(err.to_string().starts_with("catalog error:"), "{err}");
    assert!(registry.is_empty());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn path_like_ids_are_refused() {
    let store = DirectoryStore::new(temp_dir("path_like"));
    let mut d = sedan();
    d.id = "../escape".to_string();
    assert!(store.store(&d).is_err());
}
