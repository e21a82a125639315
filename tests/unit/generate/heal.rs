use std::collections::HashMap;
use std::sync::Mutex;

use super::*;
use crate::catalog::store::{ComponentStore, DirectoryStore};
use crate::foundation::error::{QuizSceneError, QuizSceneResult};
use crate::generate::service::SceneRequest;

#[derive(Default)]
struct ScriptedService {
    replies: HashMap<String, Result<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedService {
    fn reply(mut self, id: &str, text: String) -> Self {
        self.replies.insert(id.to_owned(), Ok(text));
        self
    }

    fn refuse(mut self, id: &str, message: &str) -> Self {
        self.replies.insert(id.to_owned(), Err(message.to_owned()));
        self
    }
}

impl GenerationService for ScriptedService {
    fn generate_scene(&self, _request: &SceneRequest) -> anyhow::Result<String> {
        anyhow::bail!("scene generation is not scripted")
    }

    fn generate_component(&self, request: &ComponentRequest) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(request.component_id.clone());
        match self.replies.get(&request.component_id) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(anyhow::anyhow!("{message}")),
            None => Ok("I cannot draw that.".to_owned()),
        }
    }
}

fn descriptor_reply(id: &str, svg: &str) -> String {
    let json = serde_json::json!({
        "id": id, "version": "1.0.0", "type": "primitive", "category": "vehicle",
        "name": "Generated", "description": "generated component",
        "propsSchema": {"type": "object"}, "defaultProps": {"color": "#111"},
        "render": {"svg": svg}
    });
    format!("Here you go:\n```json\n{json}\n```")
}

struct ReadOnlyStore;

impl ComponentStore for ReadOnlyStore {
    fn store(&self, descriptor: &ComponentDescriptor) -> QuizSceneResult<()> {
        Err(QuizSceneError::catalog(format!(
            "cannot write '{}': read-only",
            descriptor.id
        )))
    }
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("quizscene_heal_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn heals_distinct_missing_ids_and_skips_known_ones() {
    let service = ScriptedService::default()
        .reply("vehicle_truck", descriptor_reply("vehicle_truck", "<rect fill='{color}'/>"));
    let mut registry = CatalogRegistry::with_builtin().unwrap();
    let mut queue = GenerationQueue::new();
    let missing = vec![
        "vehicle_truck".to_owned(),
        "vehicle_sedan".to_owned(),
        "vehicle_truck".to_owned(),
    ];

    let report = AutoHealer::default()
        .heal(&missing, &mut registry, &mut queue, &service, None)
        .unwrap();

    assert_eq!(report.completed, ["vehicle_truck"]);
    assert!(report.is_complete());
    assert_eq!(*service.calls.lock().unwrap(), ["vehicle_truck"]);
    assert!(registry.get("vehicle_truck").is_some());

    let job = queue.get(report.jobs[0]).unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(job.component.as_ref().unwrap().id, "vehicle_truck");
}

#[test]
fn failures_are_recorded_per_job_without_touching_the_registry() {
    let service = ScriptedService::default()
        .refuse("sign_danger", "quota exceeded")
        .reply("vehicle_bus", descriptor_reply("vehicle_bus", "<g><rect></g>"))
        .reply("vehicle_van", descriptor_reply("vehicle_van", "<rect/>"));
    let mut registry = CatalogRegistry::new();
    let mut queue = GenerationQueue::new();
    let missing = ["sign_danger", "ghost_car", "vehicle_bus", "vehicle_van"].map(String::from);

    let report = AutoHealer::default()
        .heal(&missing, &mut registry, &mut queue, &service, None)
        .unwrap();

    assert_eq!(report.completed, ["vehicle_van"]);
    let failed: Vec<&str> = report.failed.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(failed, ["sign_danger", "ghost_car", "vehicle_bus"]);
    assert!(report.failed[0].1.contains("quota exceeded"));
    assert!(report.failed[1].1.contains("no valid JSON found in response"));
    assert!(report.failed[2].1.contains("svg template does not parse"));

    assert_eq!(registry.len(), 1);
    for job in queue.all_jobs() {
        match job.component_id.as_str() {
            "vehicle_van" => assert_eq!(job.status, JobStatus::Completed),
            _ => {
                assert_eq!(job.status, JobStatus::Failed);
                assert_eq!(job.progress, 0);
                assert!(job.error.is_some());
            }
        }
    }
}

#[test]
fn store_failure_fails_the_job_before_the_registry_changes() {
    let service = ScriptedService::default()
        .reply("vehicle_truck", descriptor_reply("vehicle_truck", "<rect fill='{color}'/>"));
    let mut registry = CatalogRegistry::with_builtin().unwrap();
    let before = registry.len();
    let events = std::sync::Arc::new(Mutex::new(0usize));
    let sink = std::sync::Arc::clone(&events);
    registry.subscribe(move |_, _| *sink.lock().unwrap() += 1);
    let mut queue = GenerationQueue::new();

    let report = AutoHealer::default()
        .heal(
            &["vehicle_truck".to_owned()],
            &mut registry,
            &mut queue,
            &service,
            Some(&ReadOnlyStore),
        )
        .unwrap();

    assert!(report.completed.is_empty());
    assert_eq!(report.failed[0].0, "vehicle_truck");
    assert!(report.failed[0].1.contains("read-only"));
    assert_eq!(registry.len(), before);
    assert!(registry.get("vehicle_truck").is_none());
    assert_eq!(*events.lock().unwrap(), 0);

    let job = queue.get(report.jobs[0]).unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.progress, 0);
}

#[test]
fn generated_id_is_normalized_to_the_requested_one() {
    let descriptor = accept_component(&descriptor_reply("truck_v2", "<rect/>"), "vehicle_truck")
        .unwrap();
    assert_eq!(descriptor.id, "vehicle_truck");
}

#[test]
fn parallel_runs_keep_request_order_and_persist() {
    let ids = ["vehicle_a", "vehicle_b", "vehicle_c", "vehicle_d"];
    let service = ids.iter().fold(ScriptedService::default(), |s, id| {
        s.reply(id, descriptor_reply(id, "<circle r='1'/>"))
    });
    let dir = temp_dir("parallel");
    let store = DirectoryStore::new(&dir);
    let mut registry = CatalogRegistry::new();
    let mut queue = GenerationQueue::new();
    let healer = AutoHealer::new(HealOptions {
        parallel: true,
        threads: Some(2),
        persist: true,
    });

    let missing = ids.map(String::from);
    let report = healer
        .heal(&missing, &mut registry, &mut queue, &service, Some(&store))
        .unwrap();

    assert_eq!(report.completed, ids);
    let registered: Vec<&str> = registry.list().map(|d| d.id.as_str()).collect();
    assert_eq!(registered, ids);
    for id in ids {
        assert!(dir.join(format!("{id}.json")).is_file());
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn persistence_can_be_disabled_and_zero_threads_is_rejected() {
    let service = ScriptedService::default()
        .reply("vehicle_a", descriptor_reply("vehicle_a", "<rect/>"))
        .reply("vehicle_b", descriptor_reply("vehicle_b", "<rect/>"));
    let dir = temp_dir("no_persist");
    let store = DirectoryStore::new(&dir);
    let mut registry = CatalogRegistry::new();
    let mut queue = GenerationQueue::new();
    let missing = ["vehicle_a".to_owned()];

    let healer = AutoHealer::new(HealOptions {
        persist: false,
        ..HealOptions::default()
    });
    healer
        .heal(&missing, &mut registry, &mut queue, &service, Some(&store))
        .unwrap();
    assert!(registry.get("vehicle_a").is_some());
    assert!(!dir.exists());

    let bad = AutoHealer::new(HealOptions {
        parallel: true,
        threads: Some(0),
        persist: false,
    });
    let missing = ["vehicle_b".to_owned(), "vehicle_c".to_owned()];
    let err = bad
        .heal(&missing, &mut registry, &mut queue, &service, None)
        .unwrap_err();
    assert!(err.to_string().contains("'threads' must be >= 1"));
}

#[test]
fn context_is_forwarded_to_requests() {
    struct Echo;
    impl GenerationService for Echo {
        fn generate_scene(&self, _request: &SceneRequest) -> anyhow::Result<String> {
            unreachable!()
        }
        fn generate_component(&self, request: &ComponentRequest) -> anyhow::Result<String> {
            anyhow::ensure!(request.context.as_deref() == Some("scene 'crossing'"));
            Ok(descriptor_reply(&request.component_id, "<rect/>"))
        }
    }
    let mut registry = CatalogRegistry::new();
    let mut queue = GenerationQueue::new();
    let report = AutoHealer::default()
        .with_context("scene 'crossing'")
        .heal(&["icon_x".to_owned()], &mut registry, &mut queue, &Echo, None)
        .unwrap();
    assert_eq!(report.completed, ["icon_x"]);
}
