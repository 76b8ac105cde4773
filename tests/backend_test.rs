//! On-disk backends: SQLite and JSON file.

mod common;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use scenetune::{
    db::{Database, SqliteBackend},
    models::{
        CaptureSnapshot, ContextVector, FilterOrigin, FilterParams, ManualAdjustments,
        PreferenceRecord, RecommendedSettings,
    },
    persistence::{JsonFileBackend, PreferenceBackend},
    settings::BackendKind,
    EngineSettings, TuningEngine,
};

fn record(id: &str, label: &str, usage_count: u32, is_liked: bool) -> PreferenceRecord {
    PreferenceRecord {
        id: id.into(),
        context: ContextVector {
            object_type: Some(label.into()),
            brightness: 140.0,
            color_temp: 12.5,
            saturation_pct: 48.0,
            is_warm_tone: true,
            is_cool_tone: false,
            is_backlit: false,
            is_low_light: false,
        },
        settings: RecommendedSettings {
            tips: vec!["Shoot from directly above".into()],
            ..RecommendedSettings::default()
        },
        filters: FilterParams::new(110.0, 105.0, 130.0, 18.5),
        mode: "warm".into(),
        manual_adjustments: ManualAdjustments::new(5.0, 0.0, -10.0, 12.0),
        usage_count,
        is_liked,
        last_used: Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
    }
}

fn snapshot(id: &str, session_id: &str, variant: Option<&str>) -> CaptureSnapshot {
    CaptureSnapshot {
        id: id.into(),
        session_id: session_id.into(),
        record_id: None,
        variant: variant.map(str::to_string),
        mode: "vivid".into(),
        origin: FilterOrigin::RegionAnalyzed,
        filters: FilterParams::new(120.0, 110.0, 150.0, -20.0),
        manual_adjustments: ManualAdjustments::default(),
        liked: false,
        taken_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 31, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_sqlite_round_trips_records_per_user() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("prefs.sqlite3")).unwrap();
    let ana = SqliteBackend::new(db.clone(), "ana");
    let ben = SqliteBackend::new(db.clone(), "ben");

    assert!(ana.load().await.unwrap().is_empty());

    let records = vec![record("r1", "pizza", 4, true), record("r2", "cup", 1, false)];
    ana.save(records.clone()).await.unwrap();
    ben.save(vec![record("r3", "bowl", 2, false)]).await.unwrap();

    assert_eq!(ana.load().await.unwrap(), records);
    assert_eq!(ben.load().await.unwrap().len(), 1);

    ana.save(vec![record("r1", "pizza", 5, true)]).await.unwrap();
    let reloaded = ana.load().await.unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].usage_count, 5);
    assert_eq!(db.count_preferences("ben").await.unwrap(), 1);
}

#[tokio::test]
async fn test_sqlite_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.sqlite3");

    {
        let db = Database::new(path.clone()).unwrap();
        let backend = SqliteBackend::new(db, "ana");
        backend.save(vec![record("r1", "cake", 3, true)]).await.unwrap();
        backend
            .save_capture(snapshot("c1", "s1", Some("vibrant")))
            .await
            .unwrap();
    }

    let db = Database::new(path).unwrap();
    let backend = SqliteBackend::new(db.clone(), "ana");
    assert_eq!(backend.load().await.unwrap(), vec![record("r1", "cake", 3, true)]);

    let captures = db.captures_for_session("s1").await.unwrap();
    assert_eq!(captures, vec![snapshot("c1", "s1", Some("vibrant"))]);
    assert!(db.captures_for_session("s2").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_json_backend_round_trips_and_scopes_user() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs").join("store.json");

    let backend = JsonFileBackend::new(path.clone(), "ana");
    assert!(backend.load().await.unwrap().is_empty());

    let records = vec![record("r1", "banana", 2, false)];
    backend.save(records.clone()).await.unwrap();
    assert_eq!(backend.load().await.unwrap(), records);

    let other = JsonFileBackend::new(path, "ben");
    assert!(other.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_json_backend_rejects_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "[not, json").unwrap();

    let backend = JsonFileBackend::new(path, "ana");
    assert!(backend.load().await.is_err());
}

#[tokio::test]
async fn test_engine_cold_start_tolerates_corrupt_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ broken").unwrap();

    let settings = EngineSettings {
        backend: BackendKind::Json,
        ..common::fast_settings()
    };
    let backend: Arc<dyn PreferenceBackend> = Arc::new(JsonFileBackend::new(path, "ana"));
    let engine = TuningEngine::load(settings, backend).await;
    assert!(engine.store().lock().await.is_empty());
}

#[tokio::test]
async fn test_learned_preferences_survive_engine_restart() {
    let dir = tempfile::tempdir().unwrap();
    let settings = EngineSettings {
        user_id: "ana".into(),
        backend: BackendKind::Sqlite,
        ..common::fast_settings()
    };

    {
        let backend = scenetune::settings::build_backend(&settings, dir.path()).unwrap();
        let engine = TuningEngine::load(settings.clone(), backend).await;
        let controller = engine.open_session();
        let feed = controller.feed();
        feed.set_detection(Some(common::detection("donut")));
        feed.push_frame(common::solid_frame([190, 140, 90]));
        controller.capture(true).await.unwrap();
        engine.flush().await.unwrap();
    }

    let backend = scenetune::settings::build_backend(&settings, dir.path()).unwrap();
    let engine = TuningEngine::load(settings, backend).await;
    let store = engine.store();
    let store = store.lock().await;
    assert_eq!(store.len(), 1);
    assert!(store.records()[0].is_liked);
    assert_eq!(store.records()[0].usage_count, 3);
    assert_eq!(store.records()[0].context.object_type.as_deref(), Some("donut"));
}

#[tokio::test]
async fn test_zero_usage_record_is_dropped_before_capture() {
    let frame = common::solid_frame([210, 160, 90]);
    let detection = common::detection("cake");
    let analysis = scenetune::session::analyze(&frame, Some(&detection)).unwrap();

    let mut stale = record("stale", "cake", 0, false);
    stale.context = analysis.context.clone();
    let mut broken = record("broken", "tart", 2, false);
    broken.context.saturation_pct = 250.0;
    let healthy = record("healthy", "bread", 4, true);

    let backend: Arc<dyn PreferenceBackend> = Arc::new(
        scenetune::persistence::MemoryBackend::with_records(vec![stale, broken, healthy]),
    );
    let engine = TuningEngine::load(common::fast_settings(), backend).await;
    {
        let store = engine.store();
        let store = store.lock().await;
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].id, "healthy");
    }

    let controller = engine.open_session();
    let feed = controller.feed();
    feed.set_detection(Some(detection));
    feed.push_frame(frame);
    let capture = controller.capture(false).await.unwrap();

    let outcome = capture.outcome.unwrap();
    assert!(!outcome.merged);
    assert_eq!(outcome.usage_count, 1);
    assert_ne!(outcome.record_id, "stale");
    assert_eq!(engine.store().lock().await.len(), 2);
}
