use anyhow::Result;
use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use mapty_lib::{
    AppError, AppService, Config, Coords, DbError, FixedGeolocation, FormField, KeyValueStore,
    MemoryStore, SqliteStore, Workout, WorkoutError, WorkoutType,
};
use std::time::{Duration, Instant};

const LONDON: Coords = Coords::new(51.5, -0.1);

// Helper function to create a started test service with an in-memory store
fn create_test_service() -> Result<AppService> {
    let mut service = AppService::in_memory(Config::default());
    service.start(&FixedGeolocation::at(LONDON))?;
    Ok(service)
}

// Helper to build a service over a store we can inspect afterwards
fn create_service_with_store(store: Box<dyn KeyValueStore>) -> Result<AppService> {
    let mut service = AppService::with_store(
        Config::default(),
        "test_config.toml".into(),
        ":memory:".into(),
        store,
    );
    service.start(&FixedGeolocation::at(LONDON))?;
    Ok(service)
}

// Store whose writes always fail, as a full disk would
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, DbError> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), DbError> {
        Err(DbError::Io(std::io::Error::other("disk full")))
    }
}

fn local_noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("unambiguous local time")
        .with_timezone(&Utc)
}

fn fill_running(service: &mut AppService, distance: &str, duration: &str, cadence: &str) {
    let form = service.form_mut();
    form.set_type(WorkoutType::Running);
    form.set_input(FormField::Distance, distance);
    form.set_input(FormField::Duration, duration);
    form.set_input(FormField::Cadence, cadence);
}

fn fill_cycling(service: &mut AppService, distance: &str, duration: &str, elevation: &str) {
    let form = service.form_mut();
    form.set_type(WorkoutType::Cycling);
    form.set_input(FormField::Distance, distance);
    form.set_input(FormField::Duration, duration);
    form.set_input(FormField::Elevation, elevation);
}

#[test]
fn test_running_workout_scenario() -> Result<()> {
    let mut service = create_test_service()?;
    let now = Utc::now();

    service.click_map(LONDON)?;
    assert!(service.form().is_visible());
    fill_running(&mut service, "5", "25", "180");

    let workout = service.submit_workout(now)?.clone();
    assert_eq!(workout.workout_type(), WorkoutType::Running);
    assert_eq!(workout.pace(), Some(5.0));
    assert_eq!(workout.coords(), LONDON);

    let local = now.with_timezone(&Local);
    assert!(workout.description().starts_with("Running on "));
    assert!(workout
        .description()
        .ends_with(&format!(" {}", local.day())));

    assert_eq!(service.workouts().len(), 1);
    assert!(!service.form().is_visible());
    assert_eq!(service.pending_click(), None);

    let map = service.map().expect("map initialised");
    assert_eq!(map.markers().len(), 1);
    assert_eq!(map.markers()[0].workout_id, workout.id());
    assert!(map.markers()[0].popup.open);
    assert_eq!(map.markers()[0].popup.class_name, "running-popup");
    Ok(())
}

#[test]
fn test_cycling_workout_scenario() -> Result<()> {
    let mut service = create_test_service()?;
    service.click_map(LONDON)?;
    fill_cycling(&mut service, "20", "60", "150");

    let workout = service.submit_workout(Utc::now())?;
    assert_eq!(workout.speed(), Some(20.0));
    assert_eq!(workout.type_metric(), (150.0, "m"));
    assert!(workout.description().starts_with("Cycling on "));
    Ok(())
}

#[test]
fn test_description_uses_month_name_and_day() -> Result<()> {
    let date = local_noon(2024, 3, 14);
    let workout = Workout::running("1".into(), date, LONDON, 5.0, 25.0, 180.0)?;
    assert_eq!(workout.description(), "Running on March 14");

    let workout = Workout::cycling("2".into(), local_noon(2023, 12, 1), LONDON, 20.0, 60.0, -3.0)?;
    assert_eq!(workout.description(), "Cycling on December 1");
    Ok(())
}

#[test]
fn test_derived_metrics_match_formulas() -> Result<()> {
    let date = Utc::now();
    for (distance, duration) in [(5.0, 25.0), (3.3, 17.2), (42.195, 181.0), (0.1, 0.7)] {
        let run = Workout::running("r".into(), date, LONDON, distance, duration, 170.0)?;
        assert_eq!(run.pace(), Some(duration / distance));
        assert_eq!(run.speed(), None);

        let ride = Workout::cycling("c".into(), date, LONDON, distance, duration, 12.0)?;
        assert_eq!(ride.speed(), Some(distance / (duration / 60.0)));
        assert_eq!(ride.pace(), None);
    }
    Ok(())
}

#[test]
fn test_constructors_reject_invalid_numbers() {
    let date = Utc::now();
    assert!(Workout::running("a".into(), date, LONDON, -5.0, 25.0, 180.0).is_err());
    assert!(Workout::running("a".into(), date, LONDON, 5.0, 0.0, 180.0).is_err());
    assert!(Workout::running("a".into(), date, LONDON, 5.0, 25.0, 0.0).is_err());
    assert!(Workout::cycling("a".into(), date, LONDON, 5.0, 25.0, f64::NAN).is_err());
    assert!(Workout::cycling("a".into(), date, Coords::new(95.0, 0.0), 5.0, 25.0, 1.0).is_err());
    // Negative elevation gain is allowed for rides.
    assert!(Workout::cycling("a".into(), date, LONDON, 5.0, 25.0, -40.0).is_ok());
}

#[test]
fn test_constructors_reject_overflowing_metrics() {
    let date = Utc::now();
    let pace = Workout::running("a".into(), date, LONDON, 1e-320, 25.0, 180.0);
    assert!(matches!(
        pace,
        Err(WorkoutError::NotFinite { field: "pace", .. })
    ));
    let speed = Workout::cycling("a".into(), date, LONDON, 1e308, 1e-10, 0.0);
    assert!(matches!(
        speed,
        Err(WorkoutError::NotFinite { field: "speed", .. })
    ));
}

#[test]
fn test_overflowing_pace_does_not_wipe_saved_workouts() -> Result<()> {
    let path = tempfile::NamedTempFile::new()?.into_temp_path();
    let mut service = create_service_with_store(Box::new(SqliteStore::open(&path)?))?;
    service.click_map(LONDON)?;
    fill_running(&mut service, "5", "25", "180");
    service.submit_workout(Utc::now())?;

    service.click_map(LONDON)?;
    fill_running(&mut service, "1e-320", "25", "180");
    let result = service.submit_workout(Utc::now());
    assert!(matches!(result, Err(AppError::Workout(_))));
    assert_eq!(service.workouts().len(), 1);
    assert!(service.form().is_visible());
    drop(service);

    let reloaded = create_service_with_store(Box::new(SqliteStore::open(&path)?))?;
    assert_eq!(reloaded.workouts().len(), 1);
    assert_eq!(reloaded.workouts()[0].pace(), Some(5.0));
    Ok(())
}

#[test]
fn test_failed_write_keeps_workout_in_memory() -> Result<()> {
    let mut service = create_service_with_store(Box::new(ReadOnlyStore))?;
    service.click_map(LONDON)?;
    fill_running(&mut service, "5", "25", "180");

    let result = service.submit_workout(Utc::now());
    assert!(matches!(result, Err(AppError::Persist(_))));
    assert_eq!(service.workouts().len(), 1);
    assert_eq!(service.map().map(|m| m.markers().len()), Some(1));
    assert_eq!(service.pending_click(), None);
    assert!(!service.form().is_visible());
    Ok(())
}

#[test]
fn test_invalid_distance_changes_nothing() -> Result<()> {
    let store = MemoryStore::new();
    let mut service = create_service_with_store(Box::new(store))?;
    service.click_map(LONDON)?;
    fill_running(&mut service, "-5", "25", "180");

    let result = service.submit_workout(Utc::now());
    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    let message = result.err().map(|e| e.to_string()).unwrap_or_default();
    assert_eq!(message, "Input should be positive numbers!");

    assert!(service.workouts().is_empty());
    assert!(service.form().is_visible());
    assert_eq!(service.form().input(FormField::Distance), "-5");
    assert_eq!(service.form().invalid_fields(), &[FormField::Distance]);
    assert_eq!(service.pending_click(), Some(LONDON));
    assert_eq!(service.map().map(|m| m.markers().len()), Some(0));
    Ok(())
}

#[test]
fn test_invalid_input_leaves_storage_untouched() -> Result<()> {
    let path = tempfile::NamedTempFile::new()?.into_temp_path();
    let mut service = create_service_with_store(Box::new(SqliteStore::open(&path)?))?;
    service.click_map(LONDON)?;
    fill_running(&mut service, "abc", "25", "180");
    assert!(service.submit_workout(Utc::now()).is_err());
    drop(service);

    let store = SqliteStore::open(&path)?;
    assert_eq!(store.get("workouts")?, None);
    Ok(())
}

#[test]
fn test_cycling_elevation_is_not_required_positive() -> Result<()> {
    let mut service = create_test_service()?;

    service.click_map(LONDON)?;
    fill_cycling(&mut service, "12", "40", "-25");
    assert_eq!(service.submit_workout(Utc::now())?.type_metric().0, -25.0);

    // A blank elevation field counts as zero.
    service.click_map(LONDON)?;
    fill_cycling(&mut service, "12", "40", "");
    assert_eq!(service.submit_workout(Utc::now())?.type_metric().0, 0.0);

    // But it still has to be a number.
    service.click_map(LONDON)?;
    fill_cycling(&mut service, "12", "40", "uphill");
    assert!(service.submit_workout(Utc::now()).is_err());
    assert_eq!(service.form().invalid_fields(), &[FormField::Elevation]);
    Ok(())
}

#[test]
fn test_running_requires_positive_cadence() -> Result<()> {
    let mut service = create_test_service()?;
    service.click_map(LONDON)?;
    fill_running(&mut service, "5", "25", "0");
    assert!(service.submit_workout(Utc::now()).is_err());

    fill_running(&mut service, "5", "25", "");
    assert!(service.submit_workout(Utc::now()).is_err());

    fill_running(&mut service, "5", "inf", "170");
    assert!(service.submit_workout(Utc::now()).is_err());
    assert_eq!(service.form().invalid_fields(), &[FormField::Duration]);
    assert!(service.workouts().is_empty());
    Ok(())
}

#[test]
fn test_submit_requires_map_click_first() -> Result<()> {
    let mut service = create_test_service()?;
    fill_running(&mut service, "5", "25", "180");
    let result = service.submit_workout(Utc::now());
    assert!(matches!(result, Err(AppError::NoLocationSelected)));
    assert!(service.workouts().is_empty());

    // Cancelling drops the chosen location as well.
    service.click_map(LONDON)?;
    service.cancel_form();
    let result = service.submit_workout(Utc::now());
    assert!(matches!(result, Err(AppError::NoLocationSelected)));
    Ok(())
}

#[test]
fn test_second_click_replaces_location() -> Result<()> {
    let mut service = create_test_service()?;
    let paris = Coords::new(48.8566, 2.3522);
    service.click_map(LONDON)?;
    service.click_map(paris)?;
    fill_running(&mut service, "5", "25", "180");
    assert_eq!(service.submit_workout(Utc::now())?.coords(), paris);
    Ok(())
}

#[test]
fn test_no_location_blocks_map_but_loads_list() -> Result<()> {
    let mut store = MemoryStore::new();
    let saved = vec![Workout::running("1".into(), Utc::now(), LONDON, 5.0, 25.0, 180.0)?];
    store.set("workouts", &serde_json::to_string(&saved)?)?;

    let mut service = AppService::with_store(
        Config::default(),
        "test_config.toml".into(),
        ":memory:".into(),
        Box::new(store),
    );
    let result = service.start(&FixedGeolocation::unavailable());
    let err = result.expect_err("location is unavailable");
    assert_eq!(err.to_string(), "Error Getting Location");

    assert!(service.map().is_none());
    assert!(service.location_error().is_some());
    assert_eq!(service.workouts().len(), 1);
    assert!(matches!(
        service.click_map(LONDON),
        Err(AppError::MapNotReady)
    ));
    assert!(!service.move_to_workout(Some("1")));
    // Details are still reachable without a map.
    assert_eq!(service.find_workout("1").map(Workout::id), Some("1"));
    Ok(())
}

#[test]
fn test_persist_and_reload_keeps_order_and_fields() -> Result<()> {
    let path = tempfile::NamedTempFile::new()?.into_temp_path();
    let mut service = create_service_with_store(Box::new(SqliteStore::open(&path)?))?;

    let points = [
        Coords::new(51.5, -0.1),
        Coords::new(40.7128, -74.006),
        Coords::new(-33.8688, 151.2093),
    ];
    let base = Utc::now();
    for (i, coords) in points.iter().enumerate() {
        service.click_map(*coords)?;
        if i % 2 == 0 {
            fill_running(&mut service, "7.3", "41", "172");
        } else {
            fill_cycling(&mut service, "31.5", "77", "-12");
        }
        service.submit_workout(base + chrono::Duration::seconds(i as i64))?;
    }
    let before = service.workouts().to_vec();
    drop(service);

    let reloaded = create_service_with_store(Box::new(SqliteStore::open(&path)?))?;
    assert_eq!(reloaded.workouts(), before.as_slice());
    for (old, new) in before.iter().zip(reloaded.workouts()) {
        assert_eq!(old.id(), new.id());
        assert_eq!(old.coords(), new.coords());
        assert_eq!(old.workout_type(), new.workout_type());
        assert_eq!(old.derived_metric(), new.derived_metric());
        assert_eq!(old.description(), new.description());
    }
    // Reloaded workouts are put back on the map.
    assert_eq!(reloaded.map().map(|m| m.markers().len()), Some(3));
    Ok(())
}

#[test]
fn test_storage_slot_holds_serialized_list() -> Result<()> {
    let mut service = create_test_service()?;
    service.click_map(LONDON)?;
    fill_running(&mut service, "5", "25", "180");
    service.submit_workout(local_noon(2024, 3, 14))?;

    let json = serde_json::to_value(service.workouts())?;
    let record = &json[0];
    assert_eq!(record["type"], "running");
    assert_eq!(record["coords"], serde_json::json!([51.5, -0.1]));
    assert_eq!(record["distance"], 5.0);
    assert_eq!(record["duration"], 25.0);
    assert_eq!(record["cadence"], 180.0);
    assert_eq!(record["pace"], 5.0);
    assert_eq!(record["description"], "Running on March 14");
    Ok(())
}

#[test]
fn test_slot_contains_one_record_after_submit() -> Result<()> {
    let path = tempfile::NamedTempFile::new()?.into_temp_path();
    let mut service = create_service_with_store(Box::new(SqliteStore::open(&path)?))?;
    service.click_map(LONDON)?;
    fill_running(&mut service, "5", "25", "180");
    service.submit_workout(Utc::now())?;

    let store = SqliteStore::open(&path)?;
    let raw = store.get("workouts")?.expect("slot written");
    let parsed: Vec<Workout> = serde_json::from_str(&raw)?;
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].pace(), Some(5.0));
    Ok(())
}

#[test]
fn test_reads_browser_local_storage_format() -> Result<()> {
    let raw = r#"[
        {"date":"2024-03-14T09:30:00.000Z","id":"0410400000","coords":[51.5,-0.1],
         "distance":5,"duration":25,"type":"running","cadence":180,"pace":5,
         "description":"Running on March 14"},
        {"date":"2024-03-15T09:30:00.000Z","id":"0410486400","coords":[51.51,-0.12],
         "distance":20,"duration":60,"type":"cycling","elevationGain":150,"speed":20,
         "description":"Cycling on March 15"}
    ]"#;
    let mut store = MemoryStore::new();
    store.set("workouts", raw)?;
    let service = create_service_with_store(Box::new(store))?;

    let workouts = service.workouts();
    assert_eq!(workouts.len(), 2);
    assert_eq!(workouts[0].id(), "0410400000");
    assert_eq!(workouts[0].pace(), Some(5.0));
    assert_eq!(workouts[1].speed(), Some(20.0));
    assert_eq!(workouts[1].type_metric(), (150.0, "m"));
    // Stored descriptions are taken as they are.
    assert_eq!(workouts[1].description(), "Cycling on March 15");
    Ok(())
}

#[test]
fn test_empty_or_garbage_slot_loads_as_empty() -> Result<()> {
    let service = create_test_service()?;
    assert!(service.workouts().is_empty());

    for raw in ["", "null", "{not json", "[{\"id\": 3}]"] {
        let mut store = MemoryStore::new();
        store.set("workouts", raw)?;
        let service = create_service_with_store(Box::new(store))?;
        assert!(service.workouts().is_empty(), "slot {raw:?} should load as empty");
    }
    Ok(())
}

#[test]
fn test_ids_are_unique_within_a_millisecond() -> Result<()> {
    let mut service = create_test_service()?;
    let now = Utc::now();
    for _ in 0..3 {
        service.click_map(LONDON)?;
        fill_running(&mut service, "5", "25", "180");
        service.submit_workout(now)?;
    }
    let mut ids: Vec<&str> = service.workouts().iter().map(Workout::id).collect();
    assert!(ids.iter().all(|id| id.len() == 10));
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    Ok(())
}

#[test]
fn test_list_is_newest_first() -> Result<()> {
    let mut service = create_test_service()?;
    let base = Utc::now();
    for (i, distance) in ["1", "2", "3"].iter().enumerate() {
        service.click_map(LONDON)?;
        fill_running(&mut service, distance, "10", "160");
        service.submit_workout(base + chrono::Duration::seconds(i as i64))?;
    }
    let distances: Vec<f64> = service
        .workouts_newest_first()
        .map(Workout::distance)
        .collect();
    assert_eq!(distances, vec![3.0, 2.0, 1.0]);
    Ok(())
}

#[test]
fn test_list_click_recenters_map() -> Result<()> {
    let mut service = create_test_service()?;
    let lisbon = Coords::new(38.7223, -9.1393);
    service.click_map(lisbon)?;
    fill_cycling(&mut service, "20", "60", "150");
    let id = service.submit_workout(Utc::now())?.id().to_string();

    assert!(service.move_to_workout(Some(&id)));
    let map = service.map().expect("map");
    assert!(map.is_animating());
    assert_eq!(map.destination(), lisbon);
    assert_eq!(map.zoom(), 16);

    // Half way through the pan the centre is between the two points.
    let start = Instant::now();
    assert!(service.tick(start + Duration::from_millis(500)));
    let mid = service.map().expect("map").center();
    assert!(mid.lat < LONDON.lat && mid.lat > lisbon.lat);

    service.tick(start + Duration::from_secs(2));
    let map = service.map().expect("map");
    assert!(!map.is_animating());
    assert_eq!(map.center(), lisbon);
    Ok(())
}

#[test]
fn test_click_outside_list_entry_is_noop() -> Result<()> {
    let mut service = create_test_service()?;
    assert!(!service.move_to_workout(None));
    assert!(!service.move_to_workout(Some("does-not-exist")));
    let map = service.map().expect("map");
    assert!(!map.is_animating());
    assert_eq!(map.center(), LONDON);
    Ok(())
}

#[test]
fn test_form_toggle_swaps_type_specific_field() -> Result<()> {
    let mut service = create_test_service()?;
    service.click_map(LONDON)?;
    assert_eq!(service.form().workout_type(), WorkoutType::Running);
    assert!(service.form().visible_fields().contains(&FormField::Cadence));
    assert!(!service.form().visible_fields().contains(&FormField::Elevation));

    service.form_mut().focus(FormField::Cadence);
    service.toggle_workout_type();
    assert_eq!(service.form().workout_type(), WorkoutType::Cycling);
    assert!(service.form().visible_fields().contains(&FormField::Elevation));
    assert!(!service.form().visible_fields().contains(&FormField::Cadence));
    assert_eq!(service.form().focused(), FormField::Elevation);
    Ok(())
}

#[test]
fn test_form_is_cleared_and_collapses_after_submit() -> Result<()> {
    let mut service = create_test_service()?;
    service.click_map(LONDON)?;
    fill_running(&mut service, "5", "25", "180");
    service.submit_workout(Utc::now())?;

    let form = service.form();
    assert!(form.is_collapsing());
    for field in [FormField::Distance, FormField::Duration, FormField::Cadence] {
        assert_eq!(form.input(field), "");
    }
    service.tick(Instant::now() + Duration::from_secs(1));
    assert!(!service.form().is_collapsing());
    assert!(!service.form().is_visible());
    Ok(())
}

#[test]
fn test_home_location_is_validated() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut service = AppService::with_store(
        Config::default(),
        dir.path().join("config.toml"),
        ":memory:".into(),
        Box::new(MemoryStore::new()),
    );
    assert!(service.set_home_location(Coords::new(120.0, 0.0)).is_err());
    service.set_home_location(LONDON)?;
    assert!(service.set_zoom_level(0).is_err());
    service.set_zoom_level(13)?;

    let reloaded = mapty_lib::load_config_util(&dir.path().join("config.toml"))?;
    assert_eq!(reloaded.home_location, Some(LONDON));
    assert_eq!(reloaded.map.zoom_level, 13);
    Ok(())
}

#[test]
fn test_configured_geolocation_sources() {
    use mapty_lib::{ConfiguredGeolocation, Geolocation, GeolocationError};

    // The environment value wins over the config file.
    let geo = ConfiguredGeolocation::from_parts(Some("40.4, -3.7".into()), Some(LONDON));
    assert_eq!(geo.current_position(), Ok(Coords::new(40.4, -3.7)));

    let geo = ConfiguredGeolocation::from_parts(None, Some(LONDON));
    assert_eq!(geo.current_position(), Ok(LONDON));

    let geo = ConfiguredGeolocation::from_parts(Some("  ".into()), None);
    assert_eq!(geo.current_position(), Err(GeolocationError::Unavailable));

    let geo = ConfiguredGeolocation::from_parts(Some("north pole".into()), Some(LONDON));
    assert!(matches!(
        geo.current_position(),
        Err(GeolocationError::Denied(_))
    ));
}

#[test]
fn test_coords_parsing() -> Result<()> {
    let coords: Coords = "51.5,-0.1".parse()?;
    assert_eq!(coords, LONDON);
    assert!("51.5".parse::<Coords>().is_err());
    assert!("abc,1".parse::<Coords>().is_err());
    assert!("91,0".parse::<Coords>().is_err());
    assert_eq!(LONDON.to_string(), "51.50000, -0.10000");
    Ok(())
}

#[test]
fn test_config_defaults_and_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("config.toml");

    // A missing file is created with defaults.
    let config = mapty_lib::load_config_util(&path)?;
    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(config.map.zoom_level, 16);
    assert_eq!(config.map.pan_duration_ms, 1000);
    assert_eq!(config.popup.max_width, 250);
    assert_eq!(config.popup.min_width, 100);
    assert!(!config.popup.auto_close);
    assert!(!config.popup.close_on_click);

    let mut changed = config.clone();
    changed.home_location = Some(LONDON);
    changed.theme.header_color = "Cyan".into();
    mapty_lib::save_config_util(&path, &changed)?;
    assert_eq!(mapty_lib::load_config_util(&path)?, changed);
    Ok(())
}

#[test]
fn test_config_rejects_out_of_range_home() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "home_location = [123.0, 0.0]\n")?;
    assert!(matches!(
        mapty_lib::load_config_util(&path),
        Err(mapty_lib::ConfigError::InvalidHomeLocation(_))
    ));

    // Partial files fall back to defaults for the rest.
    std::fs::write(&path, "[map]\nzoom_level = 12\n")?;
    let config = mapty_lib::load_config_util(&path)?;
    assert_eq!(config.map.zoom_level, 12);
    assert_eq!(config.map.pan_duration_ms, 1000);
    assert_eq!(config.home_location, None);
    Ok(())
}

#[test]
fn test_parse_color() {
    assert_eq!(
        mapty_lib::parse_color("darkgrey").ok(),
        Some(mapty_lib::StandardColor::DarkGrey)
    );
    assert!(mapty_lib::parse_color("Mauve").is_err());
}

#[test]
fn test_numeric_coercion() {
    use mapty_lib::form::parse_numeric;
    assert_eq!(parse_numeric(""), 0.0);
    assert_eq!(parse_numeric("  7.5 "), 7.5);
    assert_eq!(parse_numeric("-3"), -3.0);
    assert!(parse_numeric("12km").is_nan());
    assert_eq!(parse_numeric("0x10"), 16.0);
    assert_eq!(parse_numeric("0b101"), 5.0);
    assert!(parse_numeric("0x-1").is_nan());
    assert!(parse_numeric("0xZZ").is_nan());
}

#[test]
fn test_popup_options_follow_config() -> Result<()> {
    let mut config = Config::default();
    config.popup.auto_close = true;
    config.popup.close_on_click = true;
    let mut service = AppService::in_memory(config);
    service.start(&FixedGeolocation::at(LONDON))?;

    for _ in 0..2 {
        service.click_map(LONDON)?;
        fill_running(&mut service, "5", "25", "180");
        service.submit_workout(Utc::now())?;
    }
    let open: Vec<bool> = service
        .map()
        .expect("map")
        .markers()
        .iter()
        .map(|m| m.popup.open)
        .collect();
    assert_eq!(open, vec![false, true]);

    // A map click closes the popups that ask for it.
    service.click_map(LONDON)?;
    assert!(service
        .map()
        .expect("map")
        .markers()
        .iter()
        .all(|m| !m.popup.open));
    Ok(())
}

#[test]
fn test_sqlite_store_upserts_single_slot() -> Result<()> {
    let mut store = SqliteStore::open_in_memory()?;
    assert_eq!(store.get("workouts")?, None);
    store.set("workouts", "[]")?;
    store.set("workouts", "[1]")?;
    assert_eq!(store.get("workouts")?.as_deref(), Some("[1]"));

    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM local_storage", [], |row| row.get(0))?;
    assert_eq!(rows, 1);
    Ok(())
}
