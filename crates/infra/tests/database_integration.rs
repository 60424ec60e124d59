//! End-to-end coverage for the SQLite alarm repository.
//!
//! Each test operates on an isolated database file with migrations applied.

mod support;

use alarmclock_core::AlarmRepository;
use alarmclock_domain::{AlarmError, AlarmId};
use alarmclock_infra::database::SqliteAlarmRepository;
use support::{alarm, TestDatabase};

#[tokio::test(flavor = "multi_thread")]
async fn saved_alarm_round_trips() {
    let db = TestDatabase::new();
    let repository = SqliteAlarmRepository::new(db.manager.clone());
    let definition = alarm(6, 45, &[1, 3, 5]).with_label("Gym");

    repository.save(&definition).await.expect("alarm saved");

    let loaded = repository.get(definition.id).await.unwrap().expect("alarm stored");
    assert_eq!(loaded, definition);
    assert_eq!(loaded.days_label(), "Mon, Wed, Fri");
}

#[tokio::test(flavor = "multi_thread")]
async fn save_replaces_existing_row() {
    let db = TestDatabase::new();
    let repository = SqliteAlarmRepository::new(db.manager.clone());
    let definition = alarm(7, 0, &[]);
    repository.save(&definition).await.unwrap();

    let edited = definition.clone().with_days([6, 7]).with_label("Weekend").with_enabled(false);
    repository.save(&edited).await.unwrap();

    let all = repository.load_all().await.unwrap();
    assert_eq!(all, vec![edited]);
}

#[tokio::test(flavor = "multi_thread")]
async fn load_all_orders_by_time_of_day() {
    let db = TestDatabase::new();
    let repository = SqliteAlarmRepository::new(db.manager.clone());
    let late = alarm(22, 0, &[]);
    let early = alarm(5, 30, &[1]);
    let noon = alarm(12, 0, &[1, 2, 3, 4, 5, 6, 7]);

    for definition in [&late, &early, &noon] {
        repository.save(definition).await.unwrap();
    }

    let hours: Vec<u8> =
        repository.load_all().await.unwrap().into_iter().map(|alarm| alarm.hour).collect();
    assert_eq!(hours, vec![5, 12, 22]);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_alarm_is_none_and_delete_is_idempotent() {
    let db = TestDatabase::new();
    let repository = SqliteAlarmRepository::new(db.manager.clone());
    let definition = alarm(8, 15, &[]);
    repository.save(&definition).await.unwrap();

    repository.delete(definition.id).await.unwrap();
    repository.delete(definition.id).await.unwrap();

    assert!(repository.get(definition.id).await.unwrap().is_none());
    assert!(repository.get(AlarmId::new()).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_definition_is_rejected_before_storage() {
    let db = TestDatabase::new();
    let repository = SqliteAlarmRepository::new(db.manager.clone());
    let mut definition = alarm(8, 15, &[]);
    definition.days.insert(8);

    let err = repository.save(&definition).await.unwrap_err();
    assert!(matches!(err, AlarmError::InvalidDefinition(_)));
    assert!(repository.load_all().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn corrupt_days_column_surfaces_as_database_error() {
    let db = TestDatabase::new();
    let repository = SqliteAlarmRepository::new(db.manager.clone());
    let id = AlarmId::new();
    db.execute_batch(&format!(
        "INSERT INTO alarms (id, hour, minute, enabled, label, days, updated_at)
         VALUES ('{id}', 7, 0, 1, '', 'mon,wed', 0);"
    ));

    assert!(matches!(repository.get(id).await, Err(AlarmError::Database(_))));
    assert!(matches!(repository.load_all().await, Err(AlarmError::Database(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn schema_check_rejects_out_of_range_hour() {
    let db = TestDatabase::new();
    let conn = db.manager.get_connection().unwrap();

    let result = conn.execute(
        "INSERT INTO alarms (id, hour, minute, enabled, label, days, updated_at)
         VALUES ('x', 24, 0, 1, '', '', 0)",
        [],
    );
    assert!(result.is_err(), "CHECK constraint should reject hour 24");
}
