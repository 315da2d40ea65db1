//! End-to-end planner workflows over the SQLite store.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use planwise_core::storage::Config;
use planwise_core::{
    FixedClock, LocalZone, Planner, RecurrenceRule, SequentialIds, TaskDb, TaskDraft, TaskStore,
};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn planner_at(db: TaskDb, now: DateTime<Utc>, id_prefix: &str) -> Planner<TaskDb> {
    Planner::new(db)
        .with_clock(Arc::new(FixedClock::new(now)))
        .with_ids(Arc::new(SequentialIds::new(id_prefix)))
        .with_zone(LocalZone::utc())
}

#[test]
fn weekly_routine_feeds_habit_suggestions() {
    // Routine created on Monday 2024-01-01: Mondays at 18:00 for a month.
    let db = TaskDb::open_memory().unwrap();
    let mut planner = planner_at(db, utc(2024, 1, 1, 8, 0), "first").with_horizon_months(1);
    let draft = TaskDraft::new("Gym", "Sport", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .with_time(NaiveTime::from_hms_opt(18, 0, 0).unwrap())
        .with_duration(60);
    let instances = planner
        .create_routine(draft, &RecurrenceRule::weekly([1]))
        .unwrap();
    assert_eq!(instances.len(), 5);

    // Keep the first three sessions as history; the engine runs on Saturday.
    let routine_id = instances[0].routine_id.clone().unwrap();
    for late in &instances[3..] {
        assert!(planner.remove_task(&late.id).unwrap());
    }

    let db = planner.into_store();
    let mut planner = planner_at(db, utc(2024, 1, 20, 10, 0), "second");
    let suggestions = planner.refresh_suggestions().unwrap().to_vec();

    let gym = suggestions
        .iter()
        .find(|s| s.title == "Gym")
        .expect("habit suggestion");
    assert_eq!(gym.suggested_date, utc(2024, 1, 22, 18, 0));
    assert_eq!(gym.duration_minutes, Some(60));
    assert_eq!(gym.original_task_id.as_deref(), Some(instances[2].id.as_str()));

    let accepted = planner.accept_suggestion(&gym.id).unwrap();
    assert!(accepted.routine_id.is_none());
    assert_eq!(planner.tasks().unwrap().len(), 4);

    // Once planned, the same habit is not suggested again.
    let again = planner.refresh_suggestions().unwrap().to_vec();
    assert!(again.iter().all(|s| s.title != "Gym"));

    assert_eq!(planner.remove_routine(&routine_id).unwrap(), 3);
    assert_eq!(planner.tasks().unwrap().len(), 1);
}

#[test]
fn routine_with_checklist_is_stored_per_instance() {
    let db = TaskDb::open_memory().unwrap();
    let mut planner = planner_at(db, utc(2024, 1, 1, 8, 0), "c").with_horizon_months(1);
    let draft = TaskDraft::new("Gym", "Sport", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .with_subtask("warm up")
        .with_subtask("cool down");

    let instances = planner
        .create_routine(draft, &RecurrenceRule::weekly([1]))
        .unwrap();
    assert_eq!(instances.len(), 5);

    let stored = planner.tasks().unwrap();
    assert_eq!(stored.len(), 5);
    let mut subtask_ids = Vec::new();
    for task in &stored {
        let titles: Vec<_> = task.subtasks.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["warm up", "cool down"]);
        assert!(task.subtasks.iter().all(|s| !s.is_completed));
        subtask_ids.extend(task.subtasks.iter().map(|s| s.id.clone()));
    }
    let total = subtask_ids.len();
    subtask_ids.sort();
    subtask_ids.dedup();
    assert_eq!(subtask_ids.len(), total);

    // Ticking one instance's checklist leaves the others untouched.
    let mut db = planner.into_store();
    let mut first = stored[0].clone();
    first.subtasks[0].is_completed = true;
    db.update_task(&first).unwrap();
    let reloaded = db.list_tasks().unwrap();
    assert!(reloaded[0].subtasks[0].is_completed);
    assert!(!reloaded[1].subtasks[0].is_completed);
}

#[test]
fn config_drives_zone_and_rule_keys() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    let mut config = Config::load_from(&config_path).unwrap();
    config.set("time.utc_offset_minutes", "-300").unwrap();
    config.set("suggestions.social_category", "Family").unwrap();
    config.save_to(&config_path).unwrap();

    let config = Config::load_from(&config_path).unwrap();
    let db = TaskDb::open_path(&dir.path().join("planwise.db")).unwrap();
    // 02:00 UTC Sunday is still Saturday evening at UTC-5.
    let mut planner = Planner::from_config(db, &config)
        .with_clock(Arc::new(FixedClock::new(utc(2024, 1, 7, 2, 0))))
        .with_ids(Arc::new(SequentialIds::new("s")));
    assert_eq!(planner.zone().offset_minutes(), -300);

    let suggestions = planner.refresh_suggestions().unwrap().to_vec();
    let social = suggestions
        .iter()
        .find(|s| s.category == "Family")
        .expect("weekend suggestion in the configured category");
    assert_eq!(social.title, "Call a friend or relative");
    // Saturday local, so no weekly review yet.
    assert!(suggestions.iter().all(|s| s.title != "Weekly Review"));
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planwise.db");

    {
        let db = TaskDb::open_path(&path).unwrap();
        let mut planner = planner_at(db, utc(2024, 3, 4, 9, 0), "t");
        planner
            .add_task(
                TaskDraft::new("Dentist", "Health", NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
                    .with_subtask("Bring card"),
            )
            .unwrap();
        planner.add_category("Errands", "bg-teal-100").unwrap();
    }

    let db = TaskDb::open_path(&path).unwrap();
    let tasks = db.list_tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].subtasks[0].title, "Bring card");
    assert_eq!(tasks[0].date, utc(2024, 3, 5, 9, 0));

    let labels: Vec<_> = db
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|c| c.label)
        .collect();
    assert_eq!(labels, vec!["Errands"]);
}
