mod support;

use std::fs;

use taskpad::error::Error;
use taskpad::query::{StatusFilter, ViewQuery};
use taskpad::service::{NewTask, TaskUpdate};

use support::TestHome;

fn new_task(title: &str, due: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: String::new(),
        due_date: Some(due.to_string()),
    }
}

#[test]
fn created_task_is_persisted_with_matching_timestamps() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    let service = home.service();

    let created = service.create(NewTask {
        title: "Buy milk".to_string(),
        description: "2 litres".to_string(),
        due_date: Some("2024-03-05".to_string()),
    })?;

    let stored = service.storage().load();
    assert_eq!(stored, vec![created.clone()]);
    assert_eq!(created.created_at(), created.updated_at());
    assert!(!created.completed());

    let records = home.read_records()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "Buy milk");
    assert_eq!(records[0]["due_date"], "2024-03-05");
    assert_eq!(records[0]["id"], created.id());
    Ok(())
}

#[test]
fn blank_title_is_rejected_and_file_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    let service = home.service();
    service.create(new_task("keep", ""))?;
    let before = home.read_data()?;

    let err = service.create(new_task("   ", "")).unwrap_err();
    assert!(matches!(err, Error::EmptyTitle));
    assert_eq!(home.read_data()?, before);
    Ok(())
}

#[test]
fn malformed_due_date_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    let service = home.service();

    let err = service.create(new_task("t", "next week")).unwrap_err();
    assert!(matches!(err, Error::InvalidDueDate(value) if value == "next week"));
    assert!(!home.data_path().exists());
    Ok(())
}

#[test]
fn delete_unknown_id_leaves_file_byte_identical() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    let service = home.service();
    service.create(new_task("a", ""))?;
    service.create(new_task("b", ""))?;
    let before = fs::read(home.data_path())?;

    let err = service.delete("no-such-id").unwrap_err();
    assert!(matches!(err, Error::TaskNotFound(id) if id == "no-such-id"));
    assert_eq!(fs::read(home.data_path())?, before);
    Ok(())
}

#[test]
fn delete_removes_exactly_one_task() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    let service = home.service();
    let a = service.create(new_task("a", ""))?;
    let b = service.create(new_task("b", ""))?;

    let removed = service.delete(a.id())?;
    assert_eq!(removed.id(), a.id());

    let stored = service.storage().load();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id(), b.id());
    Ok(())
}

#[test]
fn invalid_state_is_rejected_without_saving() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    let service = home.service();
    let task = service.create(new_task("t", ""))?;
    let before = home.read_data()?;

    let err = service.set_status(task.id(), "finished").unwrap_err();
    assert!(matches!(err, Error::InvalidState(value) if value == "finished"));
    assert_eq!(home.read_data()?, before);
    Ok(())
}

#[test]
fn set_status_toggles_completion() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    let service = home.service();
    let task = service.create(new_task("t", ""))?;

    let done = service.set_status(task.id(), "completed")?;
    assert!(done.completed());
    assert!(done.updated_at() >= task.updated_at());

    let active = service.set_status(task.id(), "active")?;
    assert!(!active.completed());
    assert_eq!(active.created_at(), task.created_at());
    Ok(())
}

#[test]
fn update_validates_every_field_before_mutating() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    let service = home.service();
    let task = service.create(new_task("original", "2024-01-01"))?;
    let before = home.read_data()?;

    let err = service
        .update(
            task.id(),
            TaskUpdate {
                title: "renamed".to_string(),
                description: "changed".to_string(),
                due_date: Some("2024-13-01".to_string()),
                completed: true,
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDueDate(_)));
    assert_eq!(home.read_data()?, before);

    let err = service
        .update(
            task.id(),
            TaskUpdate {
                title: " ".to_string(),
                ..TaskUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::EmptyTitle));
    assert_eq!(home.read_data()?, before);
    Ok(())
}

#[test]
fn update_replaces_all_fields() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    let service = home.service();
    let task = service.create(NewTask {
        title: "original".to_string(),
        description: "old".to_string(),
        due_date: Some("2024-01-01".to_string()),
    })?;

    let updated = service.update(
        task.id(),
        TaskUpdate {
            title: "renamed".to_string(),
            description: String::new(),
            due_date: Some(String::new()),
            completed: true,
        },
    )?;

    assert_eq!(updated.id(), task.id());
    assert_eq!(updated.title(), "renamed");
    assert_eq!(updated.description(), "");
    assert_eq!(updated.due_date(), None);
    assert!(updated.completed());
    assert_eq!(updated.created_at(), task.created_at());
    assert_eq!(service.storage().load(), vec![updated]);
    Ok(())
}

#[test]
fn update_unknown_id_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    let service = home.service();

    let err = service
        .update(
            "missing",
            TaskUpdate {
                title: "x".to_string(),
                ..TaskUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::TaskNotFound(_)));
    assert!(!home.data_path().exists());
    Ok(())
}

#[test]
fn view_reads_corrupt_file_as_empty() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    home.write_data("{ not json")?;
    let service = home.service();

    let view = service.view(&ViewQuery::default());
    assert_eq!(view.total, 0);

    // The next successful write replaces the corrupt document.
    service.create(new_task("fresh", ""))?;
    assert_eq!(home.read_records()?.len(), 1);
    Ok(())
}

#[test]
fn view_filters_stored_tasks() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new()?;
    let service = home.service();
    let milk = service.create(new_task("Buy milk", ""))?;
    service.create(new_task("Pay rent", ""))?;
    service.set_status(milk.id(), "completed")?;

    let active = service.view(&ViewQuery::new("", StatusFilter::Active, None));
    assert_eq!(active.total, 1);
    assert_eq!(active.tasks[0].title(), "Pay rent");

    let search = service.view(&ViewQuery::new("MILK", StatusFilter::All, None));
    assert_eq!(search.total, 1);
    assert!(search.tasks[0].completed());
    Ok(())
}
