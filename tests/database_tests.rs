use anyhow::Result;
use assistant_bot::database::{connection::DatabaseManager, models::*};
use chrono::{Duration, Utc};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

#[tokio::test]
async fn test_task_creation_and_retrieval() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user_id = 12345i64;

    let task = Task::create(&db.pool, user_id, "buy milk".to_string()).await?;
    assert_eq!(task.user_id, user_id);
    assert_eq!(task.task, "buy milk");
    assert!(!task.done);
    assert!(task.id > 0);

    let tasks = Task::find_by_user(&db.pool, user_id).await?;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task.id);
    assert_eq!(tasks[0].task, "buy milk");

    Ok(())
}

#[tokio::test]
async fn test_tasks_ordered_by_insertion() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user_id = 1i64;

    Task::create(&db.pool, user_id, "first".to_string()).await?;
    Task::create(&db.pool, user_id, "second".to_string()).await?;
    Task::create(&db.pool, user_id, "third".to_string()).await?;

    let tasks = Task::find_by_user(&db.pool, user_id).await?;
    let titles: Vec<&str> = tasks.iter().map(|t| t.task.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);

    Ok(())
}

#[tokio::test]
async fn test_tasks_scoped_to_owner() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    Task::create(&db.pool, 1, "mine".to_string()).await?;
    Task::create(&db.pool, 2, "theirs".to_string()).await?;

    let mine = Task::find_by_user(&db.pool, 1).await?;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].task, "mine");

    let theirs = Task::find_by_user(&db.pool, 2).await?;
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].task, "theirs");

    assert_eq!(Task::count_by_user(&db.pool, 1).await?, 1);
    assert_eq!(Task::count_by_user(&db.pool, 3).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_task_delete_requires_owner() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let task = Task::create(&db.pool, 1, "mine".to_string()).await?;

    // A different user cannot delete it
    let deleted = Task::delete(&db.pool, 2, task.id).await?;
    assert!(!deleted);
    assert_eq!(Task::find_by_user(&db.pool, 1).await?.len(), 1);

    // The owner can
    let deleted = Task::delete(&db.pool, 1, task.id).await?;
    assert!(deleted);
    assert!(Task::find_by_user(&db.pool, 1).await?.is_empty());

    // Deleting again reports no row
    let deleted = Task::delete(&db.pool, 1, task.id).await?;
    assert!(!deleted);

    Ok(())
}

#[tokio::test]
async fn test_task_set_done() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let task = Task::create(&db.pool, 1, "laundry".to_string()).await?;
    assert!(Task::set_done(&db.pool, 1, task.id).await?);

    let tasks = Task::find_by_user(&db.pool, 1).await?;
    assert!(tasks[0].done);

    // Wrong owner touches nothing
    assert!(!Task::set_done(&db.pool, 2, task.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_note_creation_and_retrieval() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let user_id = 42i64;

    let note = Note::create(&db.pool, user_id, "project idea".to_string()).await?;
    assert_eq!(note.user_id, user_id);
    assert_eq!(note.note, "project idea");

    Note::create(&db.pool, user_id, "second thought".to_string()).await?;
    Note::create(&db.pool, 99, "someone else's".to_string()).await?;

    let notes = Note::find_by_user(&db.pool, user_id).await?;
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].note, "project idea");
    assert_eq!(notes[1].note, "second thought");

    Ok(())
}

#[tokio::test]
async fn test_reminder_creation_and_fire_time() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let remind_at = Utc::now() + Duration::hours(2);

    let reminder = Reminder::create(&db.pool, 7, "call mom".to_string(), remind_at).await?;
    assert_eq!(reminder.user_id, 7);
    assert_eq!(reminder.text, "call mom");

    let fire_time = reminder.fire_time().unwrap();
    assert!((fire_time.timestamp() - remind_at.timestamp()).abs() <= 1);

    let reminders = Reminder::find_by_user(&db.pool, 7).await?;
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].id, reminder.id);

    Ok(())
}

#[tokio::test]
async fn test_reminder_pending_vs_due() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let now = Utc::now();

    let past = Reminder::create(&db.pool, 1, "overdue".to_string(), now - Duration::hours(1)).await?;
    let future =
        Reminder::create(&db.pool, 1, "upcoming".to_string(), now + Duration::hours(1)).await?;

    let pending = Reminder::find_pending(&db.pool, now).await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, future.id);

    let due = Reminder::find_due(&db.pool, now).await?;
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, past.id);

    Ok(())
}

#[tokio::test]
async fn test_reminder_delete() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let reminder =
        Reminder::create(&db.pool, 1, "x".to_string(), Utc::now() + Duration::minutes(5)).await?;

    assert!(Reminder::delete(&db.pool, reminder.id).await?);
    assert!(!Reminder::delete(&db.pool, reminder.id).await?);
    assert!(Reminder::find_by_user(&db.pool, 1).await?.is_empty());

    Ok(())
}
