use super::*;
use crate::generation::{GeneratedModule, GeneratedResource, GeneratedRoadmap, InitializeOptions};

/// Helper function to set up a test database
async fn setup_test_db() -> (Database, PathBuf, tempfile::TempDir) {
  let dir = tempdir().unwrap();
  let path = dir.path().join("nested").join("test.db");
  let db = Database::open(&path).await.unwrap();
  (db, path, dir)
}

fn roadmap_for(user: &str, role: &str) -> Roadmap {
  GeneratedRoadmap {
    modules: vec![GeneratedModule {
      title:           "Foundations".into(),
      description:     "Start here".into(),
      skills_covered:  vec!["sql".into()],
      estimated_hours: None,
      resources:       vec![GeneratedResource {
        title:           "SQL basics".into(),
        url:             "https://example.com/sql".into(),
        description:     String::new(),
        estimated_hours: 1.5,
        resource_type:   ResourceKind::Course,
      }],
    }],
  }
  .initialize(InitializeOptions::new(user, role, 2))
  .unwrap()
}

#[traced_test]
#[tokio::test]
async fn test_database_creation() {
  let (db, path, _dir) = setup_test_db().await;

  assert!(path.exists());
  assert_eq!(db.get_config(SCHEMA_VERSION_KEY).await.unwrap().as_deref(), Some(SCHEMA_VERSION));
}

#[traced_test]
#[test]
fn test_default_path() {
  let path = Database::default_path();

  assert!(path.ends_with("pathway/pathway.db") || path.ends_with("pathway\\pathway.db"));
  assert!(path
    .parent()
    .unwrap()
    .starts_with(dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))));
}

#[traced_test]
#[tokio::test]
async fn test_config_persistence() {
  let (db, path, _dir) = setup_test_db().await;
  db.set_config("default_user", "alice").await.unwrap();
  db.set_config("default_user", "bob").await.unwrap();

  drop(db);
  let db = Database::open(path).await.unwrap();
  assert_eq!(db.get_config("default_user").await.unwrap().as_deref(), Some("bob"));
  assert_eq!(db.get_config("missing").await.unwrap(), None);
}

#[traced_test]
#[tokio::test]
async fn test_add_then_query_by_id() {
  let mut db = Database::open_in_memory().await.unwrap();
  let roadmap = roadmap_for("alice", "Data Engineer");

  Add::roadmap(roadmap.clone()).execute(&mut db).await.unwrap();
  let found = Query::by_id(&roadmap.id).execute(&mut db).await.unwrap();
  assert_eq!(found, vec![roadmap]);
  assert!(logs_contain("Stored roadmap"));
}

#[tokio::test]
async fn test_duplicate_add_fails() {
  let mut db = Database::open_in_memory().await.unwrap();
  let roadmap = roadmap_for("alice", "Data Engineer");

  Add::roadmap(roadmap.clone()).execute(&mut db).await.unwrap();
  assert!(Add::roadmap(roadmap).execute(&mut db).await.is_err());
}

#[tokio::test]
async fn test_update_bumps_version() {
  let mut db = Database::open_in_memory().await.unwrap();
  let mut roadmap = Add::roadmap(roadmap_for("alice", "Data Engineer")).execute(&mut db).await.unwrap();

  roadmap.progress_percentage = 50.0;
  let stored = Update::roadmap(&roadmap).execute(&mut db).await.unwrap();
  assert_eq!(stored.version, 1);

  let reread = Query::by_id(&roadmap.id).execute(&mut db).await.unwrap().pop().unwrap();
  assert_eq!(reread.version, 1);
  assert_eq!(reread.progress_percentage, 50.0);
}

#[traced_test]
#[tokio::test]
async fn test_stale_update_is_rejected() {
  let mut db = Database::open_in_memory().await.unwrap();
  let original = Add::roadmap(roadmap_for("alice", "Data Engineer")).execute(&mut db).await.unwrap();

  let mut first = original.clone();
  first.target_role = "Analytics Engineer".into();
  Update::roadmap(&first).execute(&mut db).await.unwrap();

  let mut second = original.clone();
  second.progress_percentage = 100.0;
  match Update::roadmap(&second).execute(&mut db).await {
    Err(PathwayError::ConcurrencyConflict { id, expected }) => {
      assert_eq!(id, original.id);
      assert_eq!(expected, 0);
    },
    other => panic!("expected a conflict, got {other:?}"),
  }
  assert!(logs_contain("Rejected stale write"));

  let stored = Query::by_id(&original.id).execute(&mut db).await.unwrap().pop().unwrap();
  assert_eq!(stored.target_role, "Analytics Engineer");
  assert_eq!(stored.progress_percentage, 0.0);
}

#[tokio::test]
async fn test_update_of_unknown_roadmap() {
  let mut db = Database::open_in_memory().await.unwrap();
  let roadmap = roadmap_for("alice", "Data Engineer");
  assert!(matches!(
    Update::roadmap(&roadmap).execute(&mut db).await,
    Err(PathwayError::NotFound(Entity::Roadmap(_)))
  ));
}

#[tokio::test]
async fn test_soft_delete_hides_roadmap() {
  let mut db = Database::open_in_memory().await.unwrap();
  let roadmap = Add::roadmap(roadmap_for("alice", "Data Engineer")).execute(&mut db).await.unwrap();

  let removed = Remove::by_id(&roadmap.id).execute(&mut db).await.unwrap();
  assert_eq!(removed.len(), 1);
  assert!(removed[0].is_deleted);

  assert!(Query::by_id(&roadmap.id).execute(&mut db).await.unwrap().is_empty());
  let hidden = Query::by_id(&roadmap.id).include_deleted().execute(&mut db).await.unwrap();
  assert_eq!(hidden.len(), 1);
  assert!(hidden[0].is_deleted);
  assert_eq!(hidden[0].version, 1);

  // Writers holding the old copy can no longer touch it
  assert!(matches!(
    Update::roadmap(&roadmap).execute(&mut db).await,
    Err(PathwayError::NotFound(_))
  ));
}

#[tokio::test]
async fn test_hard_delete_drops_soft_deleted_rows() {
  let mut db = Database::open_in_memory().await.unwrap();
  let roadmap = Add::roadmap(roadmap_for("alice", "Data Engineer")).execute(&mut db).await.unwrap();
  Remove::by_id(&roadmap.id).execute(&mut db).await.unwrap();

  let removed = Remove::by_id(&roadmap.id).hard().execute(&mut db).await.unwrap();
  assert_eq!(removed.len(), 1);
  assert!(Query::by_id(&roadmap.id).include_deleted().execute(&mut db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dry_run_changes_nothing() {
  let mut db = Database::open_in_memory().await.unwrap();
  Add::roadmap(roadmap_for("alice", "Data Engineer")).execute(&mut db).await.unwrap();
  Add::roadmap(roadmap_for("alice", "ML Engineer")).execute(&mut db).await.unwrap();

  let preview = Remove::by_user("alice").hard().dry_run().execute(&mut db).await.unwrap();
  assert_eq!(preview.len(), 2);
  assert_eq!(Query::for_user("alice").execute(&mut db).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_user_queries() {
  let mut db = Database::open_in_memory().await.unwrap();
  let mut older = roadmap_for("alice", "Data Engineer");
  older.created_at -= chrono::Duration::days(2);
  older.updated_at = older.created_at;
  older.progress_percentage = 100.0;
  let mut newer = roadmap_for("alice", "ML Engineer");
  newer.progress_percentage = 25.0;
  let other = roadmap_for("bob", "Data Engineer");
  for roadmap in [older.clone(), newer.clone(), other] {
    Add::roadmap(roadmap).execute(&mut db).await.unwrap();
  }

  let all = Query::for_user("alice").execute(&mut db).await.unwrap();
  assert_eq!(all.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec![
    newer.id.as_str(),
    older.id.as_str()
  ]);

  let latest = Query::latest_for_user("alice").execute(&mut db).await.unwrap();
  assert_eq!(latest.len(), 1);
  assert_eq!(latest[0].id, newer.id);

  let searched = Query::for_user("alice")
    .with_filter(RoadmapFilter::default().search("ml"))
    .execute(&mut db)
    .await
    .unwrap();
  assert_eq!(searched.len(), 1);
  assert_eq!(searched[0].id, newer.id);

  let by_skill = Query::for_user("alice")
    .with_filter(RoadmapFilter::default().search("SQL"))
    .execute(&mut db)
    .await
    .unwrap();
  assert_eq!(by_skill.len(), 2);

  let finished = Query::for_user("alice")
    .with_filter(RoadmapFilter::default().status(ProgressStatus::Completed))
    .execute(&mut db)
    .await
    .unwrap();
  assert_eq!(finished.len(), 1);
  assert_eq!(finished[0].id, older.id);

  let by_progress = Query::for_user("alice")
    .with_filter(RoadmapFilter::default().sort(RoadmapSort::Progress))
    .execute(&mut db)
    .await
    .unwrap();
  assert_eq!(by_progress[0].id, newer.id);
}

#[tokio::test]
async fn test_template_queries() {
  let mut db = Database::open_in_memory().await.unwrap();
  let mut backend = roadmap_for("admin", "Backend Engineer");
  backend.is_template = true;
  backend.category = Some("backend".into());
  let mut data = roadmap_for("admin", "Data Engineer");
  data.is_template = true;
  data.category = Some("data".into());
  let personal = roadmap_for("admin", "Staff Engineer");
  for roadmap in [backend.clone(), data, personal] {
    Add::roadmap(roadmap).execute(&mut db).await.unwrap();
  }

  assert_eq!(Query::templates(None).execute(&mut db).await.unwrap().len(), 2);
  let backend_only = Query::templates(Some("backend")).execute(&mut db).await.unwrap();
  assert_eq!(backend_only.len(), 1);
  assert_eq!(backend_only[0].id, backend.id);
}

#[test]
fn test_filter_parsing() {
  assert_eq!("in-progress".parse::<ProgressStatus>().unwrap(), ProgressStatus::InProgress);
  assert_eq!("target_role".parse::<RoadmapSort>().unwrap(), RoadmapSort::TargetRole);
  assert!("soon".parse::<ProgressStatus>().is_err());
  assert!(ProgressStatus::NotStarted.matches(0.0));
  assert!(!ProgressStatus::InProgress.matches(100.0));
}
