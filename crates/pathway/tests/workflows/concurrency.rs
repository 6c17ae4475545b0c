use super::*;

#[traced_test]
#[tokio::test]
async fn test_stale_copy_loses_the_race() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;
  let roadmap = pathway
    .create_roadmap(skeleton(&[&[1.0, 1.0]]), InitializeOptions::new("alice", "SRE", 1))
    .await?;
  let (m0, r0) = ids(&roadmap, 0, 0);

  // Another writer read the roadmap before this action landed
  let stale = pathway.roadmap(&roadmap.id).await?;
  pathway.complete_resource(&roadmap.id, &m0, &r0).await?;

  let mut edited = stale.clone();
  edited.target_role = "Site Reliability Engineer".into();
  match Update::roadmap(&edited).execute(&mut pathway.database).await {
    Err(PathwayError::ConcurrencyConflict { id, expected }) => {
      assert_eq!(id, roadmap.id);
      assert_eq!(expected, stale.version);
    },
    other => panic!("expected a conflict, got {other:?}"),
  }

  let stored = pathway.roadmap(&roadmap.id).await?;
  assert_eq!(stored.target_role, "SRE");
  assert_eq!(stored.modules[0].resources[0].status, ResourceStatus::Completed);
  Ok(())
}

#[tokio::test]
async fn test_two_handles_share_one_store() -> TestResult<()> {
  let (mut first, config_dir, _db_dir) = create_test_pathway().await;
  let roadmap = first
    .create_roadmap(skeleton(&[&[1.0, 1.0]]), InitializeOptions::new("alice", "SRE", 1))
    .await?;
  let (m0, r0) = ids(&roadmap, 0, 0);
  let (_, r1) = ids(&roadmap, 0, 1);

  let mut second = Pathway::builder()
    .with_path(config_dir.path())
    .with_generator(StaticGenerator(GeneratedRoadmap::default()))
    .with_summarizer(CountingSummarizer::default())
    .build()
    .await?;

  first.complete_resource(&roadmap.id, &m0, &r0).await?;
  second.complete_resource(&roadmap.id, &m0, &r1).await?;

  let stored = first.roadmap(&roadmap.id).await?;
  assert_eq!(stored.progress_percentage, 100.0);
  assert!(stored.modules[0].is_completed);
  Ok(())
}

#[tokio::test]
async fn test_deleted_roadmap_refuses_progress() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;
  let roadmap = pathway
    .create_roadmap(skeleton(&[&[1.0]]), InitializeOptions::new("alice", "SRE", 1))
    .await?;
  let (m0, r0) = ids(&roadmap, 0, 0);

  pathway.delete_roadmap(&roadmap.id, DeleteMode::Soft).await?;
  assert!(matches!(
    pathway.complete_resource(&roadmap.id, &m0, &r0).await,
    Err(PathwayError::NotFound(Entity::Roadmap(_)))
  ));
  assert!(pathway.roadmaps("alice", RoadmapFilter::default()).await?.is_empty());

  // Soft-deleted rows can still be purged, then nothing is left to delete
  pathway.delete_roadmap(&roadmap.id, DeleteMode::Hard).await?;
  assert!(matches!(
    pathway.delete_roadmap(&roadmap.id, DeleteMode::Hard).await,
    Err(PathwayError::NotFound(_))
  ));
  Ok(())
}
