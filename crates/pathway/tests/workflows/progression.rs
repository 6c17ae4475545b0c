use super::*;

async fn single_week_roadmap(pathway: &mut Pathway) -> Roadmap {
  pathway
    .create_roadmap(
      skeleton(&[&[1.0, 1.0], &[2.0]]),
      InitializeOptions::new("alice", "Data Engineer", 1),
    )
    .await
    .unwrap()
}

#[traced_test]
#[tokio::test]
async fn test_full_progression() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;
  let roadmap = single_week_roadmap(&mut pathway).await;
  assert_eq!(roadmap.modules[0].resources[0].status, ResourceStatus::Unlocked);
  assert_eq!(roadmap.modules[1].resources[0].status, ResourceStatus::Locked);

  let (m0, r0) = ids(&roadmap, 0, 0);
  let (_, r1) = ids(&roadmap, 0, 1);
  let (m1, r2) = ids(&roadmap, 1, 0);

  let opened = pathway.open_resource(&roadmap.id, &m0, &r0).await?;
  assert_eq!(opened.status, ResourceStatus::InProgress);

  let finished = pathway.complete_resource(&roadmap.id, &m0, &r0).await?;
  assert!(finished.is_empty());
  let stored = pathway.roadmap(&roadmap.id).await?;
  assert_eq!(stored.modules[0].resources[1].status, ResourceStatus::Unlocked);
  assert_eq!(stored.version, 2);

  let finished = pathway.skip_resource(&roadmap.id, &m0, &r1).await?;
  assert_eq!(finished.len(), 1);
  assert_eq!(finished[0].module_id, m0);
  assert_eq!(
    finished[0].summary.as_deref(),
    Some("Finished Module 0 with 1 completed and 1 skipped")
  );

  let stored = pathway.roadmap(&roadmap.id).await?;
  assert!(stored.modules[0].is_completed);
  assert!(stored.modules[0].summary_generated_at.is_some());
  assert_eq!(stored.modules[1].resources[0].status, ResourceStatus::Unlocked);
  assert_eq!(stored.current_module_index, 1);
  assert!((stored.progress_percentage - 66.67).abs() < 1e-9);

  // Two hours estimated, so the threshold is 6480 seconds
  let update = pathway.update_time(&roadmap.id, &m1, &r2, 6479).await?;
  assert!(!update.auto_completed);
  let update = pathway.update_time(&roadmap.id, &m1, &r2, 6480).await?;
  assert!(update.auto_completed);
  assert_eq!(update.newly_completed, vec![m1.clone()]);

  let stored = pathway.roadmap(&roadmap.id).await?;
  assert_eq!(stored.progress_percentage, 100.0);
  assert!(stored.modules.iter().all(|m| m.is_completed));
  assert!(stored.modules[1].completion_summary.is_some());
  Ok(())
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;
  let roadmap = single_week_roadmap(&mut pathway).await;
  let (m0, r0) = ids(&roadmap, 0, 0);

  assert!(matches!(
    pathway.complete_resource("missing", &m0, &r0).await,
    Err(PathwayError::NotFound(Entity::Roadmap(_)))
  ));
  assert!(matches!(
    pathway.complete_resource(&roadmap.id, "missing", &r0).await,
    Err(PathwayError::NotFound(Entity::Module(_)))
  ));
  assert!(matches!(
    pathway.skip_resource(&roadmap.id, &m0, "missing").await,
    Err(PathwayError::NotFound(Entity::Resource(_)))
  ));

  // Failed actions never reach the store
  assert_eq!(pathway.roadmap(&roadmap.id).await?.version, 0);
  Ok(())
}

#[tokio::test]
async fn test_negative_time_is_rejected() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;
  let roadmap = single_week_roadmap(&mut pathway).await;
  let (m0, r0) = ids(&roadmap, 0, 0);

  assert!(matches!(
    pathway.update_time(&roadmap.id, &m0, &r0, -1).await,
    Err(PathwayError::InvalidInput(_))
  ));
  Ok(())
}

#[tokio::test]
async fn test_rating_requires_ownership() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;
  let roadmap = single_week_roadmap(&mut pathway).await;
  let url = roadmap.modules[0].resources[1].url.clone();

  assert!(matches!(
    pathway.rate_resource(&roadmap.id, "mallory", &url, 5, None).await,
    Err(PathwayError::NotFound(Entity::Roadmap(_)))
  ));

  let first = pathway.rate_resource(&roadmap.id, "alice", &url, 4, Some("solid".into())).await?;
  assert_eq!(first.total_ratings, 1);
  assert_eq!(first.average_rating, 4.0);

  let again = pathway.rate_resource(&roadmap.id, "alice", &url, 2, None).await?;
  assert_eq!(again.total_ratings, 1);
  assert_eq!(again.average_rating, 2.0);
  assert_eq!(again.resource_title, "Resource 0.1");

  assert!(matches!(
    pathway.rate_resource(&roadmap.id, "alice", &url, 6, None).await,
    Err(PathwayError::InvalidInput(_))
  ));
  assert!(matches!(
    pathway.rate_resource(&roadmap.id, "alice", "https://nowhere.example.com", 3, None).await,
    Err(PathwayError::NotFound(Entity::ResourceUrl(_)))
  ));
  Ok(())
}

#[tokio::test]
async fn test_weeks_overview_uses_latest_roadmap() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;
  assert!(matches!(
    pathway.weeks_overview("alice").await,
    Err(PathwayError::NotFound(Entity::UserRoadmap(_)))
  ));

  let older = pathway
    .create_roadmap(
      skeleton(&[&[1.0]]),
      InitializeOptions::new("alice", "Analyst", 1).at(chrono::Utc::now() - chrono::Duration::days(3)),
    )
    .await?;
  let newer = pathway
    .create_roadmap(
      skeleton(&[&[1.0], &[1.0], &[3.0]]),
      InitializeOptions::new("alice", "Data Engineer", 3),
    )
    .await?;
  assert_ne!(older.id, newer.id);

  let overview = pathway.weeks_overview("alice").await?;
  assert_eq!(overview.target_role, "Data Engineer");
  assert_eq!(overview.total_weeks, 3);
  assert_eq!(overview.weeks[2].total_hours, 3.0);
  assert_eq!(overview.weeks[0].modules[0].resources_count, 1);
  Ok(())
}

#[tokio::test]
async fn test_generate_roadmap_with_generator() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;
  let request = GenerationRequest {
    skill_gaps:     Vec::new(),
    target_role:    "Platform Engineer".into(),
    hours_per_week: 5,
    weeks:          4,
    difficulty:     Default::default(),
  };

  let roadmap = pathway.generate_roadmap(request.clone(), "alice").await?;
  assert_eq!(roadmap.target_role, "Platform Engineer");
  assert_eq!(roadmap.modules.len(), 2);
  assert_eq!(pathway.roadmaps("alice", RoadmapFilter::default()).await?.len(), 1);

  let zero_weeks = GenerationRequest { weeks: 0, ..request };
  assert!(matches!(
    pathway.generate_roadmap(zero_weeks, "alice").await,
    Err(PathwayError::InvalidInput(_))
  ));
  Ok(())
}

#[tokio::test]
async fn test_empty_generation_stores_nothing() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) =
    create_test_pathway_with(CountingSummarizer::default(), GeneratedRoadmap::default()).await;
  let request = GenerationRequest {
    skill_gaps:     Vec::new(),
    target_role:    "Platform Engineer".into(),
    hours_per_week: 5,
    weeks:          4,
    difficulty:     Default::default(),
  };

  assert!(matches!(
    pathway.generate_roadmap(request, "alice").await,
    Err(PathwayError::UpstreamGeneration(_))
  ));
  assert!(pathway.roadmaps("alice", RoadmapFilter::default()).await?.is_empty());
  Ok(())
}

#[tokio::test]
async fn test_analytics_follow_progress() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;

  let empty = pathway.analytics("alice").await?;
  assert_eq!(empty.learning_streak, 0);
  assert_eq!(empty.completion_rate, 0.0);
  assert!(empty.daily_activity.is_empty());

  let options = InitializeOptions::new("alice", "SRE", 1);
  let roadmap = pathway.create_roadmap(skeleton(&[&[1.0, 1.0], &[2.0]]), options).await?;
  let (m0, r0) = ids(&roadmap, 0, 0);
  let (_, r1) = ids(&roadmap, 0, 1);
  pathway.update_time(&roadmap.id, &m0, &r0, 3600).await?;
  pathway.skip_resource(&roadmap.id, &m0, &r1).await?;

  let analytics = pathway.analytics("alice").await?;
  assert_eq!(analytics.total_resources_completed, 1);
  assert_eq!(analytics.total_resources_skipped, 1);
  assert_eq!(analytics.total_modules_completed, 1);
  assert_eq!(analytics.total_time_spent_seconds, 3600);
  assert_eq!(analytics.completion_rate, 50.0);
  assert_eq!(analytics.average_progress, 66.7);
  assert_eq!(analytics.learning_streak, 1);
  assert_eq!(analytics.weekly_summary.resources, 1);

  // Other users and deleted roadmaps do not count
  assert_eq!(pathway.analytics("bob").await?.total_resources_completed, 0);
  pathway.delete_roadmap(&roadmap.id, DeleteMode::Soft).await?;
  assert_eq!(pathway.analytics("alice").await?.total_resources_completed, 0);
  Ok(())
}
