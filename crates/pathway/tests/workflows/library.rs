use super::*;

#[tokio::test]
async fn test_publish_and_clone_template() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;
  let roadmap = pathway
    .create_roadmap(skeleton(&[&[1.0], &[2.0]]), InitializeOptions::new("mentor", "Backend", 2))
    .await?;
  let (m0, r0) = ids(&roadmap, 0, 0);
  pathway.complete_resource(&roadmap.id, &m0, &r0).await?;

  assert!(pathway.templates(None).await?.is_empty());
  let template = pathway.publish_template(&roadmap.id, Some("backend".into())).await?;
  assert!(template.is_template && template.is_public);
  assert_eq!(pathway.templates(Some("backend")).await?.len(), 1);
  assert!(pathway.templates(Some("data")).await?.is_empty());

  let copy = pathway.clone_template(&template.id, "learner").await?;
  assert_ne!(copy.id, template.id);
  assert_eq!(copy.user_id, "learner");
  assert!(!copy.is_template);
  assert_eq!(copy.version, 0);
  assert_eq!(copy.progress_percentage, 0.0);
  assert_eq!(copy.modules[0].resources[0].status, ResourceStatus::Unlocked);
  assert!(copy.modules.iter().all(|m| !m.is_completed && m.completion_summary.is_none()));
  assert_ne!(copy.modules[0].id, template.modules[0].id);

  // The template itself is untouched
  let stored = pathway.roadmap(&template.id).await?;
  assert_eq!(stored.modules[0].resources[0].status, ResourceStatus::Completed);
  Ok(())
}

#[tokio::test]
async fn test_clone_requires_a_template() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;
  let roadmap = pathway
    .create_roadmap(skeleton(&[&[1.0]]), InitializeOptions::new("mentor", "Backend", 1))
    .await?;

  assert!(matches!(
    pathway.clone_template(&roadmap.id, "learner").await,
    Err(PathwayError::NotFound(Entity::Template(_)))
  ));
  assert!(matches!(
    pathway.clone_template("missing", "learner").await,
    Err(PathwayError::NotFound(Entity::Template(_)))
  ));

  pathway.publish_template(&roadmap.id, None).await?;
  assert!(matches!(
    pathway.clone_template(&roadmap.id, " ").await,
    Err(PathwayError::InvalidInput(_))
  ));
  Ok(())
}

#[tokio::test]
async fn test_listing_with_filters() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) = create_test_pathway().await;
  let finished = pathway
    .create_roadmap(skeleton(&[&[1.0]]), InitializeOptions::new("alice", "Data Engineer", 1))
    .await?;
  pathway
    .create_roadmap(skeleton(&[&[1.0]]), InitializeOptions::new("alice", "ML Engineer", 1))
    .await?;
  let (m0, r0) = ids(&finished, 0, 0);
  pathway.complete_resource(&finished.id, &m0, &r0).await?;

  let done = pathway
    .roadmaps("alice", RoadmapFilter::default().status("completed".parse()?))
    .await?;
  assert_eq!(done.len(), 1);
  assert_eq!(done[0].id, finished.id);

  let by_role = pathway
    .roadmaps("alice", RoadmapFilter::default().sort("target_role".parse()?))
    .await?;
  assert_eq!(by_role[0].target_role, "Data Engineer");

  let by_skill = pathway.roadmaps("alice", RoadmapFilter::default().search("SKILL-0")).await?;
  assert_eq!(by_skill.len(), 2);
  assert!(pathway.roadmaps("bob", RoadmapFilter::default()).await?.is_empty());
  Ok(())
}
