use super::*;

#[traced_test]
#[tokio::test]
async fn test_stalled_summaries_do_not_block_progress() -> TestResult<()> {
  let (mut pathway, _config_dir, _db_dir) =
    create_test_pathway_with(StalledSummarizer, skeleton(&[&[1.0], &[1.0]])).await;
  let roadmap =
    pathway.create_roadmap(skeleton(&[&[1.0], &[1.0]]), InitializeOptions::new("alice", "QA", 1)).await?;
  let (m0, r0) = ids(&roadmap, 0, 0);

  let finished = pathway.complete_resource(&roadmap.id, &m0, &r0).await?;
  assert_eq!(finished.len(), 1);
  assert_eq!(finished[0].summary, None);

  let stored = pathway.roadmap(&roadmap.id).await?;
  assert!(stored.modules[0].is_completed);
  assert_eq!(stored.modules[0].completion_summary, None);
  assert_eq!(stored.modules[1].resources[0].status, ResourceStatus::Unlocked);
  Ok(())
}

#[tokio::test]
async fn test_module_summary_reuses_stored_text() -> TestResult<()> {
  let counter = CountingSummarizer::default();
  let calls = Arc::clone(&counter.0);
  let (mut pathway, _config_dir, _db_dir) =
    create_test_pathway_with(counter, skeleton(&[&[1.0], &[1.0]])).await;
  let roadmap =
    pathway.create_roadmap(skeleton(&[&[1.0], &[1.0]]), InitializeOptions::new("alice", "QA", 1)).await?;
  let (m0, r0) = ids(&roadmap, 0, 0);
  let (m1, _) = ids(&roadmap, 1, 0);

  pathway.complete_resource(&roadmap.id, &m0, &r0).await?;
  assert_eq!(calls.load(Ordering::SeqCst), 1);

  let report = pathway.module_summary(&roadmap.id, &m0).await?;
  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert_eq!(report.progress.resources_completed, 1);
  assert_eq!(report.next_module_title.as_deref(), Some("Module 1"));
  assert_eq!(report.ai_summary.as_deref(), Some("Finished Module 0 with 1 completed and 0 skipped"));

  // Unfinished modules are summarized live and nothing is written back
  let version = pathway.roadmap(&roadmap.id).await?.version;
  let report = pathway.module_summary(&roadmap.id, &m1).await?;
  assert_eq!(calls.load(Ordering::SeqCst), 2);
  assert_eq!(report.next_module_title, None);
  assert!(report.ai_summary.is_some());
  assert_eq!(pathway.roadmap(&roadmap.id).await?.version, version);

  assert!(matches!(
    pathway.module_summary(&roadmap.id, "missing").await,
    Err(PathwayError::NotFound(Entity::Module(_)))
  ));
  Ok(())
}

#[tokio::test]
async fn test_tracked_time_returns_module_summaries() -> TestResult<()> {
  let counter = CountingSummarizer::default();
  let calls = Arc::clone(&counter.0);
  let (mut pathway, _config_dir, _db_dir) =
    create_test_pathway_with(counter, skeleton(&[&[1.1], &[1.0]])).await;
  let roadmap =
    pathway.create_roadmap(skeleton(&[&[1.1], &[1.0]]), InitializeOptions::new("alice", "QA", 1)).await?;
  let (m0, r0) = ids(&roadmap, 0, 0);

  let update = pathway.update_time(&roadmap.id, &m0, &r0, 1800).await?;
  assert!(!update.auto_completed);
  assert!(update.completed_modules.is_empty());
  assert_eq!(calls.load(Ordering::SeqCst), 0);

  let update = pathway.update_time(&roadmap.id, &m0, &r0, 3564).await?;
  assert!(update.auto_completed);
  assert_eq!(update.newly_completed, vec![m0.clone()]);
  assert_eq!(update.completed_modules.len(), 1);
  assert_eq!(update.completed_modules[0].module_id, m0);
  assert_eq!(
    update.completed_modules[0].summary.as_deref(),
    Some("Finished Module 0 with 1 completed and 0 skipped")
  );

  let stored = pathway.roadmap(&roadmap.id).await?;
  assert_eq!(stored.modules[0].completion_summary, update.completed_modules[0].summary);
  Ok(())
}
