/*!
 * End-to-end image migration against a SQLite CMS database
 */

use anyhow::Result;
use cms_migrate::app_config::Config;
use cms_migrate::errors::MigrationError;
use cms_migrate::ContentImageRewriter;
use crate::common;

#[test]
fn test_imageMigration_withDefaultTables_shouldRewriteAllContent() -> Result<()> {
    common::init_logging();
    let repo = common::create_cms_repository()?;
    let tables = Config::default().image_migration.content_tables;
    repo.verify_image_migration(&tables)?;

    let report = ContentImageRewriter::new(&repo, &repo, tables).run()?;

    assert_eq!(report.rows_scanned, 4);
    assert_eq!(report.rows_updated, 4);
    assert_eq!(report.tags_rewritten, 4);
    assert_eq!(report.unresolved, vec!["/assets/Uploads/missing.gif".to_string()]);

    let expected_home = r#"<p>Welcome</p>[image src="/assets/Uploads/f92c6af6c8/photo.png" width="100" height="50" alt="A photo" id="134"]"#;
    assert_eq!(common::read_content(&repo, "SiteTree", 1)?, expected_home);
    assert_eq!(common::read_content(&repo, "SiteTree_Live", 1)?, expected_home);

    assert_eq!(
        common::read_content(&repo, "SiteTree", 3)?,
        r#"<img class="leftAlone" src="/assets/Uploads/missing.gif">[image src="/assets/Uploads/_resampled/banner.jpg" title="Banner" id="135"]"#
    );
    assert_eq!(
        common::read_content(&repo, "SiteTree_Versions", 10)?,
        r#"[image src="/assets/Uploads/0123456789/banner.jpg" id="135"]"#
    );
    Ok(())
}

#[test]
fn test_imageMigration_shouldLeaveRowsWithoutImagesAlone() -> Result<()> {
    let repo = common::create_cms_repository()?;

    ContentImageRewriter::new(&repo, &repo, vec!["SiteTree".to_string()]).run()?;

    assert_eq!(common::read_content(&repo, "SiteTree", 2)?, "<p>No pictures</p>");
    Ok(())
}

#[test]
fn test_imageMigration_rerun_shouldOnlyRevisitUnresolvedRows() -> Result<()> {
    let repo = common::create_cms_repository()?;
    let rewriter = ContentImageRewriter::new(&repo, &repo, vec!["SiteTree".to_string()]);

    rewriter.run()?;
    let second = rewriter.run()?;

    // Only the row still holding the unresolved tag matches again
    assert_eq!(second.rows_scanned, 1);
    assert_eq!(second.tags_rewritten, 0);
    assert_eq!(second.unresolved.len(), 1);
    Ok(())
}

#[test]
fn test_imageMigration_withDryRun_shouldNotTouchDatabase() -> Result<()> {
    let repo = common::create_cms_repository()?;
    let before = common::read_content(&repo, "SiteTree", 1)?;

    let report = ContentImageRewriter::new(&repo, &repo, vec!["SiteTree".to_string()])
        .dry_run(true)
        .run()?;

    assert_eq!(report.rows_updated, 0);
    assert_eq!(common::read_content(&repo, "SiteTree", 1)?, before);
    Ok(())
}

#[test]
fn test_imageMigration_withMissingTable_shouldFailPreflight() -> Result<()> {
    let repo = common::create_cms_repository()?;

    let err = repo
        .verify_image_migration(&["Page_Live".to_string()])
        .unwrap_err();

    assert!(matches!(err, MigrationError::MissingTable(table) if table == "Page_Live"));
    Ok(())
}
