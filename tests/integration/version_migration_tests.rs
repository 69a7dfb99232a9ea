/*!
 * End-to-end version publishing against a SQLite CMS database
 */

use anyhow::Result;
use cms_migrate::app_config::Config;
use cms_migrate::errors::MigrationError;
use cms_migrate::store::VersionedStore;
use cms_migrate::VersionPublisher;
use crate::common;

#[test]
fn test_versionMigration_withDefaultTypes_shouldPublishDraftOnlyRecords() -> Result<()> {
    common::init_logging();
    let repo = common::create_cms_repository()?;
    let record_types = Config::default().version_migration.record_types;
    repo.verify_version_migration(&record_types)?;

    let report = VersionPublisher::new(&repo, record_types).run()?;

    let published: Vec<_> = report
        .published
        .iter()
        .map(|record| (record.record_type.as_str(), record.id))
        .collect();
    assert_eq!(
        published,
        vec![("CarouselItem", 2), ("WidgetArea", 5), ("Widget", 7)]
    );
    assert_eq!(report.skipped, 1);
    assert_eq!(
        report.published[0].class_name,
        "CWP\\AgencyExtensions\\Model\\CarouselItem"
    );

    assert!(repo.has_live_version("CarouselItem", 2)?);
    assert!(repo.has_live_version("WidgetArea", 5)?);
    assert!(repo.has_live_version("Widget", 7)?);
    Ok(())
}

#[test]
fn test_versionMigration_shouldCopyDraftFieldsToLive() -> Result<()> {
    let repo = common::create_cms_repository()?;

    VersionPublisher::new(&repo, vec!["Widget".to_string()]).run()?;

    let (version, parent_id): (i64, i64) = repo.connection().execute(|conn| {
        Ok(conn.query_row(
            "SELECT Version, ParentID FROM Widget_Live WHERE ID = 7",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?)
    })?;
    assert_eq!(version, 1);
    assert_eq!(parent_id, 5);

    let history: Vec<(i64, i64)> = repo.connection().execute(|conn| {
        let mut stmt = conn
            .prepare("SELECT Version, WasPublished FROM Widget_Versions WHERE RecordID = 7")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })?;
    assert_eq!(history, vec![(1, 1)]);
    Ok(())
}

#[test]
fn test_versionMigration_rerun_shouldPublishNothing() -> Result<()> {
    let repo = common::create_cms_repository()?;
    let publisher = VersionPublisher::new(&repo, Config::default().version_migration.record_types);

    let first = publisher.run()?;
    let second = publisher.run()?;

    assert_eq!(first.published.len(), 3);
    assert!(second.published.is_empty());
    assert_eq!(second.skipped, 4);
    Ok(())
}

#[test]
fn test_versionMigration_withUnversionedType_shouldFailPreflight() -> Result<()> {
    let repo = common::create_cms_repository()?;

    let err = repo
        .verify_version_migration(&["SiteTree".to_string()])
        .unwrap_err();

    assert!(matches!(err, MigrationError::MissingColumn { .. }));
    Ok(())
}
