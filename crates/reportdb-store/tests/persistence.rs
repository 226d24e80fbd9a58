//! File-backed drivers keep their schema version across reopening.

use reportdb_core::io::{V4, V5};
use reportdb_core::{latest, Driver, Version};
use reportdb_store::Registry;

#[tokio::test]
async fn sqlite_version_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports.db");
    let path = path.to_str().unwrap();
    let registry = Registry::builtin();

    {
        let driver = registry.make("sqlite", Some(path)).unwrap();
        driver.init(Version::new(4, 0)).await.unwrap();
        driver.upgrade(Version::new(4, 1)).await.unwrap();
    }

    let driver = registry.make("sqlite", Some(path)).unwrap();
    assert!(driver.is_initialized().await.unwrap());
    assert_eq!(driver.get_schema().await.unwrap(), (Version::new(4, 1), V4));

    let schemas = driver.get_schemas().await.unwrap();
    assert_eq!(latest(&schemas), Some((Version::new(5, 0), V5)));
    driver.upgrade(Version::new(5, 0)).await.unwrap();
    assert_eq!(driver.get_schema().await.unwrap().1, V5);
}

#[tokio::test]
async fn json_version_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports.json");
    let path = path.to_str().unwrap();
    let registry = Registry::builtin();

    registry
        .make("json", Some(path))
        .unwrap()
        .init(Version::new(2, 1))
        .await
        .unwrap();

    let driver = registry.make("json", Some(path)).unwrap();
    assert_eq!(driver.get_schema().await.unwrap(), (Version::new(2, 1), V4));
}

#[tokio::test]
async fn histories_are_monotonic() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("h.json");
    let registry = Registry::builtin();

    let drivers = vec![
        registry.make("null", None).unwrap(),
        registry.make("sqlite", None).unwrap(),
        registry.make("json", json_path.to_str()).unwrap(),
    ];

    for driver in drivers {
        let schemas = driver.get_schemas().await.unwrap();
        assert!(!schemas.is_empty());
        let ios: Vec<_> = schemas.values().copied().collect();
        assert!(ios.windows(2).all(|w| w[0] <= w[1]));
    }
}
