//! Opening, initializing and upgrading databases through the client.

use reportdb::core::io::{V3, V4, V5};
use reportdb::{Client, ClientError, Error, Version};
use reportdb_testkit::{dummy_registry, TestFixture};

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn json_database_lifecycle() -> anyhow::Result<()> {
    init_logging();
    let dir = tempfile::tempdir()?;
    let spec = format!("json:{}", dir.path().join("reports.json").display());

    let client = Client::open(&spec).await?;
    assert!(!client.is_initialized().await?);
    assert!(matches!(
        client.get_schema().await,
        Err(ClientError::Driver(Error::NotInitialized))
    ));

    client.init(Some(Version::new(1, 0))).await?;
    assert_eq!(client.get_schema().await?, (Version::new(1, 0), V3));

    assert_eq!(client.upgrade(Some(Version::new(2, 1))).await?, Version::new(2, 1));
    assert_eq!(client.upgrade(None).await?, Version::new(3, 0));
    assert_eq!(client.get_schema().await?.1, V5);
    Ok(())
}

#[tokio::test]
async fn mux_over_files_survives_reopen() -> anyhow::Result<()> {
    init_logging();
    let fixture = TestFixture::new()?;
    let spec = format!(
        "mux:{}\n{}",
        fixture.sqlite_entry("reports.db"),
        fixture.json_entry("reports.json")
    );

    {
        let client = Client::open_with(&spec, &fixture.registry).await?;
        client.init(Some(Version::ZERO)).await?;
        // json 1.0 -> 2.0, then sqlite 4.0 -> 4.1
        assert_eq!(client.upgrade(Some(Version::new(1, 1))).await?, Version::new(1, 1));
        assert_eq!(client.get_schema().await?, (Version::new(1, 1), V4));
    }

    // Reopened, the mux numbers from where the sub-drivers are now
    let client = Client::open_with(&spec, &fixture.registry).await?;
    assert_eq!(client.get_schema().await?, (Version::ZERO, V4));
    assert_eq!(client.upgrade(None).await?, Version::new(2, 0));
    assert_eq!(client.get_schema().await?.1, V5);
    Ok(())
}

#[tokio::test]
async fn mux_of_dummies_upgrades_to_latest() -> anyhow::Result<()> {
    init_logging();
    let client = Client::open_with("mux:dummy dummy:1:3", &dummy_registry()).await?;

    assert!(client.is_initialized().await?);
    assert!(matches!(
        client.init(None).await,
        Err(ClientError::Driver(Error::AlreadyInitialized))
    ));

    assert_eq!(client.upgrade(None).await?, Version::new(6, 0));
    assert_eq!(client.upgrade(None).await?, Version::new(6, 0));
    assert_eq!(client.get_schema().await?.1, V3);
    Ok(())
}
