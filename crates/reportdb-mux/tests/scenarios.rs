//! Composite histories of dummy driver mixes, and upgrading through them.

use reportdb_core::io::{V2, V3, V4, V5};
use reportdb_core::{Driver, Error, Version};
use reportdb_mux::{MuxDriver, Numbering};
use reportdb_testkit::{all_vectors, dummy_registry, upgrade_through_all, TestFixture};

#[tokio::test]
async fn golden_histories() {
    let registry = dummy_registry();

    for vector in all_vectors() {
        let mux = MuxDriver::open(vector.config, &registry).await.unwrap();

        assert!(mux.is_initialized().await.unwrap(), "{}", vector.name);
        assert_eq!(mux.get_schemas().await.unwrap(), vector.expected(), "{}", vector.name);
        assert_eq!(mux.get_schema().await.unwrap(), (Version::ZERO, vector.expected()[&Version::ZERO]));
    }
}

#[tokio::test]
async fn golden_upgrade_loops() {
    let registry = dummy_registry();

    for vector in all_vectors() {
        let mux = MuxDriver::open(vector.config, &registry).await.unwrap();
        let passed = upgrade_through_all(&mux).await.unwrap();

        assert_eq!(passed.len() + 1, vector.history.len(), "{}", vector.name);
        assert_eq!(mux.get_schema().await.unwrap().0, vector.last(), "{}", vector.name);
        // Numbering does not shift as sub-drivers move
        assert_eq!(mux.get_schemas().await.unwrap(), vector.expected(), "{}", vector.name);
    }
}

#[tokio::test]
async fn three_way_tie_goes_in_configuration_order() {
    let entry = "dummy:1:2:1:1:0:0:2";
    let config = format!("{} {} {}", entry, entry, entry);
    let mux = MuxDriver::open(&config, &dummy_registry()).await.unwrap();

    let advanced: Vec<_> = mux.composer().walk().map(|step| step.advanced).collect();
    assert_eq!(
        advanced,
        vec![
            None,
            Some(0),
            Some(0),
            Some(1),
            Some(1),
            Some(2),
            Some(2),
            Some(0),
            Some(1),
            Some(2),
        ]
    );

    // Minor-only steps of different drivers keep counting minors
    let versions: Vec<_> = mux.get_schemas().await.unwrap().into_keys().collect();
    assert_eq!(
        &versions[6..],
        &[
            Version::new(3, 0),
            Version::new(3, 1),
            Version::new(3, 2),
            Version::new(3, 3),
        ]
    );

    mux.upgrade(Version::new(3, 2)).await.unwrap();
    assert_eq!(mux.get_schema().await.unwrap(), (Version::new(3, 2), V2));
}

#[tokio::test]
async fn skipping_upgrade_lands_on_target() {
    let mux = MuxDriver::open("dummy dummy", &dummy_registry()).await.unwrap();

    mux.upgrade(Version::new(5, 0)).await.unwrap();
    assert_eq!(mux.get_schema().await.unwrap(), (Version::new(5, 0), V3));

    mux.upgrade(Version::new(8, 0)).await.unwrap();
    assert_eq!(mux.get_schema().await.unwrap(), (Version::new(8, 0), V5));
}

#[tokio::test]
async fn bad_upgrade_targets() {
    let mux = MuxDriver::open("dummy:1:5:1:1:0:0:2 dummy", &dummy_registry())
        .await
        .unwrap();
    mux.upgrade(Version::new(2, 0)).await.unwrap();

    assert!(matches!(
        mux.upgrade(Version::new(2, 0)).await,
        Err(Error::Regression { .. })
    ));
    assert!(matches!(
        mux.upgrade(Version::new(1, 0)).await,
        Err(Error::Regression { .. })
    ));
    // Older and unknown: the regression wins
    assert!(matches!(
        mux.upgrade(Version::new(1, 7)).await,
        Err(Error::Regression { .. })
    ));
    assert!(matches!(
        mux.upgrade(Version::new(3, 5)).await,
        Err(Error::InvalidTarget(_))
    ));
    assert!(matches!(
        mux.upgrade(Version::new(99, 0)).await,
        Err(Error::InvalidTarget(_))
    ));
    assert_eq!(mux.get_schema().await.unwrap().0, Version::new(2, 0));
}

#[tokio::test]
async fn invalid_dummy_params_fail_configuration() {
    let registry = dummy_registry();
    for config in [
        "dummy:3:1",
        "dummy dummy:1:5:1:2:1",
        "dummy:x",
        "",
        "dummy:1:5:1:4000000000",
    ] {
        assert!(
            matches!(MuxDriver::open(config, &registry).await, Err(Error::Configuration(_))),
            "accepted {:?}",
            config
        );
    }
}

#[tokio::test]
async fn major_only_numbering() {
    let config = "dummy:1:5:1:1:0:0:2 dummy"
        .parse::<reportdb_mux::MuxConfig>()
        .unwrap()
        .with_numbering(Numbering::MajorOnly);
    let mux = MuxDriver::connect(&config, &dummy_registry()).await.unwrap();

    let versions: Vec<_> = mux.get_schemas().await.unwrap().into_keys().collect();
    assert_eq!(versions.len(), 14);
    assert!(versions.iter().all(|v| v.minor == 0));
    assert_eq!(versions.last(), Some(&Version::new(13, 0)));
}

#[tokio::test]
async fn mux_reopened_mid_history_renumbers_from_zero() {
    let registry = dummy_registry();
    // Same drivers as "dummy:1:3 dummy:1:3" after three upgrades
    let mux = MuxDriver::open("dummy:1:3:1:1:2 dummy:1:3:1:1:1", &registry)
        .await
        .unwrap();

    let schemas: Vec<_> = mux.get_schemas().await.unwrap().into_iter().collect();
    assert_eq!(
        schemas,
        vec![(Version::new(0, 0), V2), (Version::new(1, 0), V3)]
    );
}

#[tokio::test]
async fn file_backed_drivers_together() {
    let fixture = TestFixture::new().unwrap();
    let config = format!(
        "{} {} null",
        fixture.sqlite_entry("reports.db"),
        fixture.json_entry("reports.json")
    );

    let mux = MuxDriver::open(&config, &fixture.registry).await.unwrap();
    assert!(!mux.is_initialized().await.unwrap());

    // sqlite: 4.0 V4, 4.1 V4, 5.0 V5; json: 1.0 V3, 2.0 V4, 2.1 V4, 3.0 V5
    let schemas: Vec<_> = mux.get_schemas().await.unwrap().into_iter().collect();
    assert_eq!(
        schemas,
        vec![
            (Version::new(0, 0), V3),
            (Version::new(1, 0), V4),
            (Version::new(1, 1), V4),
            (Version::new(2, 0), V4),
            (Version::new(2, 1), V4),
            (Version::new(3, 0), V5),
        ]
    );

    mux.init(Version::ZERO).await.unwrap();
    assert_eq!(mux.get_schema().await.unwrap(), (Version::ZERO, V3));

    upgrade_through_all(&mux).await.unwrap();
    assert_eq!(mux.get_schema().await.unwrap(), (Version::new(3, 0), V5));
    drop(mux);

    // The sub-drivers kept their versions; a new mux starts its numbering there
    let mux = MuxDriver::open(&config, &fixture.registry).await.unwrap();
    assert!(mux.is_initialized().await.unwrap());
    assert_eq!(mux.get_schema().await.unwrap(), (Version::ZERO, V5));
    assert_eq!(mux.get_schemas().await.unwrap().len(), 1);
}

#[tokio::test]
async fn init_checks_initialized_sub_drivers() {
    let fixture = TestFixture::new().unwrap();
    let config = format!("{} dummy:4:5", fixture.sqlite_entry("reports.db"));
    let mux = MuxDriver::open(&config, &fixture.registry).await.unwrap();

    // sqlite 4.0 -> 4.1 -> 5.0, then dummy 0.0 -> 1.0 at 2.0
    assert_eq!(mux.get_schemas().await.unwrap().len(), 4);

    // dummy is already initialized at 0.0, not where 2.0 puts it
    assert!(matches!(
        mux.init(Version::new(2, 0)).await,
        Err(Error::InvalidTarget(_))
    ));
    assert!(!mux.is_initialized().await.unwrap());

    mux.init(Version::new(0, 1)).await.unwrap();
    assert_eq!(mux.get_schema().await.unwrap(), (Version::new(0, 1), V4));
    assert!(matches!(
        mux.init(Version::ZERO).await,
        Err(Error::AlreadyInitialized)
    ));
}
