use sharehub_core::db::{bootstrap_shared, shared, with_shared_connection};
use sharehub_core::{
    AppConfig, ContentService, ContentType, DbError, NewContent, RepoError, SettingsService,
    SqliteContentRepository, SqliteSettingsRepository,
};

// One test owns the process-wide handle for this binary.
#[test]
fn shared_handle_lifecycle() {
    assert!(matches!(shared(), Err(DbError::ConnectionNotInitialized)));
    let before = with_shared_connection(|conn| {
        SettingsService::new(SqliteSettingsRepository::try_new(conn)?).get()
    });
    assert!(matches!(
        before,
        Err(RepoError::Db(DbError::ConnectionNotInitialized))
    ));

    // A directory cannot be opened as a database file.
    let dir = tempfile::tempdir().unwrap();
    let unusable = AppConfig {
        database_url: dir.path().to_str().unwrap().to_string(),
        ..AppConfig::in_memory()
    };
    assert!(!bootstrap_shared(&unusable));
    assert!(matches!(shared(), Err(DbError::ConnectionNotInitialized)));

    assert!(bootstrap_shared(&AppConfig::in_memory()));
    assert!(shared().is_ok());
    assert!(bootstrap_shared(&AppConfig::in_memory()));

    let created = with_shared_connection(|conn| {
        ContentService::new(SqliteContentRepository::try_new(conn)?).create(&NewContent::new(
            "Shared",
            ContentType::StoryBook,
            "https://x/shared.json",
        ))
    })
    .unwrap();

    let listed = with_shared_connection(|conn| {
        ContentService::new(SqliteContentRepository::try_new(conn)?).list(None)
    })
    .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].uuid, created.uuid);

    let settings = with_shared_connection(|conn| {
        SettingsService::new(SqliteSettingsRepository::try_new(conn)?).get()
    })
    .unwrap();
    assert!(settings.is_some());
}
