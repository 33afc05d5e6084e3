use rusqlite::Connection;
use sharehub_core::db::open_db_in_memory;
use sharehub_core::repo::access_logger::{count_for_content, list_for_content};
use sharehub_core::{
    AccessLogger, AppConfig, ContentService, ContentType, NewContent, SqliteContentRepository,
};

fn create_card(conn: &mut Connection) -> i64 {
    ContentService::new(SqliteContentRepository::try_new(conn).unwrap())
        .create(&NewContent::new(
            "Logged",
            ContentType::CharacterCard,
            "https://x/logged.png",
        ))
        .unwrap()
        .id
}

fn total_logs(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM access_logs;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn disabled_logger_returns_none_and_writes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let content_id = create_card(&mut conn);
    let logger = AccessLogger::new(false);

    assert!(!logger.is_enabled());
    assert_eq!(
        logger.log(&conn, content_id, "view", Some("127.0.0.1"), Some("test-agent")),
        None
    );
    assert_eq!(total_logs(&conn), 0);
}

#[test]
fn enabled_logger_appends_one_row_and_returns_its_id() {
    let mut conn = open_db_in_memory().unwrap();
    let content_id = create_card(&mut conn);
    let logger = AccessLogger::new(true);

    let first = logger
        .log(&conn, content_id, "view", Some("127.0.0.1"), Some("test-agent"))
        .unwrap();
    let second = logger.log(&conn, content_id, "download", None, None).unwrap();
    assert_ne!(first, second);
    assert_eq!(count_for_content(&conn, content_id).unwrap(), 2);

    let logs = list_for_content(&conn, content_id).unwrap();
    assert_eq!(logs.len(), 2);
    let view = logs.iter().find(|log| log.id == first).unwrap();
    assert_eq!(view.content_id, content_id);
    assert_eq!(view.access_type, "view");
    assert_eq!(view.ip_address.as_deref(), Some("127.0.0.1"));
    assert_eq!(view.user_agent.as_deref(), Some("test-agent"));
    let download = logs.iter().find(|log| log.id == second).unwrap();
    assert_eq!(download.ip_address, None);
    assert_eq!(download.user_agent, None);
}

#[test]
fn failures_are_swallowed_into_none() {
    let conn = open_db_in_memory().unwrap();
    let logger = AccessLogger::new(true);

    assert_eq!(logger.log(&conn, 12_345, "view", None, None), None);
    assert_eq!(total_logs(&conn), 0);
}

#[test]
fn logger_follows_configuration_flag() {
    let enabled = AppConfig {
        enable_access_log: true,
        ..AppConfig::in_memory()
    };
    assert!(AccessLogger::from_config(&enabled).is_enabled());
    assert!(!AccessLogger::from_config(&AppConfig::in_memory()).is_enabled());
}
