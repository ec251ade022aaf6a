//! Session catalog handling and the REPL over a real store.

use super::sample_session;
use pretty_assertions::assert_eq;
use sql_sandbox::catalog::CatalogCache;
use sql_sandbox::db::{BackingStore, SqliteStore, TableId};
use sql_sandbox::navigation::ActiveView;
use sql_sandbox::render::{OutputFormat, Renderer};
use sql_sandbox::repl::Repl;
use sql_sandbox::session::Session;
use std::sync::Arc;

#[tokio::test]
async fn test_catalog_snapshot_of_sample_data() {
    let session = sample_session().await;

    let snapshot = session.refresh_catalog().await.unwrap();

    assert_eq!(snapshot.table_names(), vec!["departments", "employees", "projects"]);
    assert_eq!(
        snapshot.columns(&TableId::new("departments")).unwrap(),
        &["id", "name", "manager_id", "budget", "location"]
    );
}

#[tokio::test]
async fn test_catalog_fallback_after_external_drop() {
    let store = Arc::new(SqliteStore::with_sample_data().await.unwrap());
    let session = Session::with_shared_store(Arc::clone(&store), TableId::new("employees"));

    store.execute("DROP TABLE employees").await.unwrap();
    session.refresh_catalog().await.unwrap();

    assert_eq!(
        session.navigation().await.active_view,
        ActiveView::Table(TableId::new("departments"))
    );
}

#[tokio::test]
async fn test_cache_follows_created_tables() {
    let session = sample_session().await;
    let mut cache = CatalogCache::new();

    assert!(!cache.current(&session).await.unwrap().contains(&TableId::new("skills")));

    session.submit("CREATE TABLE skills (id INTEGER, label TEXT)").await;

    let snapshot = cache.current(&session).await.unwrap();
    assert_eq!(
        snapshot.columns(&TableId::new("skills")).unwrap(),
        &["id", "label"]
    );
    assert_eq!(cache.fetch_count(), 2);
}

#[tokio::test]
async fn test_select_view_on_real_tables() {
    let session = sample_session().await;

    let nav = session
        .select_view(ActiveView::Table(TableId::new("Projects")))
        .await
        .unwrap();
    assert_eq!(nav.active_view, ActiveView::Table(TableId::new("projects")));

    let rows = session.table_rows(&TableId::new("projects")).await.unwrap();
    assert_eq!(rows.row_count(), 6);
}

#[tokio::test]
async fn test_repl_script() {
    let session = sample_session().await;
    let script = "\
SELECT name FROM departments
WHERE location = 'Osaka';

CREATE TABLE skills (id INTEGER);
DROP TABLE skills;
.state
";
    let mut repl = Repl::new(&session, Renderer::new(OutputFormat::Text, 20), Vec::new());
    repl.run(script.as_bytes(), false).await.unwrap();
    assert_eq!(repl.failures(), 0);

    let out = String::from_utf8(repl.into_writer()).unwrap();
    assert!(out.contains("| Analytics |"), "{out}");
    assert!(out.contains("== skills =="), "{out}");
    assert!(out.contains("OK: DROP TABLE skills"), "{out}");
    assert!(out.ends_with("view: results · refresh epoch: 2\n"), "{out}");
}
