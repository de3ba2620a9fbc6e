//! Persistence & Locking Tests
//!
//! Disk-backed databases keep committed documents across reopen, and a
//! writer blocked by another connection fails with `Busy` after the
//! configured timeout.

use crate::test_utils::*;

#[test]
fn test_documents_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let value = json!({"branches": [{"name": "main"}, {"name": "dev"}], "count": 2});
    {
        let db = create_persistent_db(dir.path());
        let doc = db.create_document("repo").unwrap();
        doc.add("/meta", value.clone(), false).unwrap();
        doc.remove("/meta/branches/0").unwrap();
    }

    let db = create_persistent_db(dir.path());
    let doc = db.open_document("repo").unwrap();
    assert_document(
        &doc,
        json!({"meta": {"branches": [{"name": "dev"}], "count": 2}}),
    );
}

#[test]
fn test_config_file_written_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let db = create_persistent_db(dir.path());
    assert_eq!(db.data_dir(), Some(dir.path()));
    let content = std::fs::read_to_string(dir.path().join(arbor::CONFIG_FILE_NAME)).unwrap();
    assert!(content.contains("busy_timeout_ms"));
}

#[test]
fn test_two_handles_share_documents() {
    let dir = tempfile::tempdir().unwrap();
    let first = create_persistent_db(dir.path());
    let second = create_persistent_db(dir.path());

    first.create_document("shared").unwrap().add("/x", json!(1), false).unwrap();
    let doc = second.open_document("shared").unwrap();
    assert_eq!(doc.get_int("/x").unwrap(), 1);
}

#[test]
fn test_competing_writer_is_busy() {
    let dir = tempfile::tempdir().unwrap();
    let holder = create_impatient_db(dir.path());
    let waiter = create_impatient_db(dir.path());
    waiter.create_document("d").unwrap();

    // The outer transaction holds the write lock while the inner one waits.
    let err = holder
        .transaction(|_| waiter.create_document("other").map(|_| ()))
        .unwrap_err();
    assert!(matches!(err, ArborError::Busy { .. }), "got {:?}", err);

    // Nothing from the failed attempt is visible, and the lock is free again.
    assert_eq!(waiter.list_documents().unwrap(), vec!["d"]);
    waiter.create_document("other").unwrap();
}
