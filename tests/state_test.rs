use ptimer::state::{Session, with_session_lock};
use std::fs;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_session_round_trip() {
    let dir = tempdir().unwrap();
    let session_path = dir.path().join("session.json");

    let session = Session {
        show_milliseconds: true,
        show_full_format: false,
        saved_seconds: 12.5,
        geometry: Some(vec![0x01, 0xd9, 0xd0, 0xcb, 0x00, 0xff]),
        updated_at: None,
    };
    session.save(&session_path).unwrap();

    let loaded = Session::load(&session_path).unwrap();
    assert_eq!(loaded, session);
}

#[test]
fn test_missing_and_empty_files_give_defaults() {
    let dir = tempdir().unwrap();
    let session_path = dir.path().join("session.json");

    assert_eq!(Session::load(&session_path).unwrap(), Session::default());

    fs::write(&session_path, "   \n").unwrap();
    assert_eq!(Session::load(&session_path).unwrap(), Session::default());
}

#[test]
fn test_corrupt_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    fs::write(&session_path, "{ not json").unwrap();

    let loaded = Session::load(&session_path).unwrap();
    assert_eq!(loaded, Session::default());
    assert!(loaded.show_full_format);
    assert!(!loaded.show_milliseconds);
}

#[test]
fn test_invalid_utf8_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    fs::write(&session_path, [0xff, 0xfe, 0x00, b'{']).unwrap();

    let loaded = Session::load(&session_path).unwrap();
    assert_eq!(loaded, Session::default());

    // the next save replaces the unreadable file
    loaded.save(&session_path).unwrap();
    assert_eq!(Session::load(&session_path).unwrap(), Session::default());
}

#[test]
fn test_unparsable_saved_time_keeps_other_keys() {
    let dir = tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    fs::write(
        &session_path,
        r#"{ "show_milliseconds": true, "saved_seconds": "twelve" }"#,
    )
    .unwrap();

    let loaded = Session::load(&session_path).unwrap();
    assert!(loaded.show_milliseconds);
    assert_eq!(loaded.saved_seconds, 0.0);
}

#[test]
fn test_lock_saves_on_success_only() {
    let dir = tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    let lock_path = dir.path().join("session.lock");

    with_session_lock(&lock_path, &session_path, |session| {
        session.saved_seconds = 10.0;
        Ok(())
    })
    .unwrap();

    let result: anyhow::Result<()> = with_session_lock(&lock_path, &session_path, |session| {
        session.saved_seconds = 99.0;
        anyhow::bail!("changed my mind")
    });
    assert!(result.is_err());

    let loaded = Session::load(&session_path).unwrap();
    assert_eq!(loaded.saved_seconds, 10.0);
    assert!(loaded.updated_at.is_some());
}

#[test]
fn test_concurrent_lock() {
    let dir = tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    let lock_path = dir.path().join("session.lock");

    Session::default().save(&session_path).unwrap();

    let lock_path_clone = lock_path.clone();
    let session_path_clone = session_path.clone();

    // Spawn a thread that holds the lock for 500ms
    let handle = thread::spawn(move || {
        with_session_lock(&lock_path_clone, &session_path_clone, |session| {
            session.saved_seconds = 1.0;
            thread::sleep(Duration::from_millis(500));
            Ok(())
        })
        .unwrap();
    });

    // Give thread time to acquire lock
    thread::sleep(Duration::from_millis(100));

    let start = std::time::Instant::now();
    with_session_lock(&lock_path, &session_path, |session| {
        // When we get here, the other writer has finished
        assert_eq!(session.saved_seconds, 1.0);
        session.saved_seconds += 1.0;
        Ok(())
    })
    .unwrap();

    assert!(
        start.elapsed().as_millis() >= 400,
        "Should have waited for lock"
    );

    handle.join().unwrap();

    let final_state = Session::load(&session_path).unwrap();
    assert_eq!(final_state.saved_seconds, 2.0);
}
