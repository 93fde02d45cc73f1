//! add appends after existing lines; list returns the file verbatim.

mod common;

use hostedit::editor::{AddOutcome, FileHostsEditor, HostsEditor};
use hostedit::error::HostsError;

const EXISTING: &str = "# static table\n127.0.0.1\tlocalhost\n\n::1 localhost ip6-localhost\n";

#[test]
fn add_appends_after_existing_lines() {
    let dir = common::temp_home();
    let path = common::hosts_file(&dir, EXISTING);
    let editor = FileHostsEditor::new(&path);

    assert_eq!(editor.add("api.test", "10.0.0.1").unwrap(), AddOutcome::Appended);

    let content = common::read(&path);
    assert_eq!(content, format!("{EXISTING}10.0.0.1\tapi.test\n"));

    let lines = editor.list().unwrap();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines.last().unwrap(), "10.0.0.1\tapi.test");
    assert_eq!(lines[..4], ["# static table", "127.0.0.1\tlocalhost", "", "::1 localhost ip6-localhost"]);
}

#[test]
fn add_allows_duplicates_by_default() {
    let dir = common::temp_home();
    let path = common::hosts_file(&dir, "10.0.0.1\tapi.test\n");
    let editor = FileHostsEditor::new(&path);

    editor.add("api.test", "10.0.0.1").unwrap();

    assert_eq!(common::read(&path), "10.0.0.1\tapi.test\n10.0.0.1\tapi.test\n");
}

#[test]
fn add_starts_new_line_when_file_lacks_trailing_newline() {
    let dir = common::temp_home();
    let path = common::hosts_file(&dir, "127.0.0.1 localhost");
    let editor = FileHostsEditor::new(&path);

    editor.add("api.test", "::1").unwrap();

    assert_eq!(common::read(&path), "127.0.0.1 localhost\n::1\tapi.test\n");
}

#[test]
fn add_rejects_malformed_ip_without_touching_file() {
    let dir = common::temp_home();
    let path = common::hosts_file(&dir, EXISTING);
    let editor = FileHostsEditor::new(&path);

    for ip in ["999.999.1.1", "not-an-ip", ""] {
        let err = editor.add("api.test", ip).unwrap_err();
        assert!(matches!(err, HostsError::InvalidIp(_)), "{ip:?}: {err}");
    }
    assert_eq!(common::read(&path), EXISTING);
}

#[test]
fn add_rejects_empty_domain() {
    let dir = common::temp_home();
    let path = common::hosts_file(&dir, EXISTING);
    let err = FileHostsEditor::new(&path).add("", "10.0.0.1").unwrap_err();
    assert!(matches!(err, HostsError::EmptyDomain));
    assert_eq!(common::read(&path), EXISTING);
}

#[test]
fn add_to_missing_file_is_open_error() {
    let dir = common::temp_home();
    let path = dir.path().join("missing");
    let err = FileHostsEditor::new(&path).add("api.test", "10.0.0.1").unwrap_err();
    assert!(matches!(err, HostsError::FileOpen { .. }));
    assert_eq!(err.exit_code(), 6);
    assert!(!path.exists());
}

#[test]
fn list_is_idempotent() {
    let dir = common::temp_home();
    let path = common::hosts_file(&dir, EXISTING);
    let editor = FileHostsEditor::new(&path);

    let first = editor.list().unwrap();
    let second = editor.list().unwrap();
    assert_eq!(first, second);
    assert_eq!(common::read(&path), EXISTING);
}

#[test]
fn list_tolerates_crlf() {
    let dir = common::temp_home();
    let path = common::hosts_file(&dir, "127.0.0.1 localhost\r\n10.0.0.1 api.test\r\n");
    let lines = FileHostsEditor::new(&path).list().unwrap();
    assert_eq!(lines, vec!["127.0.0.1 localhost", "10.0.0.1 api.test"]);
}

#[test]
fn list_fails_whole_read_on_bad_line() {
    let dir = common::temp_home();
    let path = dir.path().join("hosts");
    std::fs::write(&path, b"127.0.0.1 localhost\n\xff\xfe broken\n10.0.0.1 api.test\n").unwrap();

    let err = FileHostsEditor::new(&path).list().unwrap_err();
    assert!(matches!(err, HostsError::FileRead { .. }));
    assert_eq!(err.exit_code(), 7);
}

#[test]
fn list_missing_file_is_open_error() {
    let dir = common::temp_home();
    let err = FileHostsEditor::new(dir.path().join("nope")).list().unwrap_err();
    assert!(matches!(err, HostsError::FileOpen { .. }));
}
