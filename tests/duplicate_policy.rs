//! add with reject / upsert duplicate policies.

mod common;

use hostedit::editor::{AddOutcome, DuplicatePolicy, FileHostsEditor, HostsEditor};
use hostedit::error::HostsError;
use hostedit::hosts::MatchMode;

#[test]
fn reject_leaves_file_untouched() {
    let dir = common::temp_home();
    let original = "127.0.0.1 localhost\n10.0.0.1\tapi.test\n";
    let path = common::hosts_file(&dir, original);
    let editor = FileHostsEditor::new(&path).with_duplicate_policy(DuplicatePolicy::Reject);

    let err = editor.add("api.test", "10.0.0.2").unwrap_err();
    assert!(matches!(err, HostsError::DuplicateEntry(ref d) if d == "api.test"));
    assert_eq!(err.exit_code(), 9);
    assert_eq!(common::read(&path), original);

    assert_eq!(editor.add("web.test", "10.0.0.2").unwrap(), AddOutcome::Appended);
    assert_eq!(common::read(&path), format!("{original}10.0.0.2\tweb.test\n"));
}

#[test]
fn reject_respects_exact_matching() {
    let dir = common::temp_home();
    let path = common::hosts_file(&dir, "10.0.0.1 sub.api.test\n");
    let editor = FileHostsEditor::new(&path)
        .with_duplicate_policy(DuplicatePolicy::Reject)
        .with_match_mode(MatchMode::Exact);

    editor.add("api.test", "10.0.0.2").unwrap();
    assert_eq!(common::read(&path), "10.0.0.1 sub.api.test\n10.0.0.2\tapi.test\n");
}

#[test]
fn upsert_replaces_instead_of_appending() {
    let dir = common::temp_home();
    let path = common::hosts_file(&dir, "127.0.0.1 localhost\n10.0.0.1 api.test\n");
    let editor = FileHostsEditor::new(&path).with_duplicate_policy(DuplicatePolicy::Upsert);

    assert_eq!(editor.add("api.test", "10.0.0.5").unwrap(), AddOutcome::Updated(1));
    assert_eq!(common::read(&path), "127.0.0.1 localhost\n10.0.0.5\tapi.test\n");

    assert_eq!(editor.add("api.test", "10.0.0.6").unwrap(), AddOutcome::Updated(1));
    assert_eq!(common::read(&path), "127.0.0.1 localhost\n10.0.0.6\tapi.test\n");
}

#[test]
fn upsert_appends_new_domain() {
    let dir = common::temp_home();
    let path = common::hosts_file(&dir, "127.0.0.1 localhost\n");
    let editor = FileHostsEditor::new(&path).with_duplicate_policy(DuplicatePolicy::Upsert);

    assert_eq!(editor.add("api.test", "10.0.0.5").unwrap(), AddOutcome::Appended);
    assert_eq!(common::read(&path), "127.0.0.1 localhost\n10.0.0.5\tapi.test\n");
}
