//! Reports written to disk read back with the same digest, and tampering
//! is detected.

use iwplan_harness::report::{
    read_report_dir, write_report_dir, ReportDirError, REPORT_DIGEST_FILENAME, REPORT_FILENAME,
};
use iwplan_harness::runner::run_world;
use iwplan_harness::worlds::key_door::KeyDoor;
use iwplan_search::observer::NullObserver;
use iwplan_search::policy::IwPolicyV1;
use lock_tests::search_test_helpers::all_worlds;

#[test]
fn every_world_report_round_trips_through_disk() {
    let tmp = tempfile::tempdir().unwrap();
    for world in all_worlds() {
        let out = run_world(world.as_ref(), &IwPolicyV1::default(), NullObserver).unwrap();
        let dir = tmp.path().join(world.world_id());
        let written = write_report_dir(&out.report, &dir).unwrap();
        let loaded = read_report_dir(&dir).unwrap();
        assert_eq!(written, loaded.digest, "{}", world.world_id());
        assert_eq!(written, out.report.digest().unwrap());
        assert_eq!(loaded.bytes, out.report.canonical_bytes().unwrap());
        assert_eq!(loaded.value["world_id"], world.world_id());
        assert_eq!(loaded.value["status"], out.report.status.as_str());
    }
}

#[test]
fn rewriting_a_report_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let out = run_world(&KeyDoor::default(), &IwPolicyV1::with_bound(1.0), NullObserver).unwrap();
    let first = write_report_dir(&out.report, tmp.path()).unwrap();
    let bytes = std::fs::read(tmp.path().join(REPORT_FILENAME)).unwrap();
    let second = write_report_dir(&out.report, tmp.path()).unwrap();
    assert_eq!(first, second);
    assert_eq!(bytes, std::fs::read(tmp.path().join(REPORT_FILENAME)).unwrap());
}

#[test]
fn tampered_plan_fails_digest_check() {
    let tmp = tempfile::tempdir().unwrap();
    let out = run_world(&KeyDoor::default(), &IwPolicyV1::with_bound(1.0), NullObserver).unwrap();
    write_report_dir(&out.report, tmp.path()).unwrap();

    let path = tmp.path().join(REPORT_FILENAME);
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"pick-key\""));
    std::fs::write(&path, text.replace("\"pick-key\"", "\"drop-key\"")).unwrap();

    assert!(matches!(
        read_report_dir(tmp.path()),
        Err(ReportDirError::DigestMismatch { .. })
    ));
}

#[test]
fn missing_digest_file_fails_closed() {
    let tmp = tempfile::tempdir().unwrap();
    let out = run_world(&KeyDoor::default(), &IwPolicyV1::default(), NullObserver).unwrap();
    write_report_dir(&out.report, tmp.path()).unwrap();
    std::fs::remove_file(tmp.path().join(REPORT_DIGEST_FILENAME)).unwrap();
    assert_eq!(
        read_report_dir(tmp.path()).unwrap_err(),
        ReportDirError::MissingFile {
            filename: REPORT_DIGEST_FILENAME.to_string()
        }
    );
}
