//! Cross-process determinism: the `search_fixture` binary prints identical
//! output under different working directories and environments.

use std::path::Path;
use std::process::Command;

/// Resolve the workspace root.
fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

/// Run the binary with the given cwd and environment overrides.
fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = env!("CARGO_BIN_EXE_search_fixture");

    let mut command = Command::new(bin);
    command.current_dir(work_dir);
    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "search_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_four_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    assert!(baseline.contains("report_digest=sha256:"));
    assert!(baseline.contains("world=key_door bound=1.000 status=solved"));
    assert!(baseline.contains("world=unreachable bound=inf status=exhausted"));

    let tmp = std::env::temp_dir();
    let variants: [(&str, Vec<(&str, &str)>); 3] = [
        ("cwd=tmp", vec![]),
        ("locale", vec![("LC_ALL", "C"), ("LANG", "en_US.UTF-8")]),
        ("tz+hashseed", vec![("TZ", "Asia/Tokyo"), ("RUST_LOG", "debug")]),
    ];
    for (label, env) in &variants {
        let dir = if *label == "cwd=tmp" {
            tmp.to_string_lossy().to_string()
        } else {
            root.clone()
        };
        let out = run_variant(&dir, env);
        assert_eq!(baseline, out, "output differed under variant {label}");
    }
}

#[test]
fn crossproc_reports_every_world() {
    let out = run_variant(&workspace_root(), &[]);
    let last = out.lines().last().expect("fixture printed output");
    let worlds: usize = last
        .strip_prefix("worlds=")
        .expect("summary line")
        .parse()
        .expect("world count");
    assert_eq!(out.lines().count(), worlds * 2 + 1);
}
