//! Cross-process determinism test.
//!
//! Spawns the `search_fixture` binary under several environment variants
//! and asserts all produce identical output.

use std::path::Path;
use std::process::Command;

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = env!("CARGO_BIN_EXE_search_fixture");

    let mut command = Command::new(bin);
    command.current_dir(work_dir);

    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");

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

// ACCEPTANCE: determinism cross-process
#[test]
fn crossproc_determinism_four_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    assert!(
        baseline.contains("trace_digest=sha256:"),
        "baseline output missing trace_digest"
    );
    assert!(
        baseline.contains("termination_reason=budget_exhausted"),
        "unexpected termination: {baseline}"
    );
    assert!(baseline.contains("total_iterations=120"));

    let tmp = std::env::temp_dir();
    let variants: [(&str, Vec<(&str, &str)>); 3] = [
        ("tmp cwd", vec![]),
        ("C locale", vec![("LC_ALL", "C"), ("LANG", "C")]),
        ("debug logging", vec![("RUST_LOG", "debug")]),
    ];
    for (name, overrides) in &variants {
        let dir = if *name == "tmp cwd" {
            tmp.to_string_lossy().to_string()
        } else {
            root.clone()
        };
        let output = run_variant(&dir, overrides);
        assert_eq!(output, baseline, "variant {name} diverged");
    }
}
