use crate::{generator_command, supervisor_command, unique_namespace};

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_generator_requires_edges() {
    let output = generator_command(&unique_namespace(), &[])
        .output()
        .expect("Failed to execute generator");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr_of(&output).contains("EDGE"), "stderr: {}", stderr_of(&output));
}

#[test]
fn test_generator_rejects_malformed_edges() {
    for token in ["0-", "a-b", "1", "1-2-3", "2-x"] {
        let output = generator_command(&unique_namespace(), &["0-1", token])
            .output()
            .expect("Failed to execute generator");

        let stderr = stderr_of(&output);
        assert!(!output.status.success(), "'{}' was accepted", token);
        assert!(
            stderr.contains(&format!("'{}'", token)),
            "stderr does not name '{}': {}",
            token,
            stderr
        );
    }
}

#[test]
fn test_generator_without_supervisor_fails() {
    let output = generator_command(&unique_namespace(), &["0-1", "1-2"])
        .output()
        .expect("Failed to execute generator");

    let stderr = stderr_of(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("generator ["), "stderr: {}", stderr);
    assert!(stderr.contains("shm_open"), "stderr: {}", stderr);
}

#[test]
fn test_supervisor_rejects_arguments() {
    for arg in ["0-1", "--help", "-h", "--version", "-V"] {
        let namespace = unique_namespace();
        let output = supervisor_command(&namespace)
            .arg(arg)
            .output()
            .expect("Failed to execute supervisor");

        assert!(!output.status.success(), "'{}' was accepted", arg);
        assert!(output.stdout.is_empty(), "'{}' printed to stdout", arg);
        // Rejected before anything was created
        assert!(!crate::shm_path(&namespace).exists());
    }
}

#[test]
fn test_generator_rejects_options() {
    for arg in ["--help", "-h", "--version", "-V"] {
        let output = generator_command(&unique_namespace(), &["0-1", arg])
            .output()
            .expect("Failed to execute generator");

        assert!(!output.status.success(), "'{}' was accepted", arg);
        assert!(output.stdout.is_empty(), "'{}' printed to stdout", arg);
    }
}
