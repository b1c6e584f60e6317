use std::io::{BufRead, BufReader, Read};
use std::time::Duration;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::{
    shm_path, spawn_generator, spawn_supervisor, supervisor_command, unique_namespace,
    wait_timeout,
};

const TIMEOUT: Duration = Duration::from_secs(60);

const TRIANGLE: [&str; 3] = ["0-1", "1-2", "0-2"];
const K4: [&str; 6] = ["0-1", "0-2", "0-3", "1-2", "1-3", "2-3"];

/// Conflict count announced by an improvement line.
fn improvement_count(line: &str) -> usize {
    let rest = line
        .strip_prefix("Solution with ")
        .unwrap_or_else(|| panic!("unexpected line: {}", line));
    let (count, edges) = rest.split_once(" edges: ").expect("missing edge list");
    let count: usize = count.parse().expect("count is not a number");
    assert_eq!(edges.split(' ').count(), count, "line: {}", line);
    count
}

#[test]
fn test_triangle_is_colorable() {
    let namespace = unique_namespace();
    let mut supervisor = spawn_supervisor(&namespace);
    let mut generators: Vec<_> = (0..3)
        .map(|_| spawn_generator(&namespace, &TRIANGLE))
        .collect();

    let status = wait_timeout(&mut supervisor, TIMEOUT);
    assert!(status.success(), "supervisor exited with {}", status);

    let mut stdout = String::new();
    supervisor
        .stdout
        .take()
        .unwrap()
        .read_to_string(&mut stdout)
        .unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.last(), Some(&"The graph is 3-colorable!"));

    // Improvements strictly decrease
    let counts: Vec<usize> = lines[..lines.len() - 1]
        .iter()
        .map(|line| improvement_count(line))
        .collect();
    assert!(counts.windows(2).all(|w| w[1] < w[0]), "{:?}", counts);

    for generator in &mut generators {
        let status = wait_timeout(generator, TIMEOUT);
        assert!(status.success(), "generator exited with {}", status);
    }
    assert!(!shm_path(&namespace).exists());
}

#[test]
fn test_interrupt_stops_everything() {
    let namespace = unique_namespace();
    let mut supervisor = spawn_supervisor(&namespace);
    let mut generators: Vec<_> = (0..2)
        .map(|_| spawn_generator(&namespace, &K4))
        .collect();

    // K4 is never 3-colorable; wait for the first improvement
    let mut reader = BufReader::new(supervisor.stdout.take().unwrap());
    let mut first = String::new();
    reader.read_line(&mut first).unwrap();
    assert!(improvement_count(first.trim_end()) >= 1);

    kill(Pid::from_raw(supervisor.id() as i32), Signal::SIGINT).unwrap();

    let status = wait_timeout(&mut supervisor, TIMEOUT);
    assert!(status.success(), "supervisor exited with {}", status);

    let mut rest = String::new();
    reader.read_to_string(&mut rest).unwrap();
    assert!(!rest.contains("3-colorable"));

    for generator in &mut generators {
        let status = wait_timeout(generator, TIMEOUT);
        assert!(status.success(), "generator exited with {}", status);
    }
    assert!(!shm_path(&namespace).exists());
}

#[test]
fn test_second_supervisor_is_rejected() {
    let namespace = unique_namespace();
    let mut first = spawn_supervisor(&namespace);

    let output = supervisor_command(&namespace)
        .output()
        .expect("Failed to execute supervisor");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("supervisor ["), "stderr: {}", stderr);

    // The first supervisor still owns everything
    assert!(shm_path(&namespace).exists());
    kill(Pid::from_raw(first.id() as i32), Signal::SIGTERM).unwrap();
    let status = wait_timeout(&mut first, TIMEOUT);
    assert!(status.success(), "supervisor exited with {}", status);
    assert!(!shm_path(&namespace).exists());
}
