mod cli_test;
mod search_test;

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Namespace no other test run is using.
pub fn unique_namespace() -> String {
    format!(
        "itest_{}_{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

pub fn supervisor_command(namespace: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_supervisor"));
    cmd.env("THREECOL_NAMESPACE", namespace);
    cmd
}

pub fn generator_command(namespace: &str, edges: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_generator"));
    cmd.env("THREECOL_NAMESPACE", namespace).args(edges);
    cmd
}

pub fn shm_path(namespace: &str) -> PathBuf {
    PathBuf::from(format!("/dev/shm/{}_3col", namespace))
}

fn mutex_path(namespace: &str) -> PathBuf {
    PathBuf::from(format!("/dev/shm/sem.{}_3col_mutex", namespace))
}

fn wait_for(path: &Path, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if path.exists() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

/// Start a supervisor and wait until its last semaphore exists.
pub fn spawn_supervisor(namespace: &str) -> Child {
    let mut child = supervisor_command(namespace)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to start supervisor");

    if !wait_for(&mutex_path(namespace), Duration::from_secs(10)) {
        let _ = child.kill();
        panic!("supervisor did not create its resources");
    }
    child
}

pub fn spawn_generator(namespace: &str, edges: &[&str]) -> Child {
    generator_command(namespace, edges)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to start generator")
}

/// Wait for `child` to exit, killing it after `timeout`.
pub fn wait_timeout(child: &mut Child, timeout: Duration) -> ExitStatus {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().expect("Failed to poll child") {
            return status;
        }
        if start.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            panic!("process {} did not exit within {:?}", child.id(), timeout);
        }
        thread::sleep(Duration::from_millis(10));
    }
}
