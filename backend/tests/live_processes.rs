//! Exercises the manager against real child processes.

use procman::{ProcError, ProcessManager, ProcessRecord, TargetSpec};
use std::collections::HashSet;
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, Command};

const SIGTERM: i32 = 15;

fn spawn_sleeper() -> Child {
    Command::new("sleep").arg("30").spawn().expect("spawn sleep")
}

fn spawn_sleeper_with_env(vars: &[(&str, &str)]) -> Child {
    Command::new("sleep")
        .arg("30")
        .env_clear()
        .envs(vars.iter().copied())
        .spawn()
        .expect("spawn sleep")
}

fn reap(mut child: Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[test]
fn child_record_matches_pid_and_owner() {
    let child = spawn_sleeper();
    let pid = child.id() as i32;
    let manager = ProcessManager::new();

    let record = manager.read_record(pid).unwrap();
    assert_eq!(record.pid(), pid);
    assert!(record.is_owned_by(nix::unistd::getuid().as_raw()));
    assert!(record.is_named("sleep"));

    reap(child);
}

#[test]
fn reaped_child_is_not_found() {
    let mut child = spawn_sleeper();
    let pid = child.id() as i32;
    child.kill().unwrap();
    child.wait().unwrap();

    let manager = ProcessManager::new();
    assert!(matches!(manager.read_record(pid), Err(ProcError::NotFound(p)) if p == pid));
    assert!(manager.process_by_id(pid).is_none());
    assert!(manager.send_signal(pid, SIGTERM).unwrap_err().is_not_found());
}

#[test]
fn child_environment_in_order() {
    let child = spawn_sleeper_with_env(&[("A", "1"), ("B", "2"), ("Greeting", "hi")]);
    let pid = child.id() as i32;
    let manager = ProcessManager::new();

    let env = manager.read_environment(pid).unwrap();
    assert_eq!(
        env.iter().collect::<Vec<_>>(),
        vec![("A", "1"), ("B", "2"), ("Greeting", "hi")]
    );
    assert_eq!(manager.environment_variable(pid, "GREETING").unwrap().as_deref(), Some("hi"));
    assert_eq!(manager.environment_variable(pid, "HOME").unwrap(), None);

    reap(child);
}

#[test]
fn bulk_terminate_children() {
    let children = vec![spawn_sleeper(), spawn_sleeper()];
    let pids: HashSet<i32> = children.iter().map(|c| c.id() as i32).collect();
    let manager = ProcessManager::new();

    let targets = pids.clone();
    let spec = TargetSpec::predicate(move |r: &ProcessRecord| targets.contains(&r.pid()));
    let report = manager.dispatch_to_matches(&spec, SIGTERM).unwrap();

    assert_eq!(report.matched(), 2);
    assert!(report.is_clean());
    for mut child in children {
        assert_eq!(child.wait().unwrap().signal(), Some(SIGTERM));
    }
}

#[test]
fn bulk_with_handler_and_no_matches() {
    let manager = ProcessManager::new();
    let mut failures = Vec::new();
    let mut on_error = |r: &ProcessRecord, e: ProcError| failures.push((r.pid(), e));

    let uid = nix::unistd::getuid().as_raw();
    let spec = TargetSpec::name_and_owner("procman-no-such-process", uid);
    let delivered = manager.kill_matching_with(&spec, SIGTERM, Some(&mut on_error)).unwrap();

    assert_eq!(delivered, 0);
    assert!(failures.is_empty());
}
