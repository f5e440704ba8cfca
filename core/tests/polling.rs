//! Job waiting with the real one-second poll interval.

mod support;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use awx_core::{wait_for, wait_for_success_job_finish, ApiError};
use support::{mock_client, spawn_mock, with_store};

#[test]
fn finished_job_returns_after_first_tick() {
    let (base, db) = spawn_mock();
    let client = mock_client(&base);
    let id = with_store(&db, |s| s.insert_job("deploy", "successful"));

    let start = Instant::now();
    wait_for_success_job_finish(&client, id, Some(Duration::from_secs(5))).unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(1), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1900), "{elapsed:?}");
}

#[test]
fn running_job_times_out_at_the_deadline() {
    let (base, db) = spawn_mock();
    let client = mock_client(&base);
    let id = with_store(&db, |s| s.insert_job("deploy", "running"));

    let start = Instant::now();
    let err = wait_for_success_job_finish(&client, id, Some(Duration::from_secs(5))).unwrap_err();
    let elapsed = start.elapsed();
    assert!(matches!(err, ApiError::Timeout(_)), "{err}");
    assert_eq!(err.to_string(), "a timeout occurred");
    assert!(elapsed >= Duration::from_secs(5), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(6), "{elapsed:?}");
}

#[test]
fn generic_wait_counts_one_run_per_second() {
    let runs = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&runs);

    let start = Instant::now();
    wait_for(Some(Duration::from_secs(10)), move |_| {
        Ok(seen.fetch_add(1, Ordering::SeqCst) + 1 == 2)
    })
    .unwrap();
    let elapsed = start.elapsed();
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert!(elapsed >= Duration::from_secs(2), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "{elapsed:?}");
}
