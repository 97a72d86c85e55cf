//! # Concurrency Tests using Loom
//!
//! Models the matrix fan-out with loom: every axis runs to completion and
//! records its [`JobResult`] no matter how the others are interleaved, and the
//! folded [`RunOutcome`] is the same under every schedule. There is no shared
//! cancellation state, so a failing axis cannot stop a sibling.

mod common;

#[cfg(test)]
mod tests {
    use super::common;
    use loom::sync::atomic::{AtomicUsize, Ordering};
    use loom::sync::{Arc, Mutex};
    use loom::thread;
    use release_matrix::core::planner::plan_matrix;
    use release_matrix::models::{JobResult, JobStatus, RunOutcome, Stage};
    use std::time::Duration;

    /// Two axes, the first failing. Under every interleaving both results are
    /// recorded, `RunOutcome::new` restores declaration order, and the
    /// aggregate status is `Fail`.
    #[test]
    fn test_failing_axis_never_prevents_sibling_completion() {
        const STACK_SIZE: usize = 8 * 1024 * 1024; // 8 MB

        let builder = std::thread::Builder::new()
            .name("loom-test-thread".into())
            .stack_size(STACK_SIZE);

        let handle = builder
            .spawn(|| {
                let matrix = common::matrix_with(
                    &[("ubuntu-22.04", "3.7"), ("ubuntu-24.04", "3.13")],
                    "true",
                );
                let jobs = plan_matrix(&matrix, None, None, None).unwrap().jobs;
                let num_axes = jobs.len();

                loom::model(move || {
                    let completed = Arc::new(AtomicUsize::new(0));
                    let results = Arc::new(Mutex::new(Vec::new()));

                    let handles: Vec<_> = jobs
                        .iter()
                        .cloned()
                        .map(|spec| {
                            let completed = completed.clone();
                            let results = results.clone();
                            thread::spawn(move || {
                                let result = if spec.index == 0 {
                                    JobResult::failed(&spec, Stage::Test, Some(1), String::new(), Duration::ZERO)
                                } else {
                                    JobResult::passed(&spec, String::new(), Duration::ZERO)
                                };
                                completed.fetch_add(1, Ordering::SeqCst);
                                results.lock().unwrap().push(result);
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }

                    assert_eq!(completed.load(Ordering::SeqCst), num_axes);

                    let outcome = RunOutcome::new(results.lock().unwrap().clone());
                    let order: Vec<_> = outcome
                        .results
                        .iter()
                        .map(|r| (r.axis.key(), r.status))
                        .collect();
                    assert_eq!(
                        order,
                        vec![
                            ("ubuntu-22.04-3.7".to_string(), JobStatus::Fail),
                            ("ubuntu-24.04-3.13".to_string(), JobStatus::Pass),
                        ]
                    );
                    assert_eq!(outcome.status(), JobStatus::Fail);
                    assert_eq!(outcome.passed_count(), 1);
                });
            })
            .unwrap();

        handle.join().unwrap();
    }
}
