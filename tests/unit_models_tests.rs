//! # Models Module Unit Tests / Models 模块单元测试
//!
//! Tests for environment axes, job specifications, results, the aggregate
//! run outcome and the trigger policy.
//!
//! 环境轴、任务规格、结果、整体运行结果以及触发策略的测试。

mod common;

use release_matrix::core::planner::plan_matrix;
use release_matrix::core::trigger::{TriggerEvent, TriggerPolicy, is_accepted};
use release_matrix::models::{
    EnvironmentAxis, JobResult, JobSpec, JobStatus, RunOutcome, Stage, TestInvocation,
};
use std::time::Duration;

fn spec(index: usize, os: &str, runtime: &str) -> JobSpec {
    let matrix = common::matrix_with(&[(os, runtime)], "python runtest.py");
    let mut job = plan_matrix(&matrix, None, None, None).unwrap().jobs.remove(0);
    job.index = index;
    job
}

#[cfg(test)]
mod axis_tests {
    use super::*;

    #[test]
    fn test_axis_key_and_artifact_name() {
        let axis = EnvironmentAxis::new("ubuntu-22.04", "3.7");
        assert_eq!(axis.key(), "ubuntu-22.04-3.7");
        assert_eq!(axis.artifact_name(), "ubuntu-22.04-3.7-failed-tests");
        assert_eq!(axis.to_string(), "ubuntu-22.04 / 3.7");
    }

    #[test]
    fn test_stage_order_and_names() {
        assert!(Stage::Provision < Stage::InstallRuntime);
        assert!(Stage::InstallRuntime < Stage::InstallDependencies);
        assert!(Stage::InstallDependencies < Stage::Test);
        assert_eq!(Stage::InstallDependencies.to_string(), "install-dependencies");
    }
}

#[cfg(test)]
mod job_spec_tests {
    use super::*;

    #[test]
    fn test_invocation_selects_full_suite() {
        let invocation = TestInvocation::new("python runtest.py", 4);
        assert_eq!(invocation.command_line(), "python runtest.py --all --time --jobs=4");
    }

    #[test]
    fn test_steps_skip_missing_and_empty_commands() {
        let mut job = spec(0, "ubuntu-22.04", "3.7");
        job.provision = Some("   ".to_string());
        job.install_runtime = None;
        job.install_dependencies = Some("pip install -r requirements.txt".to_string());

        let stages: Vec<Stage> = job.steps().into_iter().map(|(stage, _)| stage).collect();
        assert_eq!(stages, vec![Stage::InstallDependencies, Stage::Test]);
    }

    #[test]
    fn test_steps_run_in_stage_order() {
        let mut job = spec(0, "ubuntu-22.04", "3.7");
        job.provision = Some("a".to_string());
        job.install_runtime = Some("b".to_string());
        job.install_dependencies = Some("c".to_string());

        let steps = job.steps();
        let stages: Vec<Stage> = steps.iter().map(|(stage, _)| *stage).collect();
        assert_eq!(
            stages,
            vec![
                Stage::Provision,
                Stage::InstallRuntime,
                Stage::InstallDependencies,
                Stage::Test
            ]
        );
        assert_eq!(steps[3].1, "python runtest.py --all --time --jobs=4");
    }
}

#[cfg(test)]
mod outcome_tests {
    use super::*;

    #[test]
    fn test_results_are_kept_in_declaration_order() {
        let a = spec(0, "ubuntu-22.04", "3.7");
        let b = spec(1, "ubuntu-24.04", "3.13");
        let c = spec(2, "macos-latest", "3.12");

        let outcome = RunOutcome::new(vec![
            JobResult::passed(&c, String::new(), Duration::from_secs(1)),
            JobResult::failed(&a, Stage::Test, Some(1), String::new(), Duration::from_secs(2)),
            JobResult::passed(&b, String::new(), Duration::from_secs(3)),
        ]);

        let order: Vec<usize> = outcome.results.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_any_failure_fails_the_run() {
        let a = spec(0, "ubuntu-22.04", "3.7");
        let b = spec(1, "ubuntu-24.04", "3.13");

        let outcome = RunOutcome::new(vec![
            JobResult::failed(&a, Stage::Test, Some(1), String::new(), Duration::ZERO),
            JobResult::passed(&b, String::new(), Duration::ZERO),
        ]);

        assert_eq!(outcome.status(), JobStatus::Fail);
        assert_eq!(outcome.passed_count(), 1);
        assert_eq!(outcome.failures().len(), 1);
        assert_eq!(outcome.failures()[0].axis.key(), "ubuntu-22.04-3.7");
    }

    #[test]
    fn test_all_passing_and_empty_runs_pass() {
        let a = spec(0, "ubuntu-22.04", "3.7");
        let outcome = RunOutcome::new(vec![JobResult::passed(&a, String::new(), Duration::ZERO)]);
        assert_eq!(outcome.status(), JobStatus::Pass);
        assert_eq!(RunOutcome::default().status(), JobStatus::Pass);
    }

    #[test]
    fn test_aborted_result_is_a_failure_without_stage() {
        let a = spec(0, "ubuntu-22.04", "3.7");
        let result = JobResult::aborted(&a, "panicked".to_string());
        assert!(result.is_failure());
        assert_eq!(result.failed_stage, None);
        assert!(result.log_artifact_path.is_none());
    }
}

#[cfg(test)]
mod trigger_tests {
    use super::*;

    fn policy() -> TriggerPolicy {
        TriggerPolicy {
            push: vec!["master".to_string()],
            pull_request: vec!["master".to_string()],
            workflow_dispatch: true,
        }
    }

    #[test]
    fn test_push_and_pull_request_filter_by_branch() {
        let policy = policy();
        assert!(policy.accepts(&TriggerEvent::Push {
            branch: "master".to_string()
        }));
        assert!(!policy.accepts(&TriggerEvent::Push {
            branch: "feature".to_string()
        }));
        assert!(policy.accepts(&TriggerEvent::PullRequest {
            base: "master".to_string()
        }));
        assert!(!policy.accepts(&TriggerEvent::PullRequest {
            base: "release".to_string()
        }));
    }

    #[test]
    fn test_manual_dispatch() {
        assert!(policy().accepts(&TriggerEvent::Manual));
        let no_dispatch = TriggerPolicy {
            workflow_dispatch: false,
            ..policy()
        };
        assert!(!no_dispatch.accepts(&TriggerEvent::Manual));
    }

    #[test]
    fn test_missing_policy_accepts_everything() {
        assert!(is_accepted(None, &TriggerEvent::Manual));
        assert!(is_accepted(
            None,
            &TriggerEvent::Push {
                branch: "anything".to_string()
            }
        ));
    }
}
