//! # Command Module Unit Tests / Command 模块单元测试
//!
//! Tests for command line expansion and splitting, and for `spawn_and_capture`.
//!
//! 命令行展开与拆分以及 `spawn_and_capture` 的测试。

use release_matrix::infra::command::{parse_command_line, spawn_and_capture};

#[cfg(test)]
mod parse_command_line_tests {
    use super::*;

    #[test]
    fn test_splits_with_shell_quoting() {
        let line = parse_command_line(r#"python -c "print('a b')" --jobs=4"#, &[]).unwrap();
        assert_eq!(line.program, "python");
        assert_eq!(line.args, vec!["-c", "print('a b')", "--jobs=4"]);
    }

    #[test]
    fn test_context_variables_are_expanded() {
        let line = parse_command_line(
            "echo $MATRIX_OS ${MATRIX_RUNTIME}",
            &[("MATRIX_OS", "ubuntu-22.04"), ("MATRIX_RUNTIME", "3.7")],
        )
        .unwrap();
        assert_eq!(line.args, vec!["ubuntu-22.04", "3.7"]);
        assert_eq!(line.display, "echo ubuntu-22.04 3.7");
    }

    #[test]
    fn test_unknown_variables_are_left_untouched() {
        let line = parse_command_line("echo $RELEASE_MATRIX_SURELY_UNSET_VAR", &[]).unwrap();
        assert_eq!(line.args, vec!["$RELEASE_MATRIX_SURELY_UNSET_VAR"]);
    }

    #[test]
    fn test_empty_line_is_an_error() {
        assert!(parse_command_line("   ", &[]).is_err());
    }

    #[test]
    fn test_unbalanced_quotes_are_an_error() {
        assert!(parse_command_line("echo 'unterminated", &[]).is_err());
    }
}

#[cfg(all(test, unix))]
mod spawn_and_capture_tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let line = parse_command_line("sh -c 'echo out; echo err 1>&2'", &[]).unwrap();
        let (status, output) = spawn_and_capture(line.to_command()).await;

        assert!(status.unwrap().success());
        assert!(output.contains("out\n"));
        assert!(output.contains("err\n"));
    }

    #[tokio::test]
    async fn test_reports_nonzero_exit() {
        let line = parse_command_line("sh -c 'echo failing; exit 3'", &[]).unwrap();
        let (status, output) = spawn_and_capture(line.to_command()).await;

        assert_eq!(status.unwrap().code(), Some(3));
        assert!(output.contains("failing"));
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let line = parse_command_line("release_matrix_no_such_program_12345", &[]).unwrap();
        let (status, output) = spawn_and_capture(line.to_command()).await;

        assert!(status.is_err());
        assert!(output.is_empty());
    }
}
