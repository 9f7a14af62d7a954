//! Running commands through the tree: announcement, output capture,
//! exit-status handling, and environment passthrough.
#![cfg(unix)]

use std::io;
use std::sync::Arc;

use crate::common::{TestTree, leading_spaces, tree};
use logtree::styling::{bold, dim};
use insta::assert_snapshot;
use logtree::{Cmd, Error, Log, Sink};
use rstest::rstest;

/// A sink whose reader went away
struct ClosedPipe;

impl Sink for ClosedPipe {
    fn write_str(&self, _: &str) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

#[rstest]
#[tokio::test]
async fn test_echo_output_one_level_below_announcement(tree: TestTree) {
    let ok = tree.log.run(&Cmd::new(["echo", "hello"])).await.unwrap();
    assert!(ok);

    let lines = tree.lines();
    assert_eq!(lines, vec!["$ echo hello", "  | hello"]);
    assert_eq!(leading_spaces(&lines[1]), leading_spaces(&lines[0]) + 2);
}

#[rstest]
#[tokio::test]
async fn test_styles_applied(tree: TestTree) {
    tree.log.run(&Cmd::new(["echo", "hello"])).await.unwrap();
    assert_eq!(
        tree.capture.contents(),
        format!("$ {}\n  {}\n", bold("echo hello"), dim("| hello"))
    );
}

#[rstest]
#[tokio::test]
async fn test_false_fails_under_check(tree: TestTree) {
    let err = tree.log.run(&Cmd::new(["false"])).await.unwrap_err();
    match &err {
        Error::CommandFailed { command, code } => {
            assert_eq!(command, &["false"]);
            assert_eq!(*code, Some(1));
        }
        other => panic!("expected command failure, got {other:?}"),
    }
    assert_eq!(err.command(), Some(&["false".to_string()][..]));
}

#[rstest]
#[case::success(&["true"], true)]
#[case::failure(&["false"], false)]
#[tokio::test]
async fn test_unchecked_returns_success_flag(
    tree: TestTree,
    #[case] argv: &[&str],
    #[case] expected: bool,
) {
    let ok = tree
        .log
        .run(&Cmd::new(argv.iter().copied()).check(false))
        .await
        .unwrap();
    assert_eq!(ok, expected);
}

#[rstest]
#[tokio::test]
async fn test_extra_env_merged_with_inherited(tree: TestTree) {
    tree.log
        .run(&Cmd::new(["printenv", "FOO"]).env("FOO", "BAR"))
        .await
        .unwrap();
    assert_eq!(tree.lines(), vec!["$ printenv FOO", "  | BAR"]);

    let all = TestTree::new();
    all.log
        .run(&Cmd::new(["env"]).env("FOO", "BAR").quiet(true))
        .await
        .unwrap();
    let lines = all.lines();
    assert!(lines.iter().any(|l| l == "| FOO=BAR"), "{lines:?}");
    assert!(lines.iter().any(|l| l.starts_with("| PATH=")), "{lines:?}");
}

#[rstest]
#[tokio::test]
async fn test_quiet_skips_announcement_and_section(tree: TestTree) {
    let section = tree.log.note("Step").unwrap();
    section
        .run(&Cmd::new(["echo", "x"]).quiet(true))
        .await
        .unwrap();
    assert_eq!(tree.lines(), vec!["* Step", "  | x"]);
}

#[rstest]
#[tokio::test]
async fn test_note_with_two_commands(tree: TestTree) {
    {
        let step = tree.log.note("Step 1").unwrap();
        step.run(&Cmd::new(["echo", "a"])).await.unwrap();
        step.run(&Cmd::new(["echo", "b"])).await.unwrap();
    }
    assert_snapshot!(tree.capture.plain(), @r"
    * Step 1
      $ echo a
        | a
      $ echo b
        | b
    ");
}

#[rstest]
#[tokio::test]
async fn test_stdout_and_stderr_both_captured(tree: TestTree) {
    tree.log
        .run(&Cmd::new(["sh", "-c", "echo out; echo err >&2"]).quiet(true))
        .await
        .unwrap();
    let mut lines = tree.lines();
    lines.sort();
    assert_eq!(lines, vec!["| err", "| out"]);
}

#[rstest]
#[tokio::test]
async fn test_idle_stdout_does_not_hold_back_stderr(tree: TestTree) {
    // stdout stays open but silent while stderr speaks
    tree.log
        .run(&Cmd::new(["sh", "-c", "echo first >&2; sleep 0.3; echo second"]).quiet(true))
        .await
        .unwrap();
    assert_eq!(tree.lines(), vec!["| first", "| second"]);
}

#[rstest]
#[tokio::test]
async fn test_each_stream_keeps_its_order(tree: TestTree) {
    tree.log
        .run(&Cmd::new(["seq", "1", "2000"]).quiet(true))
        .await
        .unwrap();
    let expected: Vec<String> = (1..=2000).map(|i| format!("| {i}")).collect();
    assert_eq!(tree.lines(), expected);
}

#[rstest]
#[tokio::test]
async fn test_no_shell_interpretation(tree: TestTree) {
    tree.log
        .run(&Cmd::new(["echo", "$HOME", "*", "a;b"]))
        .await
        .unwrap();
    assert_eq!(tree.lines(), vec!["$ echo $HOME * a;b", "  | $HOME * a;b"]);
}

#[rstest]
#[tokio::test]
async fn test_output_still_shown_before_failure(tree: TestTree) {
    let err = tree
        .log
        .run(&Cmd::new(["sh", "-c", "echo partial; exit 3"]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CommandFailed { code: Some(3), .. }));
    assert_eq!(tree.lines(), vec!["$ sh -c echo partial; exit 3", "  | partial"]);
}

#[rstest]
#[tokio::test]
async fn test_background_grandchild_does_not_block(tree: TestTree) {
    // The grandchild inherits the pipes and outlives the child
    let started = std::time::Instant::now();
    tree.log
        .run(&Cmd::new(["sh", "-c", "sleep 5 & echo done"]).quiet(true))
        .await
        .unwrap();
    assert!(started.elapsed() < std::time::Duration::from_secs(4));
    assert_eq!(tree.lines(), vec!["| done"]);
}

#[rstest]
#[tokio::test(flavor = "current_thread")]
async fn test_runs_on_single_threaded_runtime(tree: TestTree) {
    tree.log
        .run(&Cmd::new(["sh", "-c", "echo one; echo two >&2; echo three"]).quiet(true))
        .await
        .unwrap();
    let lines = tree.lines();
    assert_eq!(lines.len(), 3);
    let stdout: Vec<_> = lines.iter().filter(|l| *l != "| two").collect();
    assert_eq!(stdout, ["| one", "| three"]);
}

#[tokio::test]
async fn test_sink_failure_while_streaming_is_reported() {
    // Quiet, so the first failing write comes from a reader task
    let log = Log::new(Arc::new(ClosedPipe));
    let err = log
        .run(&Cmd::new(["echo", "x"]).quiet(true))
        .await
        .unwrap_err();
    match err {
        Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected sink error, got {other:?}"),
    }
}
