//! Record/replay integration tests.
//!
//! Runs the whole pipeline from hand-written cassettes, records that run
//! through the recording adapters, and replays the recording to show the
//! outcome is reproduced.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use clap::Parser;
use serde_json::{json, Value};

use taskpilot::adapters::live::filesystem::LiveFileSystem;
use taskpilot::adapters::recording::{
    RecordingCommandRunner, RecordingGitRepo, RecordingLlmClient, RecordingNotifier,
    RecordingPullRequestHost,
};
use taskpilot::adapters::replaying::{
    ReplayingCommandRunner, ReplayingGitRepo, ReplayingLlmClient, ReplayingNotifier,
    ReplayingPullRequestHost,
};
use taskpilot::cassette::config::CassetteConfig;
use taskpilot::cassette::format::Cassette;
use taskpilot::cassette::recorder::CassetteRecorder;
use taskpilot::cassette::session::RecordingSession;
use taskpilot::cli::Cli;
use taskpilot::config::Config;
use taskpilot::context::ServiceContext;
use taskpilot::pipeline;

const BRANCH: &str = "feature/K-9";
const TASK: &str = "jobId: job-9\nparentBranch: main\n---\n# K-9: Greet the user\nAdd greet.txt.\n";
const PLAN: &str = r#"{"explanation": "Add a greeting file.", "files": [{"path": "src/greet.txt", "content": "hi there\n"}], "validation_commands": [["test", "-f", "src/greet.txt"]], "commit_message": "feat(K-9): greet"}"#;

fn ok() -> Value {
    json!({ "ok": null })
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("AI_TASKS")).unwrap();
    std::fs::write(dir.path().join("AI_TASKS/feature-K-9.md"), TASK).unwrap();
    dir
}

fn write_cassette(dir: &Path, port: &str, interactions: &[(&str, Value)]) -> PathBuf {
    let mut recorder =
        CassetteRecorder::new(dir.join(format!("{port}.cassette.yaml")), format!("{port}-fixture"), "abc123");
    for (method, output) in interactions {
        recorder.record(port, *method, json!({}), output.clone());
    }
    recorder.finish().expect("cassette should be written")
}

/// A complete successful run, one cassette per port.
fn write_fixture(dir: &Path, llm_text: &str) {
    write_cassette(
        dir,
        "git",
        &[
            ("add", ok()),
            ("commit", ok()),
            ("add", ok()),
            ("status_porcelain", json!({"ok": "A  src/greet.txt\n"})),
            ("commit", ok()),
            ("push", ok()),
            ("remote_url", json!({"ok": "https://github.com/acme/greeter.git"})),
            ("mv", ok()),
            ("commit", ok()),
            ("push", ok()),
        ],
    );
    write_cassette(
        dir,
        "commands",
        &[("run", json!({"ok": {"exit_code": 0, "stdout": "", "stderr": ""}}))],
    );
    write_cassette(dir, "llm", &[("complete", json!({"ok": {"text": llm_text}}))]);
    write_cassette(
        dir,
        "forge",
        &[("create_pull_request", json!({"ok": "https://github.com/acme/greeter/pull/1"}))],
    );
    write_cassette(dir, "notifier", &[("notify", ok())]);
}

fn config_for(workdir: &Path) -> Config {
    let cli = Cli::parse_from(["taskpilot", BRANCH, "--workdir", workdir.to_str().unwrap()]);
    Config::from_lookup(&cli, |_| None).unwrap()
}

#[test]
fn binary_replays_a_full_run() {
    let ws = workspace();
    let cassettes = tempfile::tempdir().unwrap();
    write_fixture(cassettes.path(), PLAN);

    let output = Command::new(env!("CARGO_BIN_EXE_taskpilot"))
        .args([BRANCH, "--workdir", ws.path().to_str().unwrap()])
        .current_dir(ws.path())
        .env("TASKPILOT_REPLAY", cassettes.path())
        .env_remove("TASKPILOT_RECORD")
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(std::fs::read_to_string(ws.path().join("src/greet.txt")).unwrap(), "hi there\n");
    let task = std::fs::read_to_string(ws.path().join("AI_TASKS/feature-K-9.md")).unwrap();
    assert!(task.contains("**AI Plan of Action:**\nAdd a greeting file.\n"));
}

#[test]
fn binary_exits_with_failure_on_unparseable_plan() {
    let ws = workspace();
    let cassettes = tempfile::tempdir().unwrap();
    write_cassette(cassettes.path(), "llm", &[("complete", json!({"ok": {"text": "no json today"}}))]);

    let output = Command::new(env!("CARGO_BIN_EXE_taskpilot"))
        .args([BRANCH, "--workdir", ws.path().to_str().unwrap()])
        .current_dir(ws.path())
        .env("TASKPILOT_REPLAY", cassettes.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not parse change plan"));
}

/// Replays `cassettes` while recording every port into `session`.
fn recording_replay(cassettes: &CassetteConfig, workdir: &Path, session: &RecordingSession) -> ServiceContext {
    let replayers = cassettes.load_all().unwrap();
    ServiceContext {
        fs: Box::new(LiveFileSystem::new(workdir)),
        git: Box::new(RecordingGitRepo::new(
            Box::new(ReplayingGitRepo::new(replayers.git.unwrap())),
            Arc::clone(&session.git),
        )),
        commands: Box::new(RecordingCommandRunner::new(
            Box::new(ReplayingCommandRunner::new(replayers.commands.unwrap())),
            Arc::clone(&session.commands),
        )),
        llm: Box::new(RecordingLlmClient::new(
            Box::new(ReplayingLlmClient::new(replayers.llm.unwrap())),
            Arc::clone(&session.llm),
        )),
        forge: Some(Box::new(RecordingPullRequestHost::new(
            Box::new(ReplayingPullRequestHost::new(replayers.forge.unwrap())),
            Arc::clone(&session.forge),
        ))),
        notifier: Some(Box::new(RecordingNotifier::new(
            Box::new(ReplayingNotifier::new(replayers.notifier.unwrap())),
            Arc::clone(&session.notifier),
        ))),
    }
}

#[tokio::test]
async fn recorded_run_replays_to_the_same_outcome() {
    let fixture = tempfile::tempdir().unwrap();
    write_fixture(fixture.path(), &format!("```json\n{PLAN}\n```"));

    // Phase 1: run from the fixture while recording.
    let first_ws = workspace();
    let record_root = tempfile::tempdir().unwrap();
    let session = RecordingSession::new(record_root.path(), first_ws.path()).unwrap();
    let ctx = recording_replay(&CassetteConfig::from_dir(fixture.path()), first_ws.path(), &session);
    let first = pipeline::run(&ctx, &config_for(first_ws.path())).await.unwrap();
    drop(ctx);
    let recorded = session.finish().unwrap();

    let git = Cassette::load(&recorded.join("git.cassette.yaml")).unwrap();
    let commits: Vec<&Value> = git
        .interactions
        .iter()
        .filter(|i| i.method == "commit")
        .map(|i| &i.input["message"])
        .collect();
    assert_eq!(
        commits,
        vec![
            &json!("docs: Log AI plan for K-9"),
            &json!("feat(K-9): greet"),
            &json!("chore: Archive task file for K-9"),
        ]
    );
    let forge = Cassette::load(&recorded.join("forge.cassette.yaml")).unwrap();
    assert_eq!(forge.interactions[0].input["repo"], "acme/greeter");
    assert_eq!(forge.interactions[0].input["pull"]["base"], "main");
    let notifier = Cassette::load(&recorded.join("notifier.cassette.yaml")).unwrap();
    assert_eq!(notifier.interactions[0].input["status"], "success");

    // Phase 2: replay the recording on a fresh workspace.
    let second_ws = workspace();
    let ctx = ServiceContext::replaying_from(&CassetteConfig::from_dir(&recorded), second_ws.path())
        .unwrap();
    let second = pipeline::run(&ctx, &config_for(second_ws.path())).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        second.pull_request_url.as_deref(),
        Some("https://github.com/acme/greeter/pull/1")
    );
    assert_eq!(
        std::fs::read_to_string(second_ws.path().join("src/greet.txt")).unwrap(),
        "hi there\n"
    );
}
