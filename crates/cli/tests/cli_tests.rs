#![expect(clippy::unwrap_used, reason = "test code")]

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn mindflow() -> Command {
    let mut cmd = Command::cargo_bin("mindflow").unwrap();
    cmd.env_remove("MINDFLOW_API_KEY")
        .env_remove("MINDFLOW_RESOURCE_COUNTRY")
        .env_remove("MINDFLOW_RESOURCE_LANGUAGE")
        .env("RUST_LOG", "error");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_cli_help() {
    mindflow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Crisis screening, mood insights and supportive chat"));
}

#[test]
fn test_classify_critical_text() {
    let json = stdout_json(mindflow().args(["classify", "I want to kill myself"]));
    assert_eq!(json["severity"], "critical");
    assert_eq!(json["is_risk"], true);
}

#[test]
fn test_classify_neutral_text() {
    let json = stdout_json(mindflow().args(["classify", "Lovely walk in the park"]));
    assert_eq!(json["severity"], "none");
    assert_eq!(json["is_risk"], false);
}

#[test]
fn test_self_check_suicide_flag() {
    let json = stdout_json(mindflow().args(["self-check", "--suicide"]));
    assert_eq!(json["risk_level"], "critical");
    assert_eq!(json["professional_referral_suggested"], true);
    assert!(!json["resources"].as_array().unwrap().is_empty());
}

#[test]
fn test_resources_for_unserved_locale() {
    let json = stdout_json(mindflow().args(["resources", "--country", "JP", "--language", "ja"]));
    let names: Vec<&str> =
        json.as_array().unwrap().iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Find A Helpline"]);
}

#[test]
fn test_chat_without_api_key_falls_back() {
    let json = stdout_json(mindflow().args(["chat", "I want to kill myself"]));
    let turn = &json[0];
    assert_eq!(turn["reply"]["model_used"], "fallback");
    assert_eq!(turn["classification"]["severity"], "critical");
    assert!(!turn["crisis_alert"]["resources"].as_array().unwrap().is_empty());
    assert_eq!(turn["states"][2], "escalated");
}

#[test]
fn test_chat_requires_a_message() {
    mindflow().arg("chat").assert().failure();
}

#[test]
fn test_analyze_mood_file() {
    let samples: Vec<serde_json::Value> = (1..=20)
        .map(|day| {
            serde_json::json!({
                "timestamp": format!("2026-03-{day:02}T09:00:00Z"),
                "mood_score": 6,
                "energy": 5
            })
        })
        .collect();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&samples).unwrap().as_bytes()).unwrap();

    let json = stdout_json(mindflow().arg("analyze").arg(file.path()));
    assert_eq!(json["stats"]["streak_days"], 20);
    assert_eq!(json["stats"]["total_logs"], 20);
    assert_eq!(json["trends"]["data_points"].as_array().unwrap().len(), 20);
    assert_eq!(json["trends"]["overall_trend"], 0.0);
    let kinds: Vec<&str> = json["insights"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["kind"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"milestone"));
}

#[test]
fn test_analyze_rejects_invalid_score() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"[{"timestamp": "2026-03-01T09:00:00Z", "mood_score": 42}]"#).unwrap();
    mindflow()
        .arg("analyze")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("sample 0 rejected"));
}
