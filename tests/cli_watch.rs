//! E2E tests for `jsonfold watch`
//!
//! The binary is started in the background, the test edits files on disk and
//! polls the outputs, then kills the process.

mod common;

use std::time::Duration;

use common::*;
use serde_json::json;

const TIMEOUT: Duration = Duration::from_secs(10);

fn single_group_config(delay_us: u64) -> serde_json::Value {
    json!({
        "delay": delay_us,
        "list": [{"name": "en", "output": "dist/en.json", "watchList": [{"folders": ["locales/en"]}]}]
    })
}

#[test]
fn watch_performs_initial_merge() {
    let env = TestEnv::new();
    env.write("locales/en/common.json", EN_COMMON);
    env.write_config(&single_group_config(50_000));

    let mut child = env.spawn(&["watch"]);
    let out = env.path("dist/en.json");
    let merged = wait_for_content(&out, TIMEOUT, |c| c.contains("\"hello\": \"Hello\""));

    let _ = child.kill();
    let _ = child.wait();
    assert!(merged, "initial merge never produced {}", out.display());
}

#[test]
fn watch_rebuilds_after_source_change() {
    let env = TestEnv::new();
    env.write("locales/en/common.json", EN_COMMON);
    env.write_config(&single_group_config(50_000));

    let mut child = env.spawn(&[]);
    let out = env.path("dist/en.json");
    assert!(wait_for_content(&out, TIMEOUT, |c| c.contains("Hello")));

    env.write("locales/en/common.json", r#"{"hello": "Howdy"}"#);
    let rebuilt = wait_for_content(&out, TIMEOUT, |c| c.contains("Howdy"));

    let _ = child.kill();
    let _ = child.wait();
    assert!(rebuilt, "output was not rebuilt after the source changed");
}

#[test]
fn watch_restarts_groups_when_config_changes() {
    let env = TestEnv::new();
    env.write("locales/en/common.json", EN_COMMON);
    env.write("locales/fr/common.json", FR_COMMON);
    env.write_config(&single_group_config(50_000));

    let mut child = env.spawn(&["watch"]);
    assert!(wait_for_content(&env.path("dist/en.json"), TIMEOUT, |c| c.contains("Hello")));

    env.write_config(&json!({
        "delay": 50_000,
        "list": [{"name": "fr", "output": "dist/fr.json", "watchList": [{"folders": ["locales/fr"]}]}]
    }));
    let reloaded = wait_for_content(&env.path("dist/fr.json"), TIMEOUT, |c| c.contains("Bonjour"));

    let _ = child.kill();
    let _ = child.wait();
    assert!(reloaded, "new group from reloaded config never ran");
}

#[test]
fn watch_recovers_from_broken_config() {
    let env = TestEnv::new();
    env.write("locales/en/common.json", EN_COMMON);
    env.write("config.json", "{ broken");

    let mut child = env.spawn(&["watch"]);
    std::thread::sleep(Duration::from_millis(300));
    assert!(
        child.try_wait().unwrap().is_none(),
        "watch must keep running with a broken config"
    );

    env.write_config(&single_group_config(50_000));
    let recovered = wait_for_content(&env.path("dist/en.json"), TIMEOUT, |c| c.contains("Hello"));

    let _ = child.kill();
    let _ = child.wait();
    assert!(recovered, "groups never started after the config was fixed");
}
