//! Preview documents run in an embedded engine, and the channel across reloads

use marklet_sandbox::{
    build_document, channel, ConsoleLevel, ConsoleLog, ConsoleLogEntry, HostBridge,
    InboundMessage, PreviewConfig, PreviewSession,
};
use marklet_test_utils::js::run_preview;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

fn console(level: &str, payload: &str) -> serde_json::Value {
    json!({"type": "bookmarklet-console", "level": level, "payload": payload})
}

#[test]
fn log_then_throw_scenario() {
    let mut session = PreviewSession::default();
    let preview = session.load("console.log('hi'); throw new Error('boom')");
    let realm = preview.realm;
    let run = run_preview(&preview.document);

    assert_eq!(
        run.posted,
        vec![
            console("log", "hi"),
            console("error", "boom"),
        ]
    );
    assert_eq!(run.faults, vec!["boom"]);

    for message in run.posted {
        session.bridge().on_message(InboundMessage::new(realm, message));
    }
    let entries = session.bridge().log().entries();
    let lines: Vec<_> = entries.iter().map(|e| (e.level, e.message.as_str())).collect();
    assert_eq!(
        lines,
        vec![(ConsoleLevel::Log, "hi"), (ConsoleLevel::Error, "boom")]
    );
}

#[test]
fn console_arguments_are_joined_as_text() {
    let run = run_preview(&build_document(
        "console.info('n', 2, {a: 1}, [true]); console.warn(undefined); console.error('x')",
    ));
    assert_eq!(
        run.console(),
        vec![
            ("info".to_string(), r#"n 2 {"a":1} [true]"#.to_string()),
            ("warn".to_string(), "undefined".to_string()),
            ("error".to_string(), "x".to_string()),
        ]
    );
}

#[test]
fn dialogs_answer_without_blocking() {
    let run = run_preview(&build_document(
        "alert('hey'); console.log(String(confirm('sure?')), String(prompt('name', 'ann')), String(prompt('age')))",
    ));
    assert_eq!(
        run.console(),
        vec![
            ("info".to_string(), "hey".to_string()),
            ("info".to_string(), "sure?".to_string()),
            ("info".to_string(), "name (ann)".to_string()),
            ("info".to_string(), "age".to_string()),
            ("log".to_string(), "false null null".to_string()),
        ]
    );
    assert_eq!(run.output, vec!["hey", "sure?", "name (ann)", "age"]);
    assert_eq!(run.notice, None);
}

#[test]
fn fault_is_reported_once_as_text() {
    let run = run_preview(&build_document("throw new Error('<b>bad</b>')"));
    assert_eq!(run.console(), vec![("error".to_string(), "<b>bad</b>".to_string())]);
    assert_eq!(run.faults, vec!["<b>bad</b>"]);
}

#[test]
fn silent_script_shows_notice() {
    let run = run_preview(&build_document("var quiet = 1"));
    assert!(run.posted.is_empty());
    assert_eq!(
        run.notice.as_deref(),
        Some("No visible output. Check the console or DOM changes.")
    );
}

#[test]
fn user_script_syntax_error_reaches_error_listener() {
    let run = run_preview(&build_document("console.log('never'"));
    let console = run.console();
    assert_eq!(console.len(), 1);
    assert_eq!(console[0].0, "error");
    assert!(console[0].1.contains("SyntaxError"), "{}", console[0].1);
}

#[test]
fn shim_hook_is_not_enumerable() {
    let run = run_preview(&build_document(
        "console.log(String(Object.keys(window).indexOf('__marklet')), typeof window.__marklet.fault)",
    ));
    assert_eq!(run.console(), vec![("log".to_string(), "-1 function".to_string())]);
}

#[test]
fn stale_realm_output_is_dropped_after_reload() {
    let mut session = PreviewSession::new(
        Arc::new(HostBridge::default()),
        PreviewConfig::default(),
    );
    let old = session.load("setInterval(() => console.log('tick'), 10)").realm;
    let new = session.load("console.log('fresh')").realm;

    assert!(session
        .bridge()
        .on_message(InboundMessage::new(old, console("log", "tick")))
        .is_none());
    assert!(session
        .bridge()
        .on_message(InboundMessage::new(new, console("log", "fresh")))
        .is_some());
    assert_eq!(session.bridge().log().export_text(None), "[log] fresh");
}

#[test]
fn clear_on_reload_leaves_no_stale_entries() {
    let bridge = Arc::new(HostBridge::default());
    let mut session = PreviewSession::new(
        Arc::clone(&bridge),
        PreviewConfig {
            clear_on_reload: true,
        },
    );
    let old = session.load("setInterval(tick, 0)").realm;

    let stop = Arc::new(AtomicBool::new(false));
    let flood = thread::spawn({
        let bridge = Arc::clone(&bridge);
        let stop = Arc::clone(&stop);
        move || {
            while !stop.load(Ordering::Relaxed) {
                bridge.on_message(InboundMessage::new(old, console("log", "tick")));
            }
        }
    });
    while bridge.log().is_empty() {
        thread::yield_now();
    }

    session.load("console.log('fresh')");
    assert!(bridge.log().is_empty());
    stop.store(true, Ordering::Relaxed);
    flood.join().unwrap();
    assert!(bridge.log().is_empty());
}

#[test]
fn document_escapes_embedded_script_close() {
    let mut session = PreviewSession::default();
    let preview = session.load("document.body.innerHTML = '</script><b>x</b>'");
    assert!(preview.document.contains(r"'<\/script><b>x</b>'"));
    assert_eq!(preview.document.matches("</script>").count(), 3);
}

#[tokio::test]
async fn pump_drains_until_senders_close() {
    let bridge = Arc::new(HostBridge::default());
    let mut session = PreviewSession::new(Arc::clone(&bridge), PreviewConfig::default());
    let realm = session.load("console.warn('w')").realm;

    let (tx, rx) = channel(8);
    let pump = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        async move { bridge.pump(rx).await }
    });

    tx.send(InboundMessage::new(realm, console("warn", "w"))).await.unwrap();
    tx.send(InboundMessage::new(realm, json!({"type": "noise"}))).await.unwrap();
    tx.send(InboundMessage::new(realm, console("info", "done"))).await.unwrap();
    drop(tx);

    assert_eq!(pump.await.unwrap(), 2);
    assert_eq!(bridge.log().export_text(None), "[warn] w\n[info] done");
}

fn level() -> impl Strategy<Value = ConsoleLevel> {
    prop::sample::select(ConsoleLevel::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_log_keeps_newest_within_capacity(
        capacity in 1usize..20,
        lines in prop::collection::vec((level(), "[a-z]{0,6}"), 0..60)
    ) {
        let log = ConsoleLog::new(capacity);
        for (level, message) in &lines {
            log.append(ConsoleLogEntry::new(*level, message.clone()));
            prop_assert!(log.len() <= capacity);
        }

        let kept: Vec<_> = log.entries().into_iter().map(|e| (e.level, e.message)).collect();
        let start = lines.len().saturating_sub(capacity);
        prop_assert_eq!(kept, lines[start..].to_vec());
    }
}
