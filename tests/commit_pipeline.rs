mod common;

use common::{Call, harness, harness_with};
use configtable::{
    CommitPhase, ConfigItem, EditorError, EditorOptions, FieldType, NoticeKind, Prompt,
    RestartTrigger, SaveMode, SaveOutcome,
};
use serde_json::json;

fn basic_items() -> Vec<ConfigItem> {
    let mut name = ConfigItem::new("name", FieldType::Str, json!("bot"));
    name.title = Some("Name".into());
    let port = ConfigItem::new("port", FieldType::Int, json!(8080));
    let debug = ConfigItem::new("debug", FieldType::Bool, json!(false));
    let mut admins = ConfigItem::new("admins", FieldType::List, json!(["alice"]));
    admins.element_type = Some(FieldType::Str);
    vec![name, port, debug, admins]
}

#[tokio::test]
async fn payload_contains_exactly_the_edited_keys() {
    let mut h = harness(basic_items()).await;
    h.editor.stage("name", "nova").unwrap();
    h.editor.stage("debug", "true").unwrap();
    assert_eq!(h.editor.phase(), CommitPhase::Dirty);

    let outcome = h.editor.save(SaveMode::Normal).await.unwrap();
    assert_eq!(
        outcome,
        SaveOutcome::Saved {
            restart_keys: Vec::new()
        }
    );
    assert_eq!(
        h.service.batches(),
        vec![vec![
            ("name".to_string(), "nova".to_string()),
            ("debug".to_string(), "true".to_string()),
        ]]
    );
    assert_eq!(
        h.service.calls(),
        vec![
            Call::Batch(vec![
                ("name".to_string(), "nova".to_string()),
                ("debug".to_string(), "true".to_string()),
            ]),
            Call::Save,
            Call::List,
        ]
    );

    let persisted = h.service.memory().persisted().await;
    let items = &persisted.namespaces[common::NAMESPACE];
    assert_eq!(items[0].value, json!("nova"));
    assert_eq!(items[2].value, json!(true));
    assert_eq!(items[1].value, json!(8080));

    assert!(!h.editor.can_save());
    assert_eq!(h.editor.phase(), CommitPhase::Clean);
    assert_eq!(h.notifier.last().unwrap().kind, NoticeKind::Success);
}

#[tokio::test]
async fn restaging_the_original_value_still_counts_as_dirty() {
    let mut h = harness(basic_items()).await;
    h.editor.stage("port", "8080").unwrap();
    h.editor.save(SaveMode::Normal).await.unwrap();
    assert_eq!(
        h.service.batches(),
        vec![vec![("port".to_string(), "8080".to_string())]]
    );
}

#[tokio::test]
async fn saving_without_changes_never_calls_the_service() {
    let mut h = harness(basic_items()).await;
    let outcome = h.editor.save(SaveMode::Normal).await.unwrap();
    assert_eq!(outcome, SaveOutcome::NothingToSave);
    assert!(h.service.calls().is_empty());
}

#[tokio::test]
async fn blank_required_field_blocks_until_forced() {
    let mut items = basic_items();
    let mut token = ConfigItem::new("x", FieldType::Str, json!(""));
    token.required = true;
    token.title = Some("Token".into());
    items.push(token);
    let mut h = harness(items).await;

    h.editor.stage("name", "nova").unwrap();
    let outcome = h.editor.save(SaveMode::Normal).await.unwrap();
    let SaveOutcome::Blocked { missing } = outcome else {
        panic!("expected a blocked save, got {outcome:?}");
    };
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].key, "x");
    assert_eq!(missing[0].title, "Token");
    assert_eq!(h.editor.phase(), CommitPhase::BlockedOnRequired);
    assert!(matches!(h.editor.prompt(), Some(Prompt::SaveAnyway { .. })));
    assert!(h.service.calls().is_empty());

    let forced = h.editor.confirm().await.unwrap();
    assert!(matches!(forced, Some(SaveOutcome::Saved { .. })));
    assert_eq!(
        h.service.batches(),
        vec![vec![("name".to_string(), "nova".to_string())]]
    );
    assert!(h.editor.prompt().is_none());
}

#[tokio::test]
async fn cancelling_the_save_anyway_prompt_keeps_edits() {
    let mut items = basic_items();
    let mut admins_required = ConfigItem::new("owners", FieldType::List, json!([]));
    admins_required.required = true;
    items.push(admins_required);
    let mut h = harness(items).await;

    h.editor.stage("port", "9090").unwrap();
    h.editor.save(SaveMode::Normal).await.unwrap();
    h.editor.cancel();
    assert!(h.editor.prompt().is_none());
    assert_eq!(h.editor.phase(), CommitPhase::Dirty);
    assert_eq!(h.editor.state().staged("port"), Some("9090"));
    assert!(h.service.calls().is_empty());
}

#[tokio::test]
async fn gated_off_required_item_is_skipped_and_disabled() {
    let toggle = ConfigItem::new("E", FieldType::Bool, json!(false));
    let mut gated = ConfigItem::new("x", FieldType::Str, json!(""));
    gated.required = true;
    gated.enable_toggle = Some("E".into());
    let name = ConfigItem::new("name", FieldType::Str, json!("bot"));
    let items = vec![toggle, gated, name];

    let mut h = harness_with(items, |editor| {
        editor.with_options(EditorOptions::default().with_override_mode(true))
    })
    .await;

    let rows = h.editor.rows();
    let gated_row = rows
        .iter()
        .find(|row| row.binding.key == "x")
        .expect("row for x");
    assert!(gated_row.disabled);
    assert!(!rows.iter().find(|row| row.binding.key == "E").unwrap().disabled);

    h.editor.stage("name", "nova").unwrap();
    let outcome = h.editor.save(SaveMode::Normal).await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved { .. }));

    // Switching the toggle on makes the blank field count again.
    h.editor.stage("E", "true").unwrap();
    let outcome = h.editor.save(SaveMode::Normal).await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Blocked { .. }));
    assert!(!h.editor.rows().iter().any(|row| row.disabled));
}

#[tokio::test]
async fn toggle_gating_only_applies_on_override_pages() {
    let toggle = ConfigItem::new("E", FieldType::Bool, json!(false));
    let mut gated = ConfigItem::new("x", FieldType::Str, json!(""));
    gated.required = true;
    gated.enable_toggle = Some("E".into());
    let mut h = harness(vec![toggle, gated]).await;

    assert!(!h.editor.rows().iter().any(|row| row.disabled));
    h.editor.stage("E", "false").unwrap();
    let outcome = h.editor.save(SaveMode::Normal).await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Blocked { .. }));
}

#[tokio::test]
async fn restart_prompt_follows_committed_restart_items() {
    let mut items = basic_items();
    items[1].is_need_restart = true;
    let mut h = harness(items).await;

    h.editor.stage("name", "nova").unwrap();
    let outcome = h.editor.save(SaveMode::Normal).await.unwrap();
    assert!(!outcome.needs_restart());
    assert!(h.editor.prompt().is_none());

    h.editor.stage("port", "9000").unwrap();
    let outcome = h.editor.save(SaveMode::Normal).await.unwrap();
    assert!(outcome.needs_restart());
    assert_eq!(
        h.editor.prompt(),
        Some(&Prompt::Restart {
            keys: vec!["port".to_string()]
        })
    );

    h.editor.confirm().await.unwrap();
    assert_eq!(h.restart.calls(), 1);
    assert!(h.editor.prompt().is_none());
    assert!(!h.editor.is_restarting());
    let last = h.notifier.last().unwrap();
    assert_eq!(last.kind, NoticeKind::Success);
    assert_eq!(last.message, "Restart requested");
}

#[tokio::test]
async fn edits_continue_while_a_restart_is_in_flight() {
    let mut items = basic_items();
    items[1].is_need_restart = true;
    let mut h = harness(items).await;
    h.editor.stage("port", "9000").unwrap();
    h.editor.save(SaveMode::Normal).await.unwrap();

    let trigger = h.editor.begin_restart().unwrap();
    assert!(h.editor.is_restarting());
    assert!(h.editor.prompt().is_none());

    h.editor.stage("port", "9100").unwrap();
    let outcome = h.editor.save(SaveMode::Normal).await.unwrap();
    assert!(outcome.needs_restart());
    let err = h.editor.confirm().await.unwrap_err();
    assert!(matches!(err, EditorError::RestartInProgress));
    assert!(h.editor.prompt().is_none());
    assert_eq!(h.notifier.last().unwrap().kind, NoticeKind::Warning);
    assert_eq!(h.restart.calls(), 0);

    let response = trigger.restart_system().await;
    assert!(h.editor.finish_restart(response).unwrap());
    assert!(!h.editor.is_restarting());
    assert_eq!(h.restart.calls(), 1);
    assert!(h.editor.begin_restart().is_ok());
}

#[tokio::test]
async fn refused_restart_is_reported_as_error() {
    let mut items = basic_items();
    items[0].is_need_restart = true;
    let mut h = harness_with(items, |editor| {
        editor.with_restart_trigger(std::sync::Arc::new(common::FakeRestart::new(false)))
    })
    .await;

    h.editor.stage("name", "nova").unwrap();
    h.editor.save(SaveMode::Normal).await.unwrap();
    let accepted = h.editor.confirm_restart().await.unwrap();
    assert!(!accepted);
    assert_eq!(h.notifier.last().unwrap().message, "Restart failed");
}

#[tokio::test]
async fn dismissing_the_restart_prompt_does_not_restart() {
    let mut items = basic_items();
    items[0].is_need_restart = true;
    let mut h = harness(items).await;

    h.editor.stage("name", "nova").unwrap();
    h.editor.save(SaveMode::Normal).await.unwrap();
    h.editor.dismiss_restart();
    assert!(h.editor.prompt().is_none());
    assert_eq!(h.restart.calls(), 0);
}

#[tokio::test]
async fn restart_without_trigger_is_unavailable() {
    let service = std::sync::Arc::new(common::RecordingService::new(basic_items()));
    let notifier = std::sync::Arc::new(common::CapturingNotifier::default());
    let mut editor = configtable::ConfigEditor::new(common::NAMESPACE, service, notifier.clone());
    editor.load().await.unwrap();

    let err = editor.confirm_restart().await.unwrap_err();
    assert!(matches!(err, EditorError::RestartUnavailable));
    assert_eq!(notifier.count(NoticeKind::Error), 1);
}

#[tokio::test]
async fn failed_batch_update_leaves_edits_staged() {
    let mut h = harness(basic_items()).await;
    h.service.fail_on(Some("batch"));
    h.editor.stage("name", "nova").unwrap();

    let err = h.editor.save(SaveMode::Normal).await.unwrap_err();
    assert!(matches!(err, EditorError::Service(_)));
    assert!(h.editor.state().is_dirty("name"));
    assert_eq!(h.editor.state().staged("name"), Some("nova"));
    assert_eq!(h.editor.phase(), CommitPhase::Dirty);
    assert_eq!(h.notifier.last().unwrap().kind, NoticeKind::Error);
    assert!(!h.service.calls().contains(&Call::Save));

    h.service.fail_on(None);
    let outcome = h.editor.save(SaveMode::Normal).await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved { .. }));
}

#[tokio::test]
async fn failed_persist_keeps_the_dirty_set() {
    let mut h = harness(basic_items()).await;
    h.service.fail_on(Some("save"));
    h.editor.stage("port", "1").unwrap();

    assert!(h.editor.save(SaveMode::Normal).await.is_err());
    assert!(h.editor.can_save());
    let persisted = h.service.memory().persisted().await;
    assert_eq!(persisted.namespaces[common::NAMESPACE][1].value, json!(8080));
}

#[tokio::test]
async fn refresh_hook_runs_after_a_successful_save() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let hits = std::sync::Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let mut h = harness_with(basic_items(), move |editor| {
        editor.with_refresh_hook(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    })
    .await;

    h.service.fail_on(Some("batch"));
    h.editor.stage("name", "a").unwrap();
    let _ = h.editor.save(SaveMode::Normal).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    h.service.fail_on(None);
    h.editor.save(SaveMode::Normal).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_keys_are_rejected() {
    let mut h = harness(basic_items()).await;
    let err = h.editor.stage("nope", "1").unwrap_err();
    assert!(matches!(err, EditorError::UnknownKey(key) if key == "nope"));
    assert!(!h.editor.can_save());
}
