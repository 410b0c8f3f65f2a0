//! Operation client round trips over the scripted transport.
//!
//! Each test checks the request that went over the wire as well as the
//! typed result mapped from the canned response.

mod common;

use common::harness::{RecordedCall, STREAM};
use common::TestHarness;
use pretty_assertions::assert_eq;
use serde_json::json;

use nblm::models::{
    ArtifactKind, ArtifactStatus, AudioFormat, AudioLength, AudioOptions, ChatGoal, ResearchDepth,
    ResearchPoll, ResearchSource, ResponseLength, SourceType,
};
use nblm::rpc::ops;
use nblm::NblmError;

fn listing() -> serde_json::Value {
    json!([[
        ["Research", [[["src-1"], "Paper A"], [["src-2"], "Paper B"]], "nb-1", "📘", null, [1, true]],
        ["From a friend", [], "nb-2", null, null, [2]]
    ]])
}

fn notebook_detail() -> serde_json::Value {
    json!([[
        "Research",
        [
            [["src-1"], "Design doc", [["drive-1"], null, null, null, 1]],
            [["src-2"], "Pasted", [null, null, null, null, 4]]
        ],
        "nb-1"
    ]])
}

#[tokio::test]
async fn test_list_notebooks_derives_tokens_once() {
    let harness = TestHarness::new();
    harness.transport.reply(ops::LIST_NOTEBOOKS, listing());
    let client = harness.ctx.client().await.unwrap();

    let notebooks = client.list_notebooks().await.unwrap();
    assert_eq!(notebooks.len(), 2);
    assert_eq!(notebooks[0].source_count, 2);
    assert!(notebooks[0].is_owned);
    assert!(notebooks[0].is_shared);
    assert!(!notebooks[1].is_owned);

    client.list_notebooks().await.unwrap();
    assert_eq!(harness.transport.page_fetches(), 1);

    let calls = harness.transport.calls_for(ops::LIST_NOTEBOOKS);
    assert_eq!(calls.len(), 2);
    let call: &RecordedCall = &calls[0];
    assert_eq!(call.csrf_token.as_deref(), Some("csrf:1700"));
    assert_eq!(call.query_param("f.sid").as_deref(), Some("-4242"));
    assert_eq!(call.query_param("source-path").as_deref(), Some("/"));
    assert_eq!(call.query_param("rt").as_deref(), Some("c"));
    assert_eq!(call.params(), json!([null, 1, null, [2]]));
    assert_eq!(call.envelope[0][0][3], json!("generic"));
}

#[tokio::test]
async fn test_concurrent_first_calls_share_token_derivation() {
    let harness = TestHarness::new();
    harness.transport.reply(ops::LIST_NOTEBOOKS, listing());
    let client = harness.ctx.client().await.unwrap();

    let (first, second) = tokio::join!(client.list_notebooks(), client.list_notebooks());
    assert_eq!(first.unwrap().len(), 2);
    assert_eq!(second.unwrap().len(), 2);

    assert_eq!(harness.transport.page_fetches(), 1);
    for call in harness.transport.calls_for(ops::LIST_NOTEBOOKS) {
        assert_eq!(call.csrf_token.as_deref(), Some("csrf:1700"));
    }
}

#[tokio::test]
async fn test_empty_response_maps_to_empty_list() {
    let harness = TestHarness::new();
    let client = harness.ctx.client().await.unwrap();

    assert!(client.list_notebooks().await.unwrap().is_empty());
    assert_eq!(client.get_notebook("nb-x").await.unwrap(), None);
    assert!(!client.delete_notebook("nb-x").await.unwrap());
}

#[tokio::test]
async fn test_notebook_lifecycle_requests() {
    let harness = TestHarness::new();
    harness
        .transport
        .reply(ops::CREATE_NOTEBOOK, json!(["", null, "nb-new", null]));
    harness.transport.reply(ops::UPDATE_NOTEBOOK, json!(["Renamed"]));
    harness.transport.reply(ops::DELETE_NOTEBOOK, json!([]));
    let client = harness.ctx.client().await.unwrap();

    let created = client.create_notebook("Plans").await.unwrap().unwrap();
    assert_eq!(created.id, "nb-new");
    assert_eq!(created.title, "Plans");

    assert!(client.rename_notebook("nb-new", "Renamed").await.unwrap());
    assert!(client.delete_notebook("nb-new").await.unwrap());

    let rename = &harness.transport.calls_for(ops::UPDATE_NOTEBOOK)[0];
    assert_eq!(
        rename.params(),
        json!(["nb-new", [[null, null, null, [null, "Renamed"]]]])
    );
    assert_eq!(
        rename.query_param("source-path").as_deref(),
        Some("/notebook/nb-new")
    );
    assert_eq!(
        harness.transport.calls_for(ops::DELETE_NOTEBOOK)[0].params(),
        json!([["nb-new"], [2]])
    );
}

#[tokio::test]
async fn test_notebook_sources_carry_drive_links() {
    let harness = TestHarness::new();
    harness.transport.reply(ops::GET_NOTEBOOK, notebook_detail());
    let client = harness.ctx.client().await.unwrap();

    let sources = client.get_notebook_sources("nb-1").await.unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].source_type, SourceType::GoogleDocs);
    assert_eq!(sources[0].drive_doc_id.as_deref(), Some("drive-1"));
    assert!(sources[0].can_sync);
    assert_eq!(sources[1].source_type, SourceType::PastedText);
    assert!(!sources[1].can_sync);
}

#[tokio::test]
async fn test_query_without_ids_uses_every_source() {
    let harness = TestHarness::new();
    harness.transport.reply(ops::GET_NOTEBOOK, notebook_detail());
    harness.transport.answer("Both documents agree.");
    let client = harness.ctx.client().await.unwrap();

    let answer = client
        .query("nb-1", "Do they agree?", None, None)
        .await
        .unwrap();
    assert_eq!(answer.answer, "Both documents agree.");
    assert_eq!(answer.conversation_id.len(), 36);

    assert_eq!(
        harness.transport.call_keys(),
        vec![ops::GET_NOTEBOOK.to_string(), STREAM.to_string()]
    );
    let params = harness.transport.calls_for(STREAM)[0].stream_params();
    assert_eq!(params[0], json!([[[["src-1"]]], [[["src-2"]]]]));
    assert_eq!(params[1], json!("Do they agree?"));
    assert_eq!(params[3], json!([2, null, [1]]));
    assert_eq!(params[4], json!(answer.conversation_id));
}

#[tokio::test]
async fn test_query_follow_up_keeps_conversation() {
    let harness = TestHarness::new();
    harness.transport.answer("Yes.");
    let client = harness.ctx.client().await.unwrap();

    let answer = client
        .query("nb-1", "And then?", Some(vec!["s9".into()]), Some("conv-1".into()))
        .await
        .unwrap();
    assert_eq!(answer.conversation_id, "conv-1");
    assert_eq!(harness.transport.call_keys(), vec![STREAM.to_string()]);
}

#[tokio::test]
async fn test_configure_chat_sends_custom_prompt() {
    let harness = TestHarness::new();
    harness.transport.reply(
        ops::UPDATE_NOTEBOOK,
        json!(["T", null, "nb-1", null, null, [1], null, [[2, "Be terse"], [5]]]),
    );
    let client = harness.ctx.client().await.unwrap();

    let settings = client
        .configure_chat("nb-1", ChatGoal::Custom, Some("Be terse"), ResponseLength::Shorter)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settings.custom_prompt.as_deref(), Some("Be terse"));

    let params = harness.transport.calls_for(ops::UPDATE_NOTEBOOK)[0].params();
    assert_eq!(params[1][0][7], json!([[2, "Be terse"], [5]]));
}

#[tokio::test]
async fn test_configure_chat_rejects_missing_prompt_without_calling() {
    let harness = TestHarness::new();
    let client = harness.ctx.client().await.unwrap();

    let err = client
        .configure_chat("nb-1", ChatGoal::Custom, None, ResponseLength::Default)
        .await
        .unwrap_err();
    assert!(matches!(err, NblmError::Validation(_)));
    assert!(harness.transport.calls().is_empty());
}

#[tokio::test]
async fn test_add_url_source() {
    let harness = TestHarness::new();
    harness
        .transport
        .reply(ops::ADD_SOURCE, json!([[[["src-7"], "Example Domain"]]]));
    let client = harness.ctx.client().await.unwrap();

    let added = client
        .add_url_source("nb-1", "https://example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(added.id, "src-7");
    assert_eq!(added.title, "Example Domain");

    let params = harness.transport.calls_for(ops::ADD_SOURCE)[0].params();
    assert_eq!(params[0][0][0][2], json!(["https://example.com"]));
    assert_eq!(params[1], json!("nb-1"));
}

#[tokio::test]
async fn test_research_round_trip() {
    let harness = TestHarness::new();
    harness
        .transport
        .reply(ops::START_FAST_RESEARCH, json!(["task-1", null]));
    harness.transport.reply(
        ops::POLL_RESEARCH,
        json!([[[
            "task-1",
            [
                "nb-1",
                ["rust runtimes", 1],
                1,
                [[["https://tokio.rs", "Tokio", "Async runtime", 1]], "One runtime."],
                2
            ],
            [1735000000, 0]
        ]]]),
    );
    harness
        .transport
        .reply(ops::IMPORT_RESEARCH, json!([[[["src-9"], "Tokio"]]]));
    let client = harness.ctx.client().await.unwrap();

    let handle = client
        .start_research("nb-1", "rust runtimes", ResearchSource::Web, ResearchDepth::Fast)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(handle.task_id, "task-1");
    assert_eq!(
        harness.transport.calls_for(ops::START_FAST_RESEARCH)[0].params(),
        json!([["rust runtimes", 1], null, 1, "nb-1"])
    );

    let ResearchPoll::Task(task) = client.poll_research("nb-1").await.unwrap() else {
        panic!("expected a research task");
    };
    assert!(task.is_completed());
    assert_eq!(task.discovered.len(), 1);

    let imported = client
        .import_research_sources("nb-1", &task.task_id, &task.discovered)
        .await
        .unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].id, "src-9");

    let params = harness.transport.calls_for(ops::IMPORT_RESEARCH)[0].params();
    assert_eq!(params[2], json!("task-1"));
    assert_eq!(
        params[4],
        json!([[null, null, ["https://tokio.rs", "Tokio"], null, null, null, null, null, null, null, 2]])
    );
}

#[tokio::test]
async fn test_deep_drive_research_is_rejected_before_transport() {
    let harness = TestHarness::new();
    let client = harness.ctx.client().await.unwrap();

    let err = client
        .start_research("nb-1", "q", ResearchSource::Drive, ResearchDepth::Deep)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Deep Research only supports Web sources"));
    assert!(harness.transport.calls().is_empty());
}

#[tokio::test]
async fn test_studio_create_poll_delete() {
    let harness = TestHarness::new();
    harness
        .transport
        .reply(ops::CREATE_STUDIO, json!([["art-1", "Overview", 1, [], 1]]));
    harness.transport.reply(
        ops::POLL_STUDIO,
        json!([[
            ["art-1", "Overview", 1, [], 3, null, [null, null, null, "https://media/a1", null, null, null, null, null, [742, 0]]]
        ]]),
    );
    harness.transport.reply(ops::DELETE_STUDIO, json!([]));
    let client = harness.ctx.client().await.unwrap();

    let options = AudioOptions {
        format: AudioFormat::Debate,
        length: AudioLength::Short,
        language: "en".into(),
        focus_prompt: String::new(),
    };
    let ticket = client
        .create_audio_overview("nb-1", &["s1".to_string()], options)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ticket.artifact_id.as_deref(), Some("art-1"));
    assert_eq!(ticket.status, ArtifactStatus::InProgress);

    let artifacts = client.poll_studio("nb-1").await.unwrap();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].kind, ArtifactKind::Audio);
    assert_eq!(artifacts[0].status, ArtifactStatus::Completed);
    assert_eq!(artifacts[0].duration_seconds, Some(742));

    assert!(client.delete_studio_artifact("art-1").await.unwrap());
    assert_eq!(
        harness.transport.calls_for(ops::DELETE_STUDIO)[0].params(),
        json!([[2], "art-1"])
    );
}

#[tokio::test]
async fn test_login_redirect_is_auth_expired() {
    let harness = TestHarness::new();
    harness.transport.expire_session();
    let client = harness.ctx.client().await.unwrap();

    let err = client.list_notebooks().await.unwrap_err();
    assert!(matches!(err, NblmError::AuthExpired));
    assert!(harness.transport.calls().is_empty());
}

#[tokio::test]
async fn test_landing_page_without_token() {
    let harness = TestHarness::new();
    harness.transport.set_landing_body("<html>no tokens here</html>");
    let client = harness.ctx.client().await.unwrap();

    let err = client.list_notebooks().await.unwrap_err();
    assert!(matches!(err, NblmError::TokenExtraction(_)));
}

#[tokio::test]
async fn test_missing_credentials() {
    let harness = TestHarness::without_credentials();
    let err = harness.ctx.client().await.err().unwrap();
    assert!(matches!(err, NblmError::MissingAuth(_)));
}
