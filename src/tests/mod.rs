use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::loader::{self, LoadFailure, LoadOutcome, Loader, LoaderOptions};
use crate::output::{self, OutputFormat, OutputTable};
use crate::view::{FilterField, LoadState, SortField, SortOrder, TriviaView};

fn loader_for(server: &MockServer, amount: u32) -> Loader {
    Loader::new(LoaderOptions {
        endpoint: format!("{}/api.php", server.uri()),
        amount,
        timeout_seconds: 5,
        proxy: None,
    })
    .unwrap()
}

fn three_questions() -> serde_json::Value {
    json!({
        "response_code": 0,
        "results": [
            {
                "category": "Science &amp; Nature",
                "type": "multiple",
                "difficulty": "medium",
                "question": "What is &quot;H2O&quot;?",
                "correct_answer": "Water",
                "incorrect_answers": ["Salt", "Sand", "Air"]
            },
            {
                "category": "Entertainment: Music",
                "type": "boolean",
                "difficulty": "easy",
                "question": "Beyonc&eacute; was in Destiny&#039;s Child.",
                "correct_answer": "True",
                "incorrect_answers": ["False"]
            },
            {
                "category": "Science &amp; Nature",
                "type": "boolean",
                "difficulty": "hard",
                "question": "Light is faster than sound.",
                "correct_answer": "True",
                "incorrect_answers": ["False"]
            }
        ]
    })
}

async fn mount(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn load_view(server: &MockServer) -> (Arc<Mutex<TriviaView>>, LoadOutcome) {
    let view = Arc::new(Mutex::new(TriviaView::new()));
    let outcome = loader::spawn_load(loader_for(server, 3), Arc::downgrade(&view))
        .await
        .unwrap();
    (view, outcome)
}

#[tokio::test]
async fn fetch_sends_amount_and_decodes_entities() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.php"))
        .and(query_param("amount", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(three_questions()))
        .mount(&server)
        .await;

    let items = loader_for(&server, 3).fetch().await.unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].category, "Science & Nature");
    assert_eq!(items[0].question, "What is \"H2O\"?");
    assert_eq!(items[1].question, "Beyoncé was in Destiny's Child.");
    assert_eq!(items[0].incorrect_answers_joined(), "Salt, Sand, Air");
}

#[tokio::test]
async fn loaded_view_sorts_and_filters() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(three_questions())).await;

    let (view, outcome) = load_view(&server).await;
    assert_eq!(outcome, LoadOutcome::Applied { items: 3 });

    let mut view = view.lock().await;
    assert_eq!(view.load_state(), LoadState::Loaded);

    let state = view.sort_by(SortField::Difficulty);
    assert_eq!(state.order, SortOrder::Ascending);
    let diffs: Vec<_> = view.displayed().iter().map(|i| i.difficulty.as_str()).collect();
    assert_eq!(diffs, vec!["easy", "medium", "hard"]);

    view.sort_by(SortField::Difficulty);
    let diffs: Vec<_> = view.displayed().iter().map(|i| i.difficulty.as_str()).collect();
    assert_eq!(diffs, vec!["hard", "medium", "easy"]);

    view.select_filter_field(Some(FilterField::Category));
    assert_eq!(
        view.filter_options(),
        vec!["Science & Nature".to_string(), "Entertainment: Music".to_string()]
    );
    assert!(view.select_filter_value("science"));
    let diffs: Vec<_> = view.displayed().iter().map(|i| i.difficulty.as_str()).collect();
    assert_eq!(diffs, vec!["hard", "medium"]);

    view.clear_filter();
    assert_eq!(view.displayed().len(), 3);
}

#[tokio::test]
async fn loaded_view_renders_every_format() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(three_questions())).await;

    let (view, _) = load_view(&server).await;
    let mut view = view.lock().await;
    view.sort_by(SortField::Type);
    let table = OutputTable::from_view(&view);

    let text = String::from_utf8(output::render(&table, OutputFormat::Text, false)).unwrap();
    assert!(text.contains("Type ↑"));
    assert!(text.contains("Science & Nature"));

    let parsed: serde_json::Value =
        serde_json::from_slice(&output::render(&table, OutputFormat::Json, false)).unwrap();
    assert_eq!(parsed.as_array().map(|a| a.len()), Some(3));
    assert_eq!(parsed[0]["type"], "multiple");

    let html = String::from_utf8(output::render(&table, OutputFormat::Html, false)).unwrap();
    assert!(html.contains("Science &amp; Nature"));
}

#[tokio::test]
async fn non_success_status_leaves_view_empty() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(503)).await;

    let err = loader_for(&server, 3).fetch().await.unwrap_err();
    assert!(matches!(err, LoadFailure::Status { status: 503 }));

    let (view, outcome) = load_view(&server).await;
    assert_eq!(outcome, LoadOutcome::Failed);
    let view = view.lock().await;
    assert_eq!(view.load_state(), LoadState::Failed);
    assert!(view.displayed().is_empty());
    assert!(view.full().is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

    let err = loader_for(&server, 3).fetch().await.unwrap_err();
    assert!(matches!(err, LoadFailure::Decode { .. }));

    let (view, outcome) = load_view(&server).await;
    assert_eq!(outcome, LoadOutcome::Failed);
    assert!(view.lock().await.displayed().is_empty());
}

#[tokio::test]
async fn api_response_code_is_a_failure() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"response_code": 5, "results": []})),
    )
    .await;

    let err = loader_for(&server, 3).fetch().await.unwrap_err();
    assert!(matches!(err, LoadFailure::Api { code: 5, .. }));
}

#[tokio::test]
async fn missing_fields_decode_leniently() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"category": "General", "type": "matching", "question": "Q?"}]
        })),
    )
    .await;

    let items = loader_for(&server, 3).fetch().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind.as_str(), "matching");
    assert_eq!(items[0].correct_answer, "");
    assert!(items[0].incorrect_answers.is_empty());
}

#[tokio::test]
async fn dropped_view_discards_result() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(three_questions())).await;

    let view = Arc::new(Mutex::new(TriviaView::new()));
    let weak = Arc::downgrade(&view);
    drop(view);

    let outcome = loader::load_into(&loader_for(&server, 3), &weak).await;
    assert_eq!(outcome, LoadOutcome::Discarded);
}

#[tokio::test]
async fn view_is_pending_and_empty_before_load() {
    let view = TriviaView::new();
    assert_eq!(view.load_state(), LoadState::Pending);
    let table = OutputTable::from_view(&view);
    assert_eq!(output::summarize(&table), "0/0 shown");
}
