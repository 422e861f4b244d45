//! End-to-end tests for the filing search flow.
//!
//! The reasoning service, the Serper search API, and the filing document
//! host are all wiremock servers; the agent loop and HTTP surface run
//! for real.

use filingagent::config::Config;
use filingagent::models::FilingResponse;
use filingagent::server::{build_router, AppState};
use secrecy::SecretString;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a config pointing at mock servers
fn test_config(llm_base: String, serper_base: String) -> Config {
    let mut config = Config::minimal();
    config.llm.api_key = SecretString::from("test-llm-key");
    config.llm.base_url = llm_base;
    config.llm.timeout_secs = 5;
    config.search.api_key = SecretString::from("test-serper-key");
    config.search.base_url = serper_base;
    config.search.timeout_secs = 5;
    config.fetch.timeout_secs = 5;
    config
}

/// Spawn the axum app on an ephemeral port, return its base URL
async fn spawn_app(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Chat-completions reply requesting a single tool call
fn llm_tool_call(tool_name: &str, arguments: Value) -> Value {
    json!({
        "id": "cmpl-tool",
        "model": "google/gemini-2.5-pro",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": format!("call-{}", tool_name),
                    "type": "function",
                    "function": {
                        "name": tool_name,
                        "arguments": arguments.to_string()
                    }
                }]
            },
            "finish_reason": "tool_calls"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

/// Chat-completions reply with plain text content
fn llm_text(text: &str) -> Value {
    json!({
        "id": "cmpl-text",
        "model": "google/gemini-2.5-pro",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

/// Mount a one-shot LLM reply; mocks match in mount order
async fn mount_llm_reply(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn microsoft_10k_routes_through_us_search_and_fetch() {
    let llm = MockServer::start().await;
    let serper = MockServer::start().await;
    let docs = MockServer::start().await;

    let doc_url = format!("{}/msft-20240630.htm", docs.uri());

    // The document the agent will fetch
    Mock::given(method("GET"))
        .and(path("/msft-20240630.htm"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(
                    "<html><body><h1>Form 10-K Microsoft Corporation</h1>\
                     <p>Annual report for fiscal year ending June 30, 2024.</p></body></html>",
                ),
        )
        .mount(&docs)
        .await;

    // The US-scoped search returns that URL
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [{
                "title": "Microsoft Form 10-K",
                "link": doc_url,
                "snippet": "Annual report"
            }]
        })))
        .mount(&serper)
        .await;

    // Scripted reasoning: US search, then fetch, then final JSON
    mount_llm_reply(&llm, llm_tool_call("search_sec_edgar", json!({"query": "Microsoft 10-K"}))).await;
    mount_llm_reply(
        &llm,
        llm_tool_call("read_document_from_url", json!({"url": doc_url})),
    )
    .await;
    mount_llm_reply(
        &llm,
        llm_text(&format!(
            r#"```json
{{
  "contract_name": "Form 10-K",
  "company_name": "Microsoft Corporation",
  "description": "Annual report for fiscal year ending June 30, 2024.",
  "filing_date": "2024-07-25",
  "source_of_information": "SEC EDGAR",
  "country": "United States",
  "language": "English",
  "applicable_law": "Securities Exchange Act of 1934",
  "relevant_clause": "Item 1A. Risk Factors",
  "document_url": "{}"
}}
```"#,
            doc_url
        )),
    )
    .await;

    let state = AppState::from_config(&test_config(llm.uri(), serper.uri())).unwrap();
    let base = spawn_app(state).await;

    let response: FilingResponse = reqwest::Client::new()
        .post(format!("{}/search", base))
        .json(&json!({"query": "Find Microsoft's most recent 10-K annual report"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(response.success, "error: {:?}", response.error);
    let filing = response.data.unwrap();
    assert_eq!(filing.country, "United States");
    assert_eq!(filing.source_of_information, "SEC EDGAR");
    assert_eq!(filing.document_url, doc_url);

    // Both tool-backed services were actually exercised
    assert!(!serper.received_requests().await.unwrap().is_empty());
    assert!(!docs.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn nonsense_query_exhausts_tools_and_fails_cleanly() {
    let llm = MockServer::start().await;
    let serper = MockServer::start().await;

    // Search finds nothing
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic": []})))
        .mount(&serper)
        .await;

    mount_llm_reply(
        &llm,
        llm_tool_call("general_web_search", json!({"query": "asdkjasd 12345 !!!"})),
    )
    .await;
    mount_llm_reply(
        &llm,
        llm_text("I could not find any plausible company filing for that query."),
    )
    .await;

    let state = AppState::from_config(&test_config(llm.uri(), serper.uri())).unwrap();
    let base = spawn_app(state).await;

    let response: FilingResponse = reqwest::Client::new()
        .post(format!("{}/search", base))
        .json(&json!({"query": "asdkjasd 12345 !!!"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(!response.success);
    assert!(response.data.is_none());
    assert!(!response.error.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_search_endpoint_never_crashes_the_request() {
    let llm = MockServer::start().await;

    // The Canadian search tool will fail at the transport level; the
    // scripted reasoning recovers from the error turn and answers anyway.
    mount_llm_reply(
        &llm,
        llm_tool_call("search_sedar_plus", json!({"query": "Shopify annual report"})),
    )
    .await;
    mount_llm_reply(
        &llm,
        llm_text(
            r#"{
  "contract_name": "Annual Report",
  "company_name": "Shopify Inc.",
  "description": "Annual report located via fallback knowledge.",
  "filing_date": "2024-02-13",
  "source_of_information": "SEDAR+",
  "country": "Canada",
  "language": "English",
  "applicable_law": null,
  "relevant_clause": "N/A",
  "document_url": "https://www.sedarplus.ca/example"
}"#,
        ),
    )
    .await;

    let state = AppState::from_config(&test_config(
        llm.uri(),
        "http://127.0.0.1:1".to_string(),
    ))
    .unwrap();
    let base = spawn_app(state).await;

    let response: FilingResponse = reqwest::Client::new()
        .post(format!("{}/search", base))
        .json(&json!({"query": "Find Shopify's latest annual report on SEDAR"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(response.success, "error: {:?}", response.error);
    assert_eq!(response.data.unwrap().country, "Canada");
}

#[tokio::test]
async fn empty_query_is_rejected_before_any_external_call() {
    let llm = MockServer::start().await;
    let serper = MockServer::start().await;

    let state = AppState::from_config(&test_config(llm.uri(), serper.uri())).unwrap();
    let base = spawn_app(state).await;

    for query in ["", "   ", "\n\t"] {
        let http_response = reqwest::Client::new()
            .post(format!("{}/search", base))
            .json(&json!({"query": query}))
            .send()
            .await
            .unwrap();

        assert_eq!(http_response.status(), 400);
        let body: FilingResponse = http_response.json().await.unwrap();
        assert!(!body.success);
        assert!(body.error.is_some());
    }

    assert!(llm.received_requests().await.unwrap().is_empty());
    assert!(serper.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn loop_limits_terminate_a_stuck_agent() {
    let llm = MockServer::start().await;
    let serper = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic": []})))
        .mount(&serper)
        .await;

    // The LLM keeps requesting the same search on every turn
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(llm_tool_call(
            "general_web_search",
            json!({"query": "anything"}),
        )))
        .mount(&llm)
        .await;

    let mut config = test_config(llm.uri(), serper.uri());
    config.limits.max_iterations = 4;
    config.limits.max_tool_calls = 3;

    let state = AppState::from_config(&config).unwrap();
    let base = spawn_app(state).await;

    let response: FilingResponse = reqwest::Client::new()
        .post(format!("{}/search", base))
        .json(&json!({"query": "Find something that loops forever"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(!response.success);
    assert!(response.error.is_some());

    // Bounded: strictly fewer LLM calls than would be possible unbounded
    let llm_calls = llm.received_requests().await.unwrap().len();
    assert!(llm_calls <= 5, "loop made {} LLM calls", llm_calls);
}

#[tokio::test]
async fn health_works_without_valid_credentials() {
    // Credentials are set but point at nothing reachable
    let state = AppState::from_config(&test_config(
        "http://127.0.0.1:1".to_string(),
        "http://127.0.0.1:1".to_string(),
    ))
    .unwrap();
    let base = spawn_app(state).await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn root_and_examples_are_static() {
    let state = AppState::from_config(&test_config(
        "http://127.0.0.1:1".to_string(),
        "http://127.0.0.1:1".to_string(),
    ))
    .unwrap();
    let base = spawn_app(state).await;

    let root: Value = reqwest::get(format!("{}/", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(root["name"], "FilingAgent");

    let examples: Value = reqwest::get(format!("{}/examples", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(examples["examples"].as_array().unwrap().len() >= 4);
}
