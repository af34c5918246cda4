use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chatrelay::config::Provider;
use chatrelay::core::error::ChatError;
use chatrelay::providers::{Dispatcher, Message, ProviderConfig};
use chatrelay::session::ChatSession;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct Seen {
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1/chat", addr)
}

/// A canned provider: every POST is recorded and answered with the same
/// status and body.
async fn mock_provider(status: StatusCode, body: &'static str) -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route(
            "/v1/chat",
            post(
                move |State(seen): State<Seen>,
                      headers: HeaderMap,
                      Json(payload): Json<Value>| async move {
                    seen.requests.lock().unwrap().push((headers, payload));
                    (status, body)
                },
            ),
        )
        .with_state(seen.clone());

    (serve(app).await, seen)
}

fn provider(kind: Provider, endpoint: String) -> ProviderConfig {
    ProviderConfig {
        provider: kind,
        endpoint,
        model: kind.profile().default_model.to_string(),
        credential: "secret-key".to_string(),
    }
}

#[tokio::test]
async fn chat_completion_over_http() {
    let (endpoint, seen) =
        mock_provider(StatusCode::OK, r#"{"choices":[{"message":{"content":"ok"}}]}"#).await;
    let dispatcher = Dispatcher::with_http(None).unwrap();

    let reply = dispatcher
        .dispatch(
            &provider(Provider::Groq, endpoint),
            "be terse",
            &[Message::user("hi")],
        )
        .await
        .unwrap();

    assert_eq!(reply, "ok");
    let requests = seen.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (headers, payload) = &requests[0];
    assert_eq!(headers["authorization"], "Bearer secret-key");
    assert_eq!(headers["content-type"], "application/json");
    assert!(headers.get("x-title").is_none());
    assert_eq!(
        payload,
        &json!({
            "model": "llama-3.1-8b-instant",
            "messages": [
                {"role": "system", "content": "be terse"},
                {"role": "user", "content": "hi"}
            ],
            "temperature": 0.7,
            "max_tokens": 1024
        })
    );
}

#[tokio::test]
async fn openrouter_sends_attribution_headers() {
    let (endpoint, seen) =
        mock_provider(StatusCode::OK, r#"{"choices":[{"message":{"content":"ok"}}]}"#).await;

    Dispatcher::with_http(None)
        .unwrap()
        .dispatch(
            &provider(Provider::OpenRouter, endpoint),
            "",
            &[Message::user("hi")],
        )
        .await
        .unwrap();

    let requests = seen.requests.lock().unwrap();
    let (headers, _) = &requests[0];
    assert_eq!(headers["http-referer"], "http://localhost");
    assert_eq!(headers["x-title"], "chatrelay");
}

#[tokio::test]
async fn prompt_concatenation_over_http() {
    let (endpoint, seen) =
        mock_provider(StatusCode::OK, r#"[{"generated_text":"hello"}]"#).await;

    let reply = Dispatcher::with_http(None)
        .unwrap()
        .dispatch(
            &provider(Provider::HuggingFace, endpoint),
            "be terse",
            &[Message::user("hi")],
        )
        .await
        .unwrap();

    assert_eq!(reply, "hello");
    let requests = seen.requests.lock().unwrap();
    assert_eq!(
        requests[0].1,
        json!({
            "inputs": "system: be terse\nuser: hi",
            "parameters": {"max_new_tokens": 512, "temperature": 0.7}
        })
    );
}

#[tokio::test]
async fn unauthorized_surfaces_provider_message() {
    let (endpoint, _) =
        mock_provider(StatusCode::UNAUTHORIZED, r#"{"error":{"message":"bad key"}}"#).await;

    let err = Dispatcher::with_http(None)
        .unwrap()
        .dispatch(&provider(Provider::Groq, endpoint), "", &[Message::user("hi")])
        .await
        .unwrap_err();

    match err {
        ChatError::Transport { status, message } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "bad key");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_with_garbage_body_mentions_status() {
    let (endpoint, _) = mock_provider(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").await;

    let err = Dispatcher::with_http(None)
        .unwrap()
        .dispatch(&provider(Provider::Groq, endpoint), "", &[Message::user("hi")])
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Transport { status: Some(500), .. }));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn session_keeps_transcript_clean_on_protocol_error() {
    let (endpoint, seen) = mock_provider(StatusCode::OK, r#"{"choices":[]}"#).await;
    let mut session = ChatSession::new(
        Dispatcher::with_http(None).unwrap(),
        provider(Provider::OpenAI, endpoint),
        "be terse",
    );

    let err = session.send("hi").await.unwrap_err();

    assert!(matches!(err, ChatError::Protocol(_)));
    assert_eq!(session.transcript(), &[Message::user("hi")]);
    assert_eq!(seen.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn refused_connection_is_a_transport_error_without_status() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = Dispatcher::with_http(None)
        .unwrap()
        .dispatch(
            &provider(Provider::Groq, format!("http://{}/v1/chat", addr)),
            "",
            &[Message::user("hi")],
        )
        .await
        .unwrap_err();

    assert!(
        matches!(err, ChatError::Transport { status: None, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn slow_provider_hits_the_request_timeout() {
    let app = Router::new().route(
        "/v1/chat",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, r#"{"choices":[{"message":{"content":"late"}}]}"#)
        }),
    );
    let endpoint = serve(app).await;

    let err = Dispatcher::with_http(Some(Duration::from_millis(200)))
        .unwrap()
        .dispatch(&provider(Provider::Groq, endpoint), "", &[Message::user("hi")])
        .await
        .unwrap_err();

    match err {
        ChatError::Transport { status, message } => {
            assert_eq!(status, None);
            assert!(message.contains("Request timed out"), "got {message}");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}
