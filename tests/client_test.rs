use axum::Router;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use webhook_solver::client::WebhookApi;
use webhook_solver::client::http::HttpWebhookClient;
use webhook_solver::config::{AuthScheme, Identity};
use webhook_solver::error::SolverError;

/// A request as seen by the stub endpoint.
struct Captured {
    method: Method,
    headers: HeaderMap,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Serve `POST /hook` on a random port, answering every request with
/// `status` and `body`. Each received request is sent down the channel.
async fn stub_endpoint(
    status: StatusCode,
    body: &'static str,
) -> (String, mpsc::UnboundedReceiver<Captured>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new().route(
        "/hook",
        post(move |method: Method, headers: HeaderMap, raw: String| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(Captured {
                    method,
                    headers,
                    body: raw,
                });
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/hook", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (url, rx)
}

fn identity() -> Identity {
    Identity {
        name: "Jane Doe".to_string(),
        reg_no: "REG2024042".to_string(),
        email: "jane@example.com".to_string(),
    }
}

#[tokio::test]
async fn register_posts_identity_and_parses_response() {
    let (url, mut requests) = stub_endpoint(
        StatusCode::OK,
        r#"{"webhook":"http://provider/submit","accessToken":"tok-abc"}"#,
    )
    .await;
    let client = HttpWebhookClient::new(url, AuthScheme::Raw);

    let generated = client.register(&identity()).await.unwrap();
    assert_eq!(generated.webhook_url, "http://provider/submit");
    assert_eq!(generated.access_token, "tok-abc");

    let req = requests.recv().await.unwrap();
    assert_eq!(req.method, Method::POST);
    assert!(req.header("content-type").unwrap().starts_with("application/json"));
    assert_eq!(
        req.json(),
        serde_json::json!({"name": "Jane Doe", "regNo": "REG2024042", "email": "jane@example.com"})
    );
}

#[tokio::test]
async fn register_rejects_empty_webhook() {
    let (url, mut requests) =
        stub_endpoint(StatusCode::OK, r#"{"webhook":"","accessToken":"tok"}"#).await;
    let client = HttpWebhookClient::new(url, AuthScheme::Raw);

    let err = client.register(&identity()).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SolverError>(),
        Some(SolverError::InvalidRegistration { .. })
    ));
    assert!(requests.recv().await.is_some());
}

#[tokio::test]
async fn register_fails_on_error_status() {
    let (url, mut requests) =
        stub_endpoint(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#).await;
    let client = HttpWebhookClient::new(url, AuthScheme::Raw);

    let err = client.register(&identity()).await.unwrap_err();
    match err.downcast_ref::<SolverError>() {
        Some(SolverError::BadStatus { status, body, .. }) => {
            assert_eq!(*status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("expected BadStatus, got {other:?}"),
    }
    assert!(requests.recv().await.is_some());
}

#[tokio::test]
async fn register_fails_when_nothing_listens() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/generate", listener.local_addr().unwrap());
    drop(listener);

    let client = HttpWebhookClient::new(url, AuthScheme::Raw);
    let err = client.register(&identity()).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SolverError>(),
        Some(SolverError::Transport { .. })
    ));
}

#[tokio::test]
async fn submit_sends_raw_token_and_returns_body_verbatim() {
    let (url, mut requests) = stub_endpoint(StatusCode::OK, "Webhook processed successfully").await;
    let client = HttpWebhookClient::new("http://unused/generate", AuthScheme::Raw);

    let body = client
        .submit_answer(&url, "tok-abc", "SELECT 1;")
        .await
        .unwrap();
    assert_eq!(body, "Webhook processed successfully");

    let req = requests.recv().await.unwrap();
    assert_eq!(req.header("authorization").as_deref(), Some("tok-abc"));
    assert_eq!(req.json(), serde_json::json!({"finalQuery": "SELECT 1;"}));
}

#[tokio::test]
async fn submit_with_bearer_scheme() {
    let (url, mut requests) = stub_endpoint(StatusCode::OK, "{}").await;
    let client = HttpWebhookClient::new("http://unused/generate", AuthScheme::Bearer);

    client.submit_answer(&url, "tok-abc", "SELECT 1;").await.unwrap();

    let req = requests.recv().await.unwrap();
    assert_eq!(req.header("authorization").as_deref(), Some("Bearer tok-abc"));
}

#[tokio::test]
async fn submit_fails_on_unauthorized() {
    let (url, mut requests) = stub_endpoint(StatusCode::UNAUTHORIZED, "invalid token").await;
    let client = HttpWebhookClient::new("http://unused/generate", AuthScheme::Raw);

    let err = client.submit_answer(&url, "bad", "SELECT 1;").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SolverError>(),
        Some(SolverError::BadStatus { status: 401, .. })
    ));
    assert!(requests.recv().await.is_some());
}
