//! Scripted HTTP server for exercising the dashboard against real sockets.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use url::Url;

use crate::prompt::Prompt;

pub const PREDICTIONS_BODY: &str = r#"{
    "success": true,
    "html": "<ul class=\"predictions\"><li>Jane Doe: high</li></ul>",
    "active_model": {"name": "Readmission LR", "model_type": "Logistic Regression", "accuracy": 0.873},
    "stats": {"total_predictions": 12, "high_risk_count": 4, "medium_risk_count": 5, "low_risk_count": 3}
}"#;

pub const ANALYTICS_BODY: &str = r#"{
    "success": true,
    "html": "<div></div>",
    "readmission_rate": 12.5,
    "avg_risk_score": 41.2,
    "avg_stay": 5.0,
    "total_assessed": 37,
    "risk_distribution": {"high": 10, "medium": 0, "low": 2, "unknown": 1},
    "total_patients": 40,
    "model_metrics": {"accuracy": 0.873, "precision": 0.82, "recall": 0.87, "f1_score": 0.84},
    "quick_stats": {"avg_prediction_time": 2.3, "success_rate": 95.7}
}"#;

pub const MODELS_BODY: &str = r#"{
    "success": true,
    "html": "<table class=\"models\"><tr><td>Readmission LR</td></tr></table>",
    "total_models": 3,
    "active_models": 1
}"#;

/// Answers every confirmation the same way and records what was asked.
pub struct ScriptedPrompt {
    answer: bool,
    pub questions: Vec<String>,
    pub notices: Vec<String>,
}

impl ScriptedPrompt {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            questions: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn declining() -> Self {
        Self {
            answer: false,
            ..Self::accepting()
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.answer
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Clone)]
struct Route {
    status: u16,
    body: String,
    gate: Option<Arc<Notify>>,
}

#[derive(Default)]
struct ServerState {
    routes: HashMap<String, Route>,
    requests: Vec<RecordedRequest>,
}

pub struct StubServer {
    base_url: Url,
    state: Arc<Mutex<ServerState>>,
}

impl StubServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(ServerState::default()));

        let shared = Arc::clone(&state);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(handle(stream, Arc::clone(&shared)));
            }
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
            state,
        }
    }

    /// A server whose three section endpoints all succeed.
    pub async fn with_sections() -> Self {
        let server = Self::start().await;
        server.respond("/predictions/api/dashboard-data/", 200, PREDICTIONS_BODY);
        server.respond("/predictions/api/analytics/", 200, ANALYTICS_BODY);
        server.respond("/predictions/api/models/", 200, MODELS_BODY);
        server
    }

    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    pub fn respond(&self, path: &str, status: u16, body: &str) {
        self.state.lock().unwrap().routes.insert(
            path.to_string(),
            Route {
                status,
                body: body.to_string(),
                gate: None,
            },
        );
    }

    /// Like `respond`, but the reply waits until the returned gate is notified.
    pub fn respond_held(&self, path: &str, status: u16, body: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().routes.insert(
            path.to_string(),
            Route {
                status,
                body: body.to_string(),
                gate: Some(Arc::clone(&gate)),
            },
        );
        gate
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|request| request.path == path)
            .count()
    }

    pub fn total_hits(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

async fn handle(mut stream: TcpStream, state: Arc<Mutex<ServerState>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let read = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(read) => read,
        };
        buf.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default();
    let path = target.split('?').next().unwrap_or_default().to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();
    let content_length = headers
        .get("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(read) => buf.extend_from_slice(&chunk[..read]),
        }
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    let route = {
        let mut state = state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method,
            path: path.clone(),
            headers,
            body,
        });
        state.routes.get(&path).cloned()
    };
    let route = route.unwrap_or(Route {
        status: 404,
        body: "not found".to_string(),
        gate: None,
    });
    if let Some(gate) = &route.gate {
        gate.notified().await;
    }

    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        route.body.len(),
        route.body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
