//! In-process stand-in for the portal and InfluxDB, served by axum on a
//! background tokio runtime so the blocking client can be tested end to end.

#![allow(dead_code, clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::extract::{Form, Query, State};
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use enedis_portal::config::{EndpointsConfig, HttpConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub const SESSION_TOKEN: &str = "AQIC5wM2LY4SfczSessionToken";

/// How the mock answers
#[derive(Debug, Clone)]
pub struct Scenario {
    pub login_status: u16,
    pub login_cookies: Vec<String>,
    pub data_status: u16,
    pub data_body: String,
    pub influx_status: u16,
}

impl Scenario {
    /// Login accepted, empty data set
    pub fn accepting() -> Self {
        Self {
            login_status: 302,
            login_cookies: vec![
                "amlbcookie=01; Path=/".to_string(),
                format!("iPlanetDirectoryPro={SESSION_TOKEN}; Path=/"),
            ],
            data_status: 200,
            data_body: data_body(&[]),
            influx_status: 204,
        }
    }

    pub fn with_login_cookies(mut self, cookies: &[&str]) -> Self {
        self.login_cookies = cookies.iter().map(|c| (*c).to_string()).collect();
        self
    }

    pub fn with_login_status(mut self, status: u16) -> Self {
        self.login_status = status;
        self
    }

    pub fn with_data(mut self, status: u16, body: String) -> Self {
        self.data_status = status;
        self.data_body = body;
        self
    }

    pub fn with_influx_status(mut self, status: u16) -> Self {
        self.influx_status = status;
        self
    }
}

/// Render a portal JSON body from `valeur`s numbered from 1
pub fn data_body(values: &[f64]) -> String {
    let data: Vec<serde_json::Value> = values
        .iter()
        .enumerate()
        .map(|(i, v)| serde_json::json!({"ordre": i + 1, "valeur": v}))
        .collect();
    serde_json::json!({"etat": {"value": "termine"}, "Graphe": {"Data": data}}).to_string()
}

#[derive(Debug, Clone)]
pub struct DataRequest {
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub cookie: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InfluxWrite {
    pub query: HashMap<String, String>,
    pub body: String,
    pub authorization: Option<String>,
}

/// Everything the mock received
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub login_forms: Vec<HashMap<String, String>>,
    pub warm_ups: usize,
    pub data_requests: Vec<DataRequest>,
    pub influx_writes: Vec<InfluxWrite>,
}

#[derive(Clone)]
struct AppState {
    scenario: Arc<Scenario>,
    recorded: Arc<Mutex<Recorded>>,
}

pub struct MockPortal {
    pub base_url: String,
    recorded: Arc<Mutex<Recorded>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockPortal {
    pub fn start(scenario: Scenario) -> Self {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let state = AppState {
            scenario: Arc::new(scenario),
            recorded: Arc::clone(&recorded),
        };
        let (addr_tx, addr_rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let app = Router::new()
                    .route("/auth/UI/Login", post(login))
                    .route("/suivi-de-consommation", get(warm_up).post(data))
                    .route("/write", post(influx_write))
                    .with_state(state);
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                addr_tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        shutdown_rx.await.ok();
                    })
                    .await
                    .unwrap();
            });
        });

        let addr = addr_rx.recv().unwrap();
        Self {
            base_url: format!("http://{addr}"),
            recorded,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn endpoints(&self) -> EndpointsConfig {
        EndpointsConfig {
            login_url: format!("{}/auth/UI/Login", self.base_url),
            data_url: format!("{}/suivi-de-consommation", self.base_url),
        }
    }

    pub fn http(&self) -> HttpConfig {
        HttpConfig {
            timeout_seconds: 5,
            ..HttpConfig::default()
        }
    }

    pub fn recorded(&self) -> Recorded {
        self.recorded.lock().unwrap().clone()
    }
}

impl Drop for MockPortal {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn response(status: u16, cookies: &[String], body: String) -> Response {
    let mut builder = Response::builder().status(StatusCode::from_u16(status).unwrap());
    for cookie in cookies {
        builder = builder.header(SET_COOKIE, cookie.as_str());
    }
    builder.body(Body::from(body)).unwrap()
}

// Form extraction also checks the form-urlencoded content type
async fn login(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.recorded.lock().unwrap().login_forms.push(form);
    response(
        state.scenario.login_status,
        &state.scenario.login_cookies,
        String::new(),
    )
}

async fn warm_up(State(state): State<AppState>) -> Response {
    state.recorded.lock().unwrap().warm_ups += 1;
    response(
        200,
        &["JSESSIONID=0A1B2C3D; Path=/".to_string()],
        "<html></html>".to_string(),
    )
}

async fn data(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let cookie = headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.recorded.lock().unwrap().data_requests.push(DataRequest {
        query,
        form,
        cookie,
    });
    response(
        state.scenario.data_status,
        &[],
        state.scenario.data_body.clone(),
    )
}

async fn influx_write(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.recorded.lock().unwrap().influx_writes.push(InfluxWrite {
        query,
        body,
        authorization,
    });
    response(state.scenario.influx_status, &[], String::new())
}
