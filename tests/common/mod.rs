//! In-process game server for integration tests.
//!
//! Serves the same hypermedia shapes as the real server and records every
//! request so tests can check exactly what the client sent.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// First game id handed out.
pub const FIRST_GAME_ID: u64 = 42;

const PRIZES: [&str; 3] = ["SMALL_FURRY_ANIMAL", "JUERGEN", "SMALL_FURRY_ANIMAL"];

/// One request as the server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl Recorded {
    /// Value of a request header, if it was sent as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Protocol deviations the server can be told to make.
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    /// Answer game creation without a Location header.
    pub omit_location: bool,
    /// Leave the `doors` relation off the game resource.
    pub omit_doors_link: bool,
    /// Leave the `history` relation off the game resource.
    pub omit_history_link: bool,
    /// Leave the `self` link off this door in the collection.
    pub door_without_self: Option<usize>,
    /// Answer every door POST with this status.
    pub reject_actions_with: Option<u16>,
    /// Answer every DELETE with this status and keep the game.
    pub reject_deletes_with: Option<u16>,
    /// Use path-only hrefs instead of absolute URLs.
    pub relative_links: bool,
    /// Delay game GETs by this long.
    pub slow_game: Option<Duration>,
}

#[derive(Debug, Clone)]
struct MockDoor {
    status: String,
    prize: &'static str,
}

#[derive(Debug, Clone)]
struct MockGame {
    status: String,
    doors: Vec<MockDoor>,
    history: Vec<Value>,
}

#[derive(Debug)]
struct MockState {
    base: String,
    next_id: u64,
    games: BTreeMap<u64, MockGame>,
    requests: Vec<Recorded>,
    behavior: Behavior,
}

type Shared = Arc<Mutex<MockState>>;

impl MockState {
    fn record(&mut self, method: &str, path: String, headers: &HeaderMap, body: Option<Value>) {
        self.requests.push(Recorded {
            method: method.to_string(),
            path,
            headers: headers.clone(),
            body,
        });
    }

    fn href(&self, path: &str) -> String {
        if self.behavior.relative_links {
            path.to_string()
        } else {
            format!("{}{}", self.base, path)
        }
    }

    fn game_json(&self, id: u64, game: &MockGame) -> Value {
        let mut links = vec![json!({ "rel": "self", "href": self.href(&format!("/games/{id}")) })];
        if !self.behavior.omit_doors_link {
            links.push(json!({ "rel": "doors", "href": self.href(&format!("/games/{id}/doors")) }));
        }
        if !self.behavior.omit_history_link {
            links.push(json!({ "rel": "history", "href": self.href(&format!("/games/{id}/history")) }));
        }
        json!({ "status": game.status, "links": links })
    }

    fn doors_json(&self, id: u64, game: &MockGame) -> Value {
        let doors: Vec<Value> = game
            .doors
            .iter()
            .enumerate()
            .map(|(i, door)| {
                let links = if self.behavior.door_without_self == Some(i) {
                    vec![json!({ "rel": "game", "href": self.href(&format!("/games/{id}")) })]
                } else {
                    vec![json!({ "rel": "self", "href": self.href(&format!("/games/{id}/doors/{i}")) })]
                };
                let content = if door.status == "OPEN" { json!(door.prize) } else { Value::Null };
                json!({ "status": door.status, "content": content, "links": links })
            })
            .collect();
        json!({
            "doors": doors,
            "links": [{ "rel": "self", "href": self.href(&format!("/games/{id}/doors")) }]
        })
    }
}

/// A running mock server; stops when dropped.
pub struct MockServer {
    base: String,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Starts a well-behaved server.
    pub async fn start() -> Self {
        Self::start_with(Behavior::default()).await
    }

    /// Starts a server with the given deviations.
    pub async fn start_with(behavior: Behavior) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("No local address");
        let base = format!("http://{}", addr);

        let state = Arc::new(Mutex::new(MockState {
            base: base.clone(),
            next_id: FIRST_GAME_ID,
            games: BTreeMap::new(),
            requests: Vec::new(),
            behavior,
        }));

        let app = Router::new()
            .route("/games", post(create_game))
            .route("/games/{id}", get(show_game).delete(destroy_game))
            .route("/games/{id}/doors", get(show_doors))
            .route("/games/{id}/doors/{door}", post(modify_door))
            .route("/games/{id}/history", get(show_history))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock server failed");
        });

        Self { base, state, handle }
    }

    /// The game root the client should be pointed at.
    pub fn root(&self) -> String {
        format!("{}/games", self.base)
    }

    /// Absolute URL for a server path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Door POSTs received so far, as `(path, body)`.
    pub fn door_posts(&self) -> Vec<(String, Value)> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST" && r.path.contains("/doors/"))
            .map(|r| (r.path, r.body.unwrap_or(Value::Null)))
            .collect()
    }

    /// DELETEs received so far, by path.
    pub fn deletes(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "DELETE")
            .map(|r| r.path)
            .collect()
    }

    /// Number of games that currently exist.
    pub fn game_count(&self) -> usize {
        self.state.lock().unwrap().games.len()
    }

    /// Current door statuses of a game.
    pub fn door_statuses(&self, id: u64) -> Vec<String> {
        self.state.lock().unwrap().games[&id]
            .doors
            .iter()
            .map(|d| d.status.clone())
            .collect()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "no such resource" }))).into_response()
}

async fn create_game(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut s = state.lock().unwrap();
    s.record("POST", "/games".to_string(), &headers, None);

    let id = s.next_id;
    s.next_id += 1;

    let status = "AWAITING_INITIAL_SELECTION".to_string();
    let game = MockGame {
        status: status.clone(),
        doors: PRIZES
            .iter()
            .map(|&prize| MockDoor {
                status: "UNSELECTED".to_string(),
                prize,
            })
            .collect(),
        history: vec![json!({ "game": s.href(&format!("/games/{id}")), "status": status })],
    };
    let body = s.game_json(id, &game);
    s.games.insert(id, game);

    if s.behavior.omit_location {
        (StatusCode::CREATED, Json(body)).into_response()
    } else {
        (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/games/{id}"))],
            Json(body),
        )
            .into_response()
    }
}

async fn show_game(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let delay = state.lock().unwrap().behavior.slow_game;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut s = state.lock().unwrap();
    s.record("GET", format!("/games/{id}"), &headers, None);
    match s.games.get(&id) {
        Some(game) => Json(s.game_json(id, game)).into_response(),
        None => not_found(),
    }
}

async fn destroy_game(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let mut s = state.lock().unwrap();
    s.record("DELETE", format!("/games/{id}"), &headers, None);

    if let Some(code) = s.behavior.reject_deletes_with {
        let code = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (code, Json(json!({ "message": "cannot delete" }))).into_response();
    }
    match s.games.remove(&id) {
        Some(_) => StatusCode::OK.into_response(),
        None => not_found(),
    }
}

async fn show_doors(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let mut s = state.lock().unwrap();
    s.record("GET", format!("/games/{id}/doors"), &headers, None);
    match s.games.get(&id) {
        Some(game) => Json(s.doors_json(id, game)).into_response(),
        None => not_found(),
    }
}

async fn show_history(
    State(state): State<Shared>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let mut s = state.lock().unwrap();
    s.record("GET", format!("/games/{id}/history"), &headers, None);
    match s.games.get(&id) {
        Some(game) => Json(json!({
            "history": game.history,
            "links": [{ "rel": "self", "href": s.href(&format!("/games/{id}/history")) }]
        }))
        .into_response(),
        None => not_found(),
    }
}

async fn modify_door(
    State(state): State<Shared>,
    Path((id, door)): Path<(u64, usize)>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut s = state.lock().unwrap();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let parsed: Option<Value> = serde_json::from_str(&body).ok();
    s.record("POST", format!("/games/{id}/doors/{door}"), &headers, parsed.clone());

    if let Some(code) = s.behavior.reject_actions_with {
        let code = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (code, Json(json!({ "message": "rejected" }))).into_response();
    }
    if content_type.as_deref() != Some("application/json") {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }
    let Some(requested) = parsed
        .as_ref()
        .and_then(|v| v.get("status"))
        .and_then(Value::as_str)
        .map(str::to_string)
    else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "missing status" }))).into_response();
    };

    let door_href = s.href(&format!("/games/{id}/doors/{door}"));
    let game_href = s.href(&format!("/games/{id}"));
    let Some(game) = s.games.get_mut(&id) else {
        return not_found();
    };
    if door >= game.doors.len() {
        return not_found();
    }

    match (game.status.as_str(), requested.as_str()) {
        ("AWAITING_INITIAL_SELECTION", "SELECTED") => {
            game.doors[door].status = "SELECTED".to_string();
            game.status = "AWAITING_FINAL_SELECTION".to_string();
        }
        ("AWAITING_FINAL_SELECTION", "OPEN") if game.doors[door].status != "OPEN" => {
            game.doors[door].status = "OPEN".to_string();
            game.status = if game.doors[door].prize == "JUERGEN" {
                "WON".to_string()
            } else {
                "LOST".to_string()
            };
        }
        _ => {
            return (StatusCode::CONFLICT, Json(json!({ "message": "illegal transition" })))
                .into_response();
        }
    }

    let door_status = game.doors[door].status.clone();
    let game_status = game.status.clone();
    game.history.push(json!({ "door": door_href, "status": door_status }));
    game.history.push(json!({ "game": game_href, "status": game_status }));
    StatusCode::OK.into_response()
}
