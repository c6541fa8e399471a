//! A small configuration API: `POST /login` hands out a token, and the
//! `/configurations` collection only answers requests that carry it in the
//! `Authorization` header.
//!
//! ```text
//! cargo run --example server
//! curl -XPOST localhost:8000/login -d '{"email":"admin@example.com","password":"changeme"}'
//! curl -H "Authorization: <token>" 'localhost:8000/configurations?sort=name&ascending=false'
//! ```

use shape_router::{
    Dispatcher, Output, Rejection, RequestArgs, Resource, RespondWithError, RouterService,
    StatusCode,
};

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use rand::RngCore;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24);

struct User {
    name: String,
    password: String,
    token: Option<String>,
    last_login: Option<Instant>,
}

struct Credentials {
    users: Mutex<HashMap<String, User>>,
}

fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

impl Credentials {
    fn new() -> Self {
        let mut users = HashMap::new();
        for (email, name, password) in [
            ("admin@example.com", "Admin User", "changeme"),
            ("testuser@example.com", "Test User", "testuser"),
        ] {
            let user = User {
                name: name.to_owned(),
                password: digest(password),
                token: None,
                last_login: None,
            };
            users.insert(email.to_owned(), user);
        }
        Self {
            users: Mutex::new(users),
        }
    }

    fn authenticate(&self, token: Option<&str>) -> bool {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return false,
        };
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        users.values().any(|u| u.token.as_deref() == Some(token))
    }

    fn login(&self, email: Option<&str>, password: Option<&str>) -> Value {
        let denied = json!({ "success": false, "message": "Invalid credentials", "token": null });

        let (email, password) = match (email, password) {
            (Some(e), Some(p)) => (e, p),
            _ => return denied,
        };

        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        let user = match users.get_mut(email) {
            Some(u) if u.password == digest(password) => u,
            _ => return denied,
        };

        let stale = user
            .last_login
            .map_or(true, |at| at.elapsed() > TOKEN_TTL);
        if user.token.is_none() || stale {
            let mut buf = [0u8; 64];
            rand::thread_rng().fill_bytes(&mut buf);
            user.token = Some(hex::encode(buf));
        }
        user.last_login = Some(Instant::now());

        info!(user = %user.name, "logged in");
        json!({ "success": true, "message": "Successfully logged in", "token": user.token })
    }

    fn logout(&self, token: Option<&str>) -> Value {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        let user = token.and_then(|t| {
            users
                .values_mut()
                .find(|u| u.token.as_deref() == Some(t))
        });
        match user {
            Some(user) => {
                user.token = None;
                info!(user = %user.name, "logged out");
                json!({ "success": true, "message": "You have been logged out." })
            }
            None => json!({
                "success": false,
                "message": "Invalid user or user is not logged in."
            }),
        }
    }
}

struct Configurations {
    rows: RwLock<Vec<Map<String, Value>>>,
}

impl Configurations {
    fn new() -> Self {
        let seed = json!([
            { "id": 1, "name": "host1", "hostname": "nessus-ntp.lab.com", "port": 1241, "username": "toto" },
            { "id": 2, "name": "host2", "hostname": "nessus-xml.lab.com", "port": 3384, "username": "admin" },
        ]);
        let rows = match seed {
            Value::Array(rows) => rows
                .into_iter()
                .filter_map(|row| match row {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Self {
            rows: RwLock::new(rows),
        }
    }
}

/// `1 == "1"`: ids from the path are strings, stored ids are numbers.
fn same_id(row: &Map<String, Value>, id: &str) -> bool {
    match row.get("id") {
        Some(Value::Number(n)) => n.to_string() == id,
        Some(Value::String(s)) => s == id,
        _ => false,
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

impl Resource for Configurations {
    fn index(&self, args: &RequestArgs) -> Option<Value> {
        let limit = match args.parse::<usize>("limit") {
            Some(Ok(n)) if n > 0 => n,
            _ => 10,
        };
        let start = match args.parse::<usize>("page") {
            Some(Ok(page)) => page.saturating_mul(limit),
            _ => 0,
        };
        let field = args.get_str("sort").unwrap_or("id");
        let ascending = !args
            .get_str("ascending")
            .map_or(false, |a| a.to_lowercase().contains("false"));

        let rows = self.rows.read().unwrap_or_else(|e| e.into_inner());
        let mut sorted: Vec<&Map<String, Value>> = rows.iter().collect();
        sorted.sort_by(|a, b| compare(a.get(field), b.get(field)));
        if !ascending {
            sorted.reverse();
        }

        let page = sorted
            .into_iter()
            .skip(start)
            .take(limit)
            .map(|row| Value::Object(row.clone()))
            .collect();
        Some(Value::Array(page))
    }

    fn show(&self, args: &RequestArgs) -> Option<Value> {
        let id = args.get_str("id")?;
        let rows = self.rows.read().unwrap_or_else(|e| e.into_inner());
        rows.iter()
            .find(|row| same_id(row, id))
            .map(|row| Value::Object(row.clone()))
    }

    fn create(&self, args: &RequestArgs) -> Option<Value> {
        let mut row = args.data().as_object()?.clone();
        let mut rows = self.rows.write().unwrap_or_else(|e| e.into_inner());
        if !row.contains_key("id") {
            let next = rows
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_u64))
                .max()
                .unwrap_or(0)
                + 1;
            row.insert("id".to_owned(), json!(next));
        }
        rows.push(row.clone());
        Some(Value::Object(row))
    }

    fn update(&self, args: &RequestArgs) -> Option<Value> {
        let id = args.get_str("id")?;
        let changes = args.data().as_object()?;
        let mut rows = self.rows.write().unwrap_or_else(|e| e.into_inner());
        let row = rows.iter_mut().find(|row| same_id(row, id))?;
        for (key, value) in changes.iter().filter(|(k, _)| k.as_str() != "id") {
            row.insert(key.clone(), value.clone());
        }
        Some(Value::Object(row.clone()))
    }

    fn destroy(&self, args: &RequestArgs) -> Option<Value> {
        let id = args.get_str("id")?;
        let mut rows = self.rows.write().unwrap_or_else(|e| e.into_inner());
        let pos = rows.iter().position(|row| same_id(row, id))?;
        Some(Value::Object(rows.remove(pos)))
    }
}

fn dispatcher() -> Dispatcher {
    let auth = Arc::new(Credentials::new());
    let mut dispatcher = Dispatcher::new();
    dispatcher.set_error_handler(RespondWithError);

    {
        let auth = Arc::clone(&auth);
        dispatcher.get("/", move |args, out| {
            if !auth.authenticate(args.token()) {
                return out.error("You are not logged in.", StatusCode::UNAUTHORIZED);
            }
            out.message("Hi!", StatusCode::OK)
        });
    }

    {
        let auth = Arc::clone(&auth);
        dispatcher.post("/login", move |args, out| {
            let data = args.data();
            out.ok(auth.login(data["email"].as_str(), data["password"].as_str()))
        });
    }

    {
        let auth = Arc::clone(&auth);
        dispatcher.post("/logout", move |args, out| {
            if !auth.authenticate(args.token()) {
                return out.error("You are not logged in.", StatusCode::UNAUTHORIZED);
            }
            out.ok(auth.logout(args.token()))
        });
    }

    let gate = Arc::clone(&auth);
    let bound = dispatcher.resources(
        "/configurations",
        Arc::new(Configurations::new()),
        move |args: &RequestArgs| {
            if gate.authenticate(args.token()) {
                Ok(())
            } else {
                Err(Rejection::unauthorized("You are not logged in."))
            }
        },
        |_: &RequestArgs, result: Option<Value>, out: &mut dyn Output| match result {
            Some(v) => out.ok(v),
            None => out.error("Configuration not found", StatusCode::NOT_FOUND),
        },
    );
    if let Err(e) = bound {
        panic!("{}", e);
    }

    dispatcher
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = ([127, 0, 0, 1], 8000).into();
    let server = hyper::Server::bind(&addr).serve(RouterService::new(dispatcher()));

    info!("listening on http://{}", addr);

    if let Err(e) = server.await {
        error!(error = %e, "server error");
    }
}
