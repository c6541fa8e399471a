#![cfg(feature = "http-router")]

use shape_router::{
    Dispatcher, Output, Rejection, Reply, RequestArgs, Resource, RespondWithError, StatusCode,
};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

#[derive(Default)]
struct Items {
    calls: Mutex<Vec<(&'static str, Option<String>)>>,
    rows: Mutex<Vec<Value>>,
}

impl Items {
    fn record(&self, op: &'static str, args: &RequestArgs) {
        let id = args.get_str("id").map(str::to_owned);
        self.calls.lock().unwrap().push((op, id));
    }

    fn calls(&self) -> Vec<(&'static str, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Resource for Items {
    fn index(&self, args: &RequestArgs) -> Option<Value> {
        self.record("index", args);
        Some(Value::Array(self.rows.lock().unwrap().clone()))
    }

    fn show(&self, args: &RequestArgs) -> Option<Value> {
        self.record("show", args);
        let id = args.get_str("id")?;
        let rows = self.rows.lock().unwrap();
        rows.iter().find(|row| row["id"] == id).cloned()
    }

    fn create(&self, args: &RequestArgs) -> Option<Value> {
        self.record("create", args);
        let row = args.data().clone();
        self.rows.lock().unwrap().push(row.clone());
        Some(row)
    }

    fn update(&self, args: &RequestArgs) -> Option<Value> {
        self.record("update", args);
        let id = args.get_str("id")?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|row| row["id"] == id)?;
        if let (Some(row), Some(changes)) = (row.as_object_mut(), args.data().as_object()) {
            for (k, v) in changes {
                row.insert(k.clone(), v.clone());
            }
        }
        Some(row.clone())
    }

    fn destroy(&self, args: &RequestArgs) -> Option<Value> {
        self.record("destroy", args);
        let id = args.get_str("id")?;
        let mut rows = self.rows.lock().unwrap();
        let pos = rows.iter().position(|row| row["id"] == id)?;
        Some(rows.remove(pos))
    }
}

fn allow_all(_: &RequestArgs) -> Result<(), Rejection> {
    Ok(())
}

fn write_or_404(_: &RequestArgs, result: Option<Value>, out: &mut dyn Output) {
    match result {
        Some(v) => out.ok(v),
        None => out.error("Item not found", StatusCode::NOT_FOUND),
    }
}

fn send(
    dispatcher: &Dispatcher,
    verb: &str,
    path: &str,
    query: Option<&str>,
    body: Value,
    token: Option<&str>,
) -> Reply {
    let mut reply = Reply::new();
    dispatcher.process(verb, path, query, body, token, &mut reply);
    reply
}

fn echo(args: RequestArgs, out: &mut dyn Output) {
    out.ok(args.into())
}

#[test]
fn resources_elect_conventional_routes() {
    let items = Arc::new(Items::default());
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .resources("/items", Arc::clone(&items), allow_all, write_or_404)
        .unwrap();

    for (verb, path) in [
        ("GET", "/items"),
        ("GET", "/items/7"),
        ("POST", "/items"),
        ("PUT", "/items/7"),
        ("DELETE", "/items/7"),
    ] {
        send(&dispatcher, verb, path, None, json!({}), None);
    }

    assert_eq!(
        items.calls(),
        [
            ("index", None),
            ("show", Some("7".to_owned())),
            ("create", None),
            ("update", Some("7".to_owned())),
            ("destroy", Some("7".to_owned())),
        ]
    );
}

#[test]
fn resources_side_effects_are_visible() {
    let items = Arc::new(Items::default());
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .resources("/items", items, allow_all, write_or_404)
        .unwrap();

    let reply = send(&dispatcher, "POST", "/items", None, json!({"id": "1", "name": "a"}), None);
    assert_eq!(reply.status(), Some(StatusCode::OK));

    let reply = send(&dispatcher, "PUT", "/items/1", None, json!({"name": "b"}), None);
    assert_eq!(reply.body(), Some(&json!({"id": "1", "name": "b"})));

    let reply = send(&dispatcher, "GET", "/items", None, json!({}), None);
    assert_eq!(reply.body(), Some(&json!([{"id": "1", "name": "b"}])));

    let reply = send(&dispatcher, "DELETE", "/items/1", None, json!({}), None);
    assert_eq!(reply.status(), Some(StatusCode::OK));

    let reply = send(&dispatcher, "GET", "/items/1", None, json!({}), None);
    assert_eq!(reply.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(reply.body(), Some(&json!({"error": "Item not found"})));
}

#[test]
fn resources_rejection_skips_operation() {
    let items = Arc::new(Items::default());
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .set_error_handler(RespondWithError)
        .resources(
            "/items",
            Arc::clone(&items),
            |args: &RequestArgs| match args.token() {
                Some("secret") => Ok(()),
                _ => Err(Rejection::unauthorized("You are not logged in.")),
            },
            write_or_404,
        )
        .unwrap();

    let reply = send(&dispatcher, "GET", "/items", None, json!({}), None);
    assert_eq!(reply.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(reply.body(), Some(&json!({"error": "You are not logged in."})));
    assert!(items.calls().is_empty());

    let reply = send(&dispatcher, "GET", "/items", None, json!({}), Some("secret"));
    assert_eq!(reply.status(), Some(StatusCode::OK));
    assert_eq!(items.calls(), [("index", None)]);
}

#[test]
fn resources_rejection_goes_through_error_handler() {
    let items = Arc::new(Items::default());
    let errors: Arc<Mutex<Vec<(String, StatusCode)>>> = Arc::default();

    let mut dispatcher = Dispatcher::new();
    dispatcher
        .resources(
            "/items",
            Arc::clone(&items),
            |_: &RequestArgs| Err(Rejection::unauthorized("no")),
            write_or_404,
        )
        .unwrap();

    // installed after the routes were bound
    {
        let errors = Arc::clone(&errors);
        dispatcher.on_error(move |message, status, out| {
            errors.lock().unwrap().push((message.to_owned(), status));
            out.write(json!({ "problem": message }), status);
        });
    }

    let reply = send(&dispatcher, "GET", "/items", None, json!({}), None);
    assert_eq!(reply.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(reply.body(), Some(&json!({"problem": "no"})));

    let reply = send(&dispatcher, "GET", "/nope", None, json!({}), None);
    assert_eq!(reply.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(
        reply.body(),
        Some(&json!({"problem": "The route /nope was not found."}))
    );

    assert_eq!(
        *errors.lock().unwrap(),
        [
            ("no".to_owned(), StatusCode::UNAUTHORIZED),
            ("The route /nope was not found.".to_owned(), StatusCode::NOT_FOUND),
        ]
    );
    assert!(items.calls().is_empty());
}

#[test]
fn rejection_with_default_error_handler_writes_nothing() {
    let items = Arc::new(Items::default());
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .resources(
            "/items",
            Arc::clone(&items),
            |_: &RequestArgs| Err(Rejection::unauthorized("no")),
            write_or_404,
        )
        .unwrap();

    let reply = send(&dispatcher, "DELETE", "/items/3", None, json!({}), None);
    assert!(!reply.is_written());
    assert!(items.calls().is_empty());
}

#[test]
fn process_reports_election() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.get("/here", echo);

    let mut reply = Reply::new();
    assert!(dispatcher.process("GET", "/here", None, json!({}), None, &mut reply));

    let mut reply = Reply::new();
    assert!(!dispatcher.process("GET", "/there", None, json!({}), None, &mut reply));
}

#[test]
fn not_found_calls_error_handler_only() {
    let errors: Arc<Mutex<Vec<(String, StatusCode)>>> = Arc::default();
    let handled = Arc::new(AtomicUsize::new(0));

    let mut dispatcher = Dispatcher::new();
    {
        let errors = Arc::clone(&errors);
        dispatcher.on_error(move |message, status, _| {
            errors.lock().unwrap().push((message.to_owned(), status));
        });
    }
    {
        let handled = Arc::clone(&handled);
        dispatcher.get("/items", move |_, _| {
            handled.fetch_add(1, Ordering::SeqCst);
        });
    }

    let reply = send(&dispatcher, "PATCH", "/items", None, json!({}), None);
    assert!(!reply.is_written());

    send(&dispatcher, "GET", "/missing", None, json!({}), None);
    send(&dispatcher, "NOT A VERB", "/items", None, json!({}), None);

    assert_eq!(handled.load(Ordering::SeqCst), 0);
    assert_eq!(
        *errors.lock().unwrap(),
        [
            ("The route /items was not found.".to_owned(), StatusCode::NOT_FOUND),
            ("The route /missing was not found.".to_owned(), StatusCode::NOT_FOUND),
            ("The route /items was not found.".to_owned(), StatusCode::NOT_FOUND),
        ]
    );

    send(&dispatcher, "get", "/items", None, json!({}), None);
    assert_eq!(handled.load(Ordering::SeqCst), 1);
}

#[test]
fn default_error_handler_writes_nothing() {
    let dispatcher = Dispatcher::new();
    let reply = send(&dispatcher, "GET", "/", None, json!({}), None);
    assert!(!reply.is_written());
}

#[test]
fn respond_with_error_writes_404() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.set_error_handler(RespondWithError);

    let reply = send(&dispatcher, "GET", "/nowhere", None, json!({}), None);
    assert_eq!(reply.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(
        reply.body(),
        Some(&json!({"error": "The route /nowhere was not found."}))
    );
}

#[test]
fn second_registration_replaces_first() {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .get("/hello", |_, out| out.message("first", StatusCode::OK))
        .get("/hello", |_, out| out.message("second", StatusCode::OK));

    let reply = send(&dispatcher, "GET", "/hello", None, json!({}), None);
    assert_eq!(reply.body(), Some(&json!({"message": "second"})));
}

#[test]
fn request_args_bundle() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.post("/test/:id", echo);

    let reply = send(
        &dispatcher,
        "POST",
        "/test/123",
        Some("ice=cream"),
        json!({"hi": "there"}),
        Some("ABCD"),
    );

    assert_eq!(
        reply.body(),
        Some(&json!({
            "data": {"hi": "there"},
            "id": "123",
            "ice": "cream",
            "token": "ABCD",
        }))
    );
}

#[test]
fn path_params_win_collisions() {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .get("/configurations/:id", echo)
        .get("/tokens/:token", echo);

    let reply = send(
        &dispatcher,
        "GET",
        "/configurations/42",
        Some("id=query&limit=5"),
        json!({}),
        None,
    );
    let body = reply.body().unwrap();
    assert_eq!(body["id"], "42");
    assert_eq!(body["limit"], "5");
    assert!(body["token"].is_null());

    let reply = send(&dispatcher, "GET", "/tokens/path", None, json!({}), Some("header"));
    assert_eq!(reply.body().unwrap()["token"], "path");
}

#[test]
fn route_rejects_bad_verb() {
    let mut dispatcher = Dispatcher::new();
    assert!(dispatcher.route("BAD VERB", "/", echo).is_err());
    assert!(dispatcher.route("delete", "/x/:id", echo).is_ok());

    let reply = send(&dispatcher, "DELETE", "/x/9", None, json!({}), None);
    assert_eq!(reply.body().unwrap()["id"], "9");
}
