//! End-to-end routing: a route table loaded from data, driven through
//! dispatch.

use parking_lot::Mutex;
use std::sync::Arc;
use weft_router::{RouteDef, Router};

#[test]
fn table_from_json_drives_dispatch() {
    let table: Vec<RouteDef> = serde_json::from_str(
        r#"[
            {"path": "posts", "handler": "index"},
            {"path": "posts/:id", "handler": "show"},
            {"path": "posts/:id/*", "handler": "show", "nested": true}
        ]"#,
    )
    .expect("route table parses");

    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let index_log = log.clone();
    let show_log = log.clone();

    let router = Router::builder("posts")
        .handler("index", move |_params, _opts| {
            index_log.lock().push("index".to_string());
        })
        .handler("show", move |params, opts| {
            let nested = opts.get("nested").and_then(|v| v.as_bool()).unwrap_or(false);
            let id = params.get("id").cloned().unwrap_or_default();
            let splat = params.get("splat").cloned().unwrap_or_default();
            show_log.lock().push(format!("show id={id} splat={splat} nested={nested}"));
        })
        .routes(table)
        .expect("table compiles")
        .build()
        .expect("router builds");

    assert!(router.dispatch("posts").expect("dispatch"));
    assert!(router.dispatch("posts/42").expect("dispatch"));
    assert!(router.dispatch("posts/7/comments/2").expect("dispatch"));
    assert!(!router.dispatch("users/1").expect("dispatch"));

    assert_eq!(
        log.lock().as_slice(),
        [
            "index",
            "show id=42 splat= nested=false",
            "show id=7 splat=comments/2 nested=true",
        ]
    );
}

#[test]
fn encoded_segments_decode_before_handlers_see_them() {
    let seen: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let seen_clone = seen.clone();

    let router = Router::builder("files")
        .handler("open", move |params, _opts| {
            *seen_clone.lock() = params.get("name").cloned();
        })
        .routes(vec![RouteDef::new("files/:name", "open")])
        .expect("table compiles")
        .build()
        .expect("router builds");

    assert!(router.dispatch("files/a%2Fb%20c").expect("dispatch"));
    assert_eq!(seen.lock().as_deref(), Some("a/b c"));
}
