//! Declarative path routing.
//!
//! A [`Router`] is built from named handlers plus a route table. Route paths
//! are compiled once into anchored regular expressions; at dispatch time the
//! routes are tested in declaration order and the first match wins.
//!
//! # Path syntax
//!
//! - `:name` matches a single path segment and binds it as a named parameter.
//! - `*` or `*name` matches any remainder (including `/`) and binds it as
//!   `splat` (`splat2`, `splat3`, ... for later occurrences).
//! - Everything else is matched literally; regex metacharacters are escaped.
//!
//! # Example
//!
//! ```
//! use weft_router::{RouteDef, Router};
//!
//! let router = Router::builder("posts")
//!     .handler("show", |params, _opts| {
//!         assert_eq!(params.get("id").map(String::as_str), Some("42"));
//!     })
//!     .routes(vec![RouteDef::new("posts/:id", "show")])
//!     .expect("route table compiles")
//!     .build()
//!     .expect("router builds");
//!
//! assert!(router.dispatch("posts/42").expect("dispatch"));
//! assert!(!router.dispatch("nope").expect("dispatch"));
//! ```
//!
//! Handlers are bound by name when a route is registered, never later: adding
//! a route whose handler is unknown is an immediate error.

mod compile;
mod error;
mod route;
mod router;

pub use compile::{compile_path, path_param_names};
pub use error::RouterError;
pub use route::{CompiledRoute, HandlerFn, HandlerRef, RouteDef, RouteOptions, RouteParams};
pub use router::{BeforeHook, RouteMatch, Router, RouterBuilder};
