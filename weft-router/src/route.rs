//! Route definitions and their compiled form.

use crate::compile::{compile_path, path_param_names};
use crate::error::RouterError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Named parameters extracted from a matched path, percent-decoded.
pub type RouteParams = BTreeMap<String, String>;

/// Static options attached to a route (everything in a [`RouteDef`] besides
/// `path` and `handler`).
pub type RouteOptions = serde_json::Map<String, Value>;

/// A route handler function.
///
/// Invoked with the extracted parameters and the route's static options.
pub type HandlerFn = Arc<dyn Fn(&RouteParams, &RouteOptions) + Send + Sync>;

/// A declarative route description.
///
/// Route tables are plain data; extra keys beyond `path` and `handler` are
/// collected into [`RouteOptions`] and handed to the handler verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDef {
    /// Route path, e.g. `"posts/:id/*"`
    pub path: String,
    /// Name of the handler registered with the router builder
    pub handler: String,
    /// All remaining keys, preserved as options
    #[serde(flatten)]
    pub options: RouteOptions,
}

impl RouteDef {
    /// Create a definition with no extra options
    pub fn new(path: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            handler: handler.into(),
            options: RouteOptions::new(),
        }
    }

    /// Attach a static option
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Reference to a handler at route-registration time.
///
/// Either the name of a handler already registered with the builder, or a
/// function supplied inline with an explicit display name. Name resolution
/// happens when the route is added, never later.
pub enum HandlerRef {
    /// Look up a registered handler by name
    Named(String),
    /// Use the given function directly
    Func {
        /// Display name, if any
        name: Option<String>,
        /// The handler itself
        func: HandlerFn,
    },
}

impl HandlerRef {
    /// Reference a registered handler by name
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Supply a handler inline under a display name
    pub fn func(
        name: impl Into<String>,
        func: impl Fn(&RouteParams, &RouteOptions) + Send + Sync + 'static,
    ) -> Self {
        Self::Func {
            name: Some(name.into()),
            func: Arc::new(func),
        }
    }

    /// Supply an anonymous handler
    pub fn anonymous(func: impl Fn(&RouteParams, &RouteOptions) + Send + Sync + 'static) -> Self {
        Self::Func {
            name: None,
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            HandlerRef::Func { name, .. } => f.debug_tuple("Func").field(name).finish(),
        }
    }
}

/// A route after compilation: matcher, aligned parameter names, resolved
/// handler, and static options.
#[derive(Clone)]
pub struct CompiledRoute {
    pattern: Regex,
    param_names: Vec<String>,
    handler_name: Option<String>,
    handler: HandlerFn,
    options: RouteOptions,
}

impl CompiledRoute {
    /// Compile a route path, inferring parameter names from its tokens
    pub fn from_path(
        path: &str,
        handler_name: Option<String>,
        handler: HandlerFn,
        options: RouteOptions,
    ) -> Result<Self, RouterError> {
        Ok(Self {
            pattern: compile_path(path)?,
            param_names: path_param_names(path),
            handler_name,
            handler,
            options,
        })
    }

    /// Use a pre-built pattern directly; no parameter names are inferred
    pub fn from_pattern(
        pattern: Regex,
        handler_name: Option<String>,
        handler: HandlerFn,
        options: RouteOptions,
    ) -> Self {
        Self {
            pattern,
            param_names: Vec::new(),
            handler_name,
            handler,
            options,
        }
    }

    /// The compiled matcher
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Parameter names, positionally aligned with the pattern's captures
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Display name of the handler, if it has one
    pub fn handler_name(&self) -> Option<&str> {
        self.handler_name.as_deref()
    }

    /// The resolved handler
    pub fn handler(&self) -> &HandlerFn {
        &self.handler
    }

    /// Static options declared with the route
    pub fn options(&self) -> &RouteOptions {
        &self.options
    }

    /// Check whether a path matches this route
    pub fn is_match(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    /// Extract named parameters from a path this route matches.
    ///
    /// Captured values are percent-decoded and zipped positionally with the
    /// parameter names. Captures beyond the name list are dropped; names
    /// without a capture are left absent. Callers are expected to have
    /// matched the path already; a non-matching path is a precondition
    /// violation and returns [`RouterError::UnmatchedPath`].
    pub fn extract_params(&self, path: &str) -> Result<RouteParams, RouterError> {
        let caps = self
            .pattern
            .captures(path)
            .ok_or_else(|| RouterError::UnmatchedPath {
                path: path.to_string(),
                route: self.pattern.as_str().to_string(),
            })?;

        let mut params = RouteParams::new();
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(cap) = caps.get(i + 1) {
                let decoded =
                    urlencoding::decode(cap.as_str()).map_err(|source| RouterError::Decode {
                        value: cap.as_str().to_string(),
                        source,
                    })?;
                params.insert(name.clone(), decoded.into_owned());
            }
        }
        Ok(params)
    }
}

impl fmt::Debug for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRoute")
            .field("pattern", &self.pattern.as_str())
            .field("param_names", &self.param_names)
            .field("handler_name", &self.handler_name)
            .finish()
    }
}
