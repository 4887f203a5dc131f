//! The router: handler registry, route table compilation, and dispatch.

use crate::error::RouterError;
use crate::route::{CompiledRoute, HandlerFn, HandlerRef, RouteDef, RouteOptions, RouteParams};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// Hook invoked before a matched route's handler runs.
pub type BeforeHook = Arc<dyn Fn(&str, &RouteParams) + Send + Sync>;

/// A successful path recognition: the winning route and its parameters.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    /// The first route whose pattern matched
    pub route: &'a CompiledRoute,
    /// Extracted, percent-decoded parameters
    pub params: RouteParams,
}

/// Compiled router. Routes are tested in declaration order; the first match
/// wins.
pub struct Router {
    name: String,
    routes: Vec<CompiledRoute>,
    before: Option<BeforeHook>,
}

impl Router {
    /// Start building a router with the given display name
    pub fn builder(name: impl Into<String>) -> RouterBuilder {
        RouterBuilder::new(name)
    }

    /// The router's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiled routes, in declaration order
    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    /// Find the first route matching `path` and extract its parameters.
    ///
    /// Returns `Ok(None)` when no route matches.
    pub fn recognize(&self, path: &str) -> Result<Option<RouteMatch<'_>>, RouterError> {
        for route in &self.routes {
            if route.is_match(path) {
                tracing::trace!(
                    router = %self.name,
                    route = route.pattern().as_str(),
                    path,
                    "route matched"
                );
                let params = route.extract_params(path)?;
                return Ok(Some(RouteMatch { route, params }));
            }
        }
        Ok(None)
    }

    /// Recognize `path` and invoke the winning route's handler.
    ///
    /// The before-hook, if any, runs first. Returns whether a route matched.
    pub fn dispatch(&self, path: &str) -> Result<bool, RouterError> {
        let matched = match self.recognize(path)? {
            Some(matched) => matched,
            None => return Ok(false),
        };
        if let Some(before) = &self.before {
            before(path, &matched.params);
        }
        (matched.route.handler())(&matched.params, matched.route.options());
        Ok(true)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("name", &self.name)
            .field("routes", &self.routes.len())
            .finish()
    }
}

/// Builder owning the handler registry and accumulating compiled routes.
///
/// Handlers must be registered before any route that names them; resolution
/// happens when the route is added, so a handler registered later is never
/// picked up retroactively.
pub struct RouterBuilder {
    name: String,
    handlers: HashMap<String, HandlerFn>,
    routes: Vec<CompiledRoute>,
    table_declared: bool,
    before: Option<BeforeHook>,
}

impl RouterBuilder {
    /// Create a builder with the given display name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: HashMap::new(),
            routes: Vec::new(),
            table_declared: false,
            before: None,
        }
    }

    /// Register a named handler
    pub fn handler(
        mut self,
        name: impl Into<String>,
        func: impl Fn(&RouteParams, &RouteOptions) + Send + Sync + 'static,
    ) -> Self {
        self.handlers.insert(name.into(), Arc::new(func));
        self
    }

    /// Install a hook that runs before every matched route's handler
    pub fn before(mut self, hook: impl Fn(&str, &RouteParams) + Send + Sync + 'static) -> Self {
        self.before = Some(Arc::new(hook));
        self
    }

    /// Install and compile a declarative route table, in declared order.
    ///
    /// Each definition's `path` and `handler` are consumed; everything else
    /// is preserved as that route's options. An empty table is legal and
    /// satisfies the table requirement checked by [`build`](Self::build).
    pub fn routes(mut self, table: Vec<RouteDef>) -> Result<Self, RouterError> {
        self.table_declared = true;
        for def in table {
            self = self.route(&def.path, HandlerRef::Named(def.handler), def.options)?;
        }
        Ok(self)
    }

    /// Append one route, compiling the path and resolving the handler now
    pub fn route(
        mut self,
        path: &str,
        handler: HandlerRef,
        options: RouteOptions,
    ) -> Result<Self, RouterError> {
        let (name, func) = self.resolve(handler)?;
        self.routes
            .push(CompiledRoute::from_path(path, name, func, options)?);
        Ok(self)
    }

    /// Append one route with a pre-built pattern; no parameter names are
    /// inferred
    pub fn pattern(
        mut self,
        pattern: Regex,
        handler: HandlerRef,
        options: RouteOptions,
    ) -> Result<Self, RouterError> {
        let (name, func) = self.resolve(handler)?;
        self.routes
            .push(CompiledRoute::from_pattern(pattern, name, func, options));
        Ok(self)
    }

    /// Finish the router.
    ///
    /// Fails if no route table was ever declared and no routes were added:
    /// a router with no way to ever match anything is a configuration error.
    /// An explicitly empty table is not.
    pub fn build(self) -> Result<Router, RouterError> {
        if !self.table_declared && self.routes.is_empty() {
            return Err(RouterError::MissingRoutes { router: self.name });
        }
        tracing::debug!(router = %self.name, routes = self.routes.len(), "router compiled");
        Ok(Router {
            name: self.name,
            routes: self.routes,
            before: self.before,
        })
    }

    fn resolve(&self, handler: HandlerRef) -> Result<(Option<String>, HandlerFn), RouterError> {
        match handler {
            HandlerRef::Named(name) => match self.handlers.get(&name) {
                Some(func) => Ok((Some(name), func.clone())),
                None => Err(RouterError::UnknownHandler {
                    router: self.name.clone(),
                    handler: name,
                }),
            },
            HandlerRef::Func { name, func } => Ok((name, func)),
        }
    }
}

impl std::fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("name", &self.name)
            .field("handlers", &self.handlers.len())
            .field("routes", &self.routes.len())
            .field("table_declared", &self.table_declared)
            .finish()
    }
}
