use crate::core::{Method, Request, Response};
use crate::error::WebError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Process the request and return a response or error
    async fn handle(&self, req: Request) -> Result<Response, WebError>;
}

/// Wrapper for simple closure-based handlers that return Result
pub struct ResultClosure<F>
where
    F: Fn(Request) -> Result<Response, WebError> + Send + Sync + 'static,
{
    closure: F,
}

impl<F> ResultClosure<F>
where
    F: Fn(Request) -> Result<Response, WebError> + Send + Sync + 'static,
{
    pub fn new(closure: F) -> Self {
        Self { closure }
    }
}

#[async_trait]
impl<F> Handler for ResultClosure<F>
where
    F: Fn(Request) -> Result<Response, WebError> + Send + Sync + 'static,
{
    async fn handle(&self, req: Request) -> Result<Response, WebError> {
        (self.closure)(req)
    }
}

/// A registered method + path pattern, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub path: String,
}

pub struct Router {
    by_method: HashMap<String, matchit::Router<Arc<dyn Handler>>>,
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            by_method: HashMap::new(),
            routes: Vec::new(),
        }
    }

    /// Register `handler` for `method` on `path` (matchit syntax, e.g. `/files/{*path}`).
    ///
    /// # Panics
    ///
    /// Panics if the pattern is malformed or conflicts with an existing route.
    /// Routes are registered at startup, before any request is served.
    pub fn add<S: Into<String>>(&mut self, method: Method, path: S, handler: Arc<dyn Handler>) {
        let path = path.into();
        let r = self.by_method.entry(method.as_str().to_string()).or_default();
        if let Err(e) = r.insert(path.clone(), handler) {
            panic!("invalid route {method} {path}: {e}");
        }
        self.routes.push(Route { method, path });
    }

    pub fn get<S: Into<String>>(&mut self, path: S, handler: Arc<dyn Handler>) {
        self.add(Method::GET, path, handler)
    }

    /// Add a GET route with a simple closure handler returning Result
    pub fn get_fn<S, F>(&mut self, path: S, handler: F)
    where
        S: Into<String>,
        F: Fn(Request) -> Result<Response, WebError> + Send + Sync + 'static,
    {
        self.add(Method::GET, path, Arc::new(ResultClosure::new(handler)))
    }

    pub fn post<S: Into<String>>(&mut self, path: S, handler: Arc<dyn Handler>) {
        self.add(Method::POST, path, handler)
    }

    /// Every registered route, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn find(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(Arc<dyn Handler>, HashMap<String, String>)> {
        // Try exact method first
        if let Some(r) = self.by_method.get(method.as_str())
            && let Ok(m) = r.at(path)
        {
            let params = m
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            return Some((Arc::clone(m.value), params));
        }

        // Per RFC, HEAD should behave like GET without body if no explicit HEAD route is present
        if *method == Method::HEAD
            && let Some(rget) = self.by_method.get(Method::GET.as_str())
            && let Ok(m) = rget.at(path)
        {
            let params = m
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            return Some((Arc::clone(m.value), params));
        }

        None
    }

    /// Return a list of methods that match the given path pattern (for 405 responses)
    pub fn allowed_methods(&self, path: &str) -> Vec<String> {
        let mut methods: Vec<String> = self
            .by_method
            .iter()
            .filter(|(_, r)| r.at(path).is_ok())
            .map(|(m, _)| m.clone())
            .collect();
        methods.sort();
        methods
    }
}
