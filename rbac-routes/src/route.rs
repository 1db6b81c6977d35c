//! # Routes
//!
//! Route types as exposed by the routing collaborator ([`RouteDefinition`])
//! and the immutable per-run view the collector works with
//! ([`RouteDescriptor`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action name used by routes whose handler is an inline closure.
pub const CLOSURE_ACTION: &str = "Closure";

/// A middleware attached to a route.
///
/// Closure middleware has no stable name and is displayed as `Closure`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Middleware {
    /// Named middleware (e.g., "auth", "throttle:60,1").
    Named(String),
    /// Inline closure middleware.
    Closure,
}

impl Middleware {
    /// Get the display identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Middleware::Named(name) => name,
            Middleware::Closure => CLOSURE_ACTION,
        }
    }
}

impl From<String> for Middleware {
    fn from(s: String) -> Self {
        if s == CLOSURE_ACTION {
            Middleware::Closure
        } else {
            Middleware::Named(s)
        }
    }
}

impl From<&str> for Middleware {
    fn from(s: &str) -> Self {
        Middleware::from(s.to_string())
    }
}

impl From<Middleware> for String {
    fn from(m: Middleware) -> Self {
        m.as_str().to_string()
    }
}

/// A registered route, as the routing table provides it.
///
/// # Example
///
/// ```
/// use rbac_routes::RouteDefinition;
///
/// let route = RouteDefinition::new(["GET", "HEAD"], "users/{id}")
///     .with_name("users.show")
///     .with_action("App\\Http\\Controllers\\UserController@show")
///     .with_middleware(["web", "auth"]);
/// assert_eq!(route.uri, "users/{id}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// HTTP verbs in registration order.
    pub methods: Vec<String>,
    /// URI pattern (e.g., "users/{id}").
    pub uri: String,
    /// Optional route name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Handler reference: `Controller@method`, or `Closure`.
    #[serde(default = "closure_action")]
    pub action: String,
    /// Optional domain the route is bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Middleware pipeline in order.
    #[serde(default)]
    pub middleware: Vec<Middleware>,
}

fn closure_action() -> String {
    CLOSURE_ACTION.to_string()
}

impl RouteDefinition {
    /// Create a closure route for the given verbs and URI.
    pub fn new<I, S>(methods: I, uri: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            methods: methods.into_iter().map(Into::into).collect(),
            uri: uri.into(),
            name: None,
            action: closure_action(),
            host: None,
            middleware: Vec::new(),
        }
    }

    /// Set the route name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the handler reference.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Set the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the middleware pipeline.
    pub fn with_middleware<I, M>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Middleware>,
    {
        self.middleware = middleware.into_iter().map(Into::into).collect();
        self
    }
}

/// Controller and method a route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandlerRef {
    /// Fully-qualified controller reference.
    pub controller: String,
    /// Method on the controller.
    pub method: String,
}

impl HandlerRef {
    /// Parse `Controller@method`. Closures and bare references give `None`.
    pub fn parse(action: &str) -> Option<Self> {
        let (controller, method) = action.split_once('@')?;
        if controller.is_empty() || method.is_empty() {
            return None;
        }
        Some(Self {
            controller: controller.to_string(),
            method: method.to_string(),
        })
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.controller, self.method)
    }
}

/// Immutable description of one discovered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    host: Option<String>,
    method: String,
    uri: String,
    name: Option<String>,
    action: String,
    #[serde(skip)]
    handler: Option<HandlerRef>,
    middleware: Vec<String>,
}

impl RouteDescriptor {
    /// Build a descriptor from a route definition.
    ///
    /// Verbs are upper-cased and de-duplicated in order, then joined with `|`.
    pub fn from_definition(route: &RouteDefinition) -> Self {
        let mut verbs: Vec<String> = Vec::with_capacity(route.methods.len());
        for verb in &route.methods {
            let verb = verb.trim().to_ascii_uppercase();
            if !verb.is_empty() && !verbs.contains(&verb) {
                verbs.push(verb);
            }
        }

        Self {
            host: route.host.clone(),
            method: verbs.join("|"),
            uri: route.uri.clone(),
            name: route.name.clone(),
            action: route.action.clone(),
            handler: HandlerRef::parse(&route.action),
            middleware: route
                .middleware
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
        }
    }

    /// Host the route is bound to.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// HTTP verbs joined with `|` (e.g., "GET|HEAD").
    pub fn method(&self) -> &str {
        &self.method
    }

    /// URI pattern.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Route name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fully-qualified handler reference.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Resolved controller and method, if the handler is not a closure.
    pub fn handler(&self) -> Option<&HandlerRef> {
        self.handler.as_ref()
    }

    /// Controller reference.
    pub fn controller(&self) -> Option<&str> {
        self.handler.as_ref().map(|h| h.controller.as_str())
    }

    /// Method on the controller.
    pub fn controller_method(&self) -> Option<&str> {
        self.handler.as_ref().map(|h| h.method.as_str())
    }

    /// Middleware identifiers in pipeline order.
    pub fn middleware(&self) -> &[String] {
        &self.middleware
    }

    /// Middleware joined with `,` for display and sorting.
    pub fn middleware_display(&self) -> String {
        self.middleware.join(",")
    }
}

impl From<&RouteDefinition> for RouteDescriptor {
    fn from(route: &RouteDefinition) -> Self {
        Self::from_definition(route)
    }
}

impl fmt::Display for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_from_definition() {
        let route = RouteDefinition::new(["get", "HEAD", "GET"], "users/{id}")
            .with_name("users.show")
            .with_action("App\\Http\\Controllers\\UserController@show")
            .with_host("api.example.com")
            .with_middleware(["web", "auth"]);

        let desc = RouteDescriptor::from(&route);
        assert_eq!(desc.method(), "GET|HEAD");
        assert_eq!(desc.uri(), "users/{id}");
        assert_eq!(desc.name(), Some("users.show"));
        assert_eq!(desc.host(), Some("api.example.com"));
        assert_eq!(desc.controller(), Some("App\\Http\\Controllers\\UserController"));
        assert_eq!(desc.controller_method(), Some("show"));
        assert_eq!(desc.middleware_display(), "web,auth");
        assert_eq!(desc.to_string(), "GET|HEAD users/{id}");
    }

    #[test]
    fn test_closure_route_has_no_handler() {
        let desc = RouteDescriptor::from(&RouteDefinition::new(["GET"], "/"));
        assert_eq!(desc.action(), CLOSURE_ACTION);
        assert!(desc.handler().is_none());
        assert!(desc.controller_method().is_none());
    }

    #[test]
    fn test_handler_ref_parsing() {
        let handler = HandlerRef::parse("PostController@store").unwrap();
        assert_eq!(handler.controller, "PostController");
        assert_eq!(handler.method, "store");
        assert_eq!(handler.to_string(), "PostController@store");

        assert!(HandlerRef::parse("Closure").is_none());
        assert!(HandlerRef::parse("@store").is_none());
        assert!(HandlerRef::parse("PostController@").is_none());
    }

    #[test]
    fn test_closure_middleware() {
        let route = RouteDefinition::new(["GET"], "home")
            .with_middleware([Middleware::Named("web".into()), Middleware::Closure]);
        let desc = RouteDescriptor::from(&route);
        assert_eq!(desc.middleware(), &["web".to_string(), "Closure".to_string()]);
    }

    #[test]
    fn test_definition_deserialize_defaults() {
        let json = r#"{"methods": ["POST"], "uri": "posts", "middleware": ["auth", "Closure"]}"#;
        let route: RouteDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(route.action, CLOSURE_ACTION);
        assert!(route.name.is_none());
        assert_eq!(route.middleware[1], Middleware::Closure);
    }
}
