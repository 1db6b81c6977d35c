//! # RBAC Routes
//!
//! Collects the routes an application has registered so permissions can be
//! derived from them.
//!
//! ## Overview
//!
//! The rbac-routes crate handles:
//! - **Definitions**: Routes as the routing table exposes them
//! - **Descriptors**: The immutable per-run view of a route
//! - **Filters**: Substring predicates on method, name and path
//! - **Collection**: Filtering, stable sorting and reversing
//!
//! ## Columns
//!
//! ```text
//! host | method   | uri        | name       | action              | middleware
//!      | GET|HEAD | users/{id} | users.show | UserController@show | web,auth
//! ```
//!
//! Any column can be used as the sort key; `uri` is the default.
//!
//! ## Usage
//!
//! ```rust
//! use rbac_routes::{CollectOptions, RouteCollector, RouteDefinition, SortColumn};
//!
//! let table = vec![
//!     RouteDefinition::new(["GET", "HEAD"], "users/{id}").with_action("UserController@show"),
//!     RouteDefinition::new(["POST"], "users").with_action("UserController@store"),
//! ];
//!
//! let options = CollectOptions::new()
//!     .with_path("users")
//!     .sorted_by(SortColumn::Method)
//!     .reversed(true);
//!
//! let routes = RouteCollector::new(options).collect(&table);
//! assert_eq!(routes[0].method(), "POST");
//! assert_eq!(routes[1].controller_method(), Some("show"));
//! ```

pub mod collector;
pub mod error;
pub mod filter;
pub mod route;

// Re-export main types for convenience
pub use collector::{CollectOptions, RouteCollector, RouteSource, SortColumn};
pub use error::{RouteError, RouteResult};
pub use filter::RouteFilter;
pub use route::{HandlerRef, Middleware, RouteDefinition, RouteDescriptor, CLOSURE_ACTION};
