//! # RBAC Docs
//!
//! Reads handler documentation for route-derived permissions.
//!
//! ## Overview
//!
//! The rbac-docs crate handles:
//! - **Parsing**: Turning a doc block into a tag map (`DocInfo`)
//! - **Lookup**: Mapping a `Controller@method` handler to its doc block
//!
//! ## Doc Block Format
//!
//! ```text
//! /**
//!  * Fetch a user by id
//!  *
//!  * @func Get User
//!  */
//! ```
//!
//! The first untagged paragraph becomes `description`; `@func` is the
//! display name used for the generated permission.
//!
//! ## Usage
//!
//! ```rust
//! use rbac_docs::{DocParser, DocRegistry, DocResolver};
//!
//! let mut registry = DocRegistry::new();
//! registry.register("UserController", "show", "/**\n * Fetch a user by id\n * @func Get User\n */");
//!
//! let doc = registry.resolve("UserController", "show").unwrap();
//! let info = DocParser::new().parse_opt(doc.as_deref());
//! assert_eq!(info.func(), "Get User");
//! assert_eq!(info.description(), "Fetch a user by id");
//! ```

pub mod parser;
pub mod registry;

// Re-export main types for convenience
pub use parser::{DocInfo, DocParser, DESCRIPTION_TAG, FUNC_TAG, LONG_DESCRIPTION_TAG};
pub use registry::{DocError, DocRegistry, DocResolver, DocResult};
