//! route manifest - the application's route table and handler docs.
//!
//! ```text
//! {
//!   "routes": [
//!     { "methods": ["GET", "HEAD"], "uri": "users/{id}", "name": "users.show",
//!       "action": "App\\Http\\Controllers\\UserController@show",
//!       "middleware": ["web", "auth"] }
//!   ],
//!   "docs": {
//!     "App\\Http\\Controllers\\UserController@show": "/**\n * Fetch a user by id\n * @func Get User\n */"
//!   }
//! }
//! ```
//!
//! a handler listed in `docs` with a `null` value exists but is undocumented.

use std::collections::BTreeMap;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use rbac_docs::DocRegistry;
use rbac_routes::RouteDefinition;
use serde::{Deserialize, Serialize};

/// route table plus per-handler doc blocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteManifest {
    /// registered routes, in registration order
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,

    /// `Controller@method` -> doc block
    #[serde(default)]
    pub docs: BTreeMap<String, Option<String>>,
}

impl RouteManifest {
    /// load a manifest from a json file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read route manifest: {:?}", path))?;
        Self::from_json(&contents)
            .with_context(|| format!("failed to parse route manifest: {:?}", path))
    }

    /// parse a manifest from json text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// split into the route table and a doc registry
    pub fn into_parts(self) -> Result<(Vec<RouteDefinition>, DocRegistry)> {
        let docs = DocRegistry::from_handlers(self.docs).context("invalid handler in docs")?;
        Ok((self.routes, docs))
    }
}
