//! rbac - generate access-control permissions from application routes
//!
//! reads a route manifest (the application's route table plus handler doc
//! blocks), derives one permission per route and writes it to a json
//! permission store.

pub mod cli;
pub mod manifest;
