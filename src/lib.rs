//! Core library exports for the Inkpost blog platform.
//!
//! This crate exposes the domain entities, Diesel models, repositories,
//! forms, routes and service layers used by the Inkpost web application.

pub mod auth;
pub mod db;
pub mod domain;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
