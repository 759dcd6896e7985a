//! HTTP route handlers for the socialgraph API
//!
//! This module contains all HTTP endpoint handlers including:
//! - The GraphQL endpoint and playground
//! - Health check and status endpoints

pub mod graphql;
pub mod health;

pub use graphql::{graphql_router, GraphQLState};
pub use health::{health_router, HealthState};
