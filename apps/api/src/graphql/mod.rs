//! GraphQL schema and resolvers for socialgraph
//!
//! This module contains the async-graphql schema including:
//! - Query resolvers for member types, users, profiles and posts
//! - Mutation resolvers for CRUD and subscriptions
//! - Type definitions whose relationships resolve through batch loaders
//! - Request-scoped loaders and the priming done by list queries

pub mod loaders;
pub mod mutation;
pub mod priming;
pub mod query;
pub mod schema;
pub mod types;

pub use loaders::{LoaderRegistry, LoaderSettings};
pub use schema::{build_schema, SchemaBuilder, SocialGraphSchema};
