//! GraphQL schema builder for socialgraph
//!
//! The schema carries only the store. Loaders are request-scoped and are
//! attached to each request by the HTTP handler.

use async_graphql::{EmptySubscription, Schema};

use crate::config::DEFAULT_GRAPHQL_MAX_DEPTH;
use crate::repositories::DynStore;

use super::mutation::Mutation;
use super::query::Query;

/// The socialgraph GraphQL schema type
pub type SocialGraphSchema = Schema<Query, Mutation, EmptySubscription>;

/// Builder for constructing the GraphQL schema
pub struct SchemaBuilder {
    store: DynStore,
    max_depth: usize,
}

impl SchemaBuilder {
    /// Create a new schema builder over `store`
    pub fn new(store: DynStore) -> Self {
        Self {
            store,
            max_depth: DEFAULT_GRAPHQL_MAX_DEPTH,
        }
    }

    /// Set the maximum query depth
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the schema
    pub fn build(self) -> SocialGraphSchema {
        Schema::build(Query::default(), Mutation::default(), EmptySubscription)
            .data(self.store)
            .limit_depth(self.max_depth)
            .finish()
    }
}

/// Create a new GraphQL schema with the default depth limit
pub fn build_schema(store: DynStore) -> SocialGraphSchema {
    SchemaBuilder::new(store).build()
}
