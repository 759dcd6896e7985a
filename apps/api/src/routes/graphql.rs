//! GraphQL HTTP route handlers
//!
//! - `POST /graphql` - Execute a query or mutation
//! - `GET /graphql/playground` - Interactive playground
//!
//! Every request gets a fresh [`LoaderRegistry`], so batches and caches
//! never cross request boundaries.

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};

use crate::graphql::{LoaderRegistry, LoaderSettings, SocialGraphSchema};
use crate::repositories::DynStore;

/// Shared state for the GraphQL handlers
#[derive(Clone)]
pub struct GraphQLState {
    pub schema: SocialGraphSchema,
    pub store: DynStore,
    pub loader_settings: LoaderSettings,
}

impl GraphQLState {
    pub fn new(
        schema: SocialGraphSchema,
        store: DynStore,
        loader_settings: LoaderSettings,
    ) -> Self {
        Self {
            schema,
            store,
            loader_settings,
        }
    }
}

/// Create the GraphQL router, to be nested under `/graphql`
pub fn graphql_router(state: GraphQLState) -> Router {
    Router::new()
        .route("/", post(graphql_handler))
        .route("/playground", get(graphql_playground))
        .with_state(state)
}

/// Execute a GraphQL request with its own loader registry
async fn graphql_handler(
    State(state): State<GraphQLState>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let loaders = LoaderRegistry::new(state.store.clone(), &state.loader_settings);
    let request = req.into_inner().data(loaders);
    state.schema.execute(request).await.into()
}

/// GraphQL Playground handler for development
async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}
