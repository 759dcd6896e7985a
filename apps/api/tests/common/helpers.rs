//! Helpers for running GraphQL requests against a store

use axum::Router;
use serde_json::Value;

use socialgraph_api::routes::{graphql_router, health_router, GraphQLState, HealthState};
use socialgraph_api::{build_schema, DynStore, LoaderRegistry, LoaderSettings};

/// Execute `query` the way the HTTP handler does: fresh registry per request
pub async fn execute(store: DynStore, query: &str) -> async_graphql::Response {
    let schema = build_schema(store.clone());
    let loaders = LoaderRegistry::new(store, &LoaderSettings::default());
    schema
        .execute(async_graphql::Request::new(query).data(loaders))
        .await
}

/// Execute `query` and return its data, failing on any GraphQL error
pub async fn execute_ok(store: DynStore, query: &str) -> Value {
    let response = execute(store, query).await;
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.into_json().expect("response data as json")
}

/// Router with the GraphQL and health routes over `store`
pub fn test_app(store: DynStore) -> Router {
    let schema = build_schema(store.clone());
    Router::new()
        .nest(
            "/graphql",
            graphql_router(GraphQLState::new(
                schema,
                store.clone(),
                LoaderSettings::default(),
            )),
        )
        .nest("/health", health_router(HealthState::new(store, "memory")))
}
