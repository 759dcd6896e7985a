//! Integration tests for GraphQL queries
//!
//! Every test runs against the seeded in-memory store and asserts both the
//! response and how many bulk finds the request needed.

mod common;

use common::{execute, execute_ok, seeded_graph};
use serde_json::json;

#[tokio::test]
async fn test_users_with_posts_use_one_batched_fetch() {
    let graph = seeded_graph().await;

    let data = execute_ok(graph.store.clone(), "{ users { name posts { title } } }").await;

    assert_eq!(
        data,
        json!({
            "users": [
                { "name": "Ann", "posts": [{ "title": "First" }, { "title": "Second" }] },
                { "name": "Bob", "posts": [{ "title": "Hello" }] },
                { "name": "Cat", "posts": [] },
            ]
        })
    );
    assert_eq!(graph.store.calls("find_all_users"), 1);
    assert_eq!(graph.store.calls("find_posts_by_author_ids"), 1);
}

#[tokio::test]
async fn test_profiles_and_member_types_batch_per_level() {
    let graph = seeded_graph().await;

    let data = execute_ok(
        graph.store.clone(),
        "{ users { profile { yearOfBirth memberType { id postsLimitPerMonth } } } }",
    )
    .await;

    assert_eq!(
        data["users"],
        json!([
            { "profile": { "yearOfBirth": 1990, "memberType": { "id": "BASIC", "postsLimitPerMonth": 20 } } },
            { "profile": { "yearOfBirth": 1985, "memberType": { "id": "BUSINESS", "postsLimitPerMonth": 100 } } },
            { "profile": null },
        ])
    );
    assert_eq!(graph.store.calls("find_profiles_by_user_ids"), 1);
    assert_eq!(graph.store.calls("find_member_types_by_ids"), 1);
}

#[tokio::test]
async fn test_subscription_fields_are_served_from_priming() {
    let graph = seeded_graph().await;

    let data = execute_ok(
        graph.store.clone(),
        "{ users { name userSubscribedTo { name } subscribedToUser { name } } }",
    )
    .await;

    assert_eq!(
        data["users"],
        json!([
            {
                "name": "Ann",
                "userSubscribedTo": [{ "name": "Bob" }, { "name": "Cat" }],
                "subscribedToUser": [],
            },
            {
                "name": "Bob",
                "userSubscribedTo": [{ "name": "Cat" }],
                "subscribedToUser": [{ "name": "Ann" }],
            },
            {
                "name": "Cat",
                "userSubscribedTo": [],
                "subscribedToUser": [{ "name": "Ann" }, { "name": "Bob" }],
            },
        ])
    );
    assert_eq!(graph.store.calls("find_subscriptions_touching"), 1);
    assert_eq!(graph.store.calls("find_subscriptions_by_subscriber_ids"), 0);
    assert_eq!(graph.store.calls("find_subscriptions_by_author_ids"), 0);
    assert_eq!(graph.store.calls("find_users_by_ids"), 0);
}

#[tokio::test]
async fn test_users_without_subscription_fields_skip_join_fetch() {
    let graph = seeded_graph().await;

    execute_ok(graph.store.clone(), "{ users { id name } }").await;

    assert_eq!(graph.store.calls("find_subscriptions_touching"), 0);
    assert_eq!(graph.store.total_calls(), 1);
}

#[tokio::test]
async fn test_single_user_relations_batch_without_priming() {
    let graph = seeded_graph().await;
    let query = format!(
        r#"{{ user(id: "{}") {{ name userSubscribedTo {{ name subscribedToUser {{ name }} }} }} }}"#,
        graph.ann.id
    );

    let data = execute_ok(graph.store.clone(), &query).await;

    assert_eq!(
        data["user"],
        json!({
            "name": "Ann",
            "userSubscribedTo": [
                { "name": "Bob", "subscribedToUser": [{ "name": "Ann" }] },
                { "name": "Cat", "subscribedToUser": [{ "name": "Ann" }, { "name": "Bob" }] },
            ],
        })
    );
    // One join fetch plus one user fetch per level
    assert_eq!(graph.store.calls("find_subscriptions_by_subscriber_ids"), 1);
    assert_eq!(graph.store.calls("find_subscriptions_by_author_ids"), 1);
    assert_eq!(graph.store.calls("find_users_by_ids"), 3);
}

#[tokio::test]
async fn test_repeated_keys_in_one_request_fetch_once() {
    let graph = seeded_graph().await;
    let query = format!(
        r#"{{ a: user(id: "{ann}") {{ name }} b: user(id: "{bob}") {{ name }} c: user(id: "{ann}") {{ name }} }}"#,
        ann = graph.ann.id,
        bob = graph.bob.id
    );

    let data = execute_ok(graph.store.clone(), &query).await;

    assert_eq!(
        data,
        json!({ "a": { "name": "Ann" }, "b": { "name": "Bob" }, "c": { "name": "Ann" } })
    );
    assert_eq!(graph.store.calls("find_users_by_ids"), 1);
}

#[tokio::test]
async fn test_requests_do_not_share_caches() {
    let graph = seeded_graph().await;
    let query = format!(r#"{{ user(id: "{}") {{ name }} }}"#, graph.cat.id);

    execute_ok(graph.store.clone(), &query).await;
    execute_ok(graph.store.clone(), &query).await;

    assert_eq!(graph.store.calls("find_users_by_ids"), 2);
}

#[tokio::test]
async fn test_missing_records_resolve_to_null() {
    let graph = seeded_graph().await;
    let query = format!(
        r#"{{ user(id: "{}") {{ name }} post(id: "{}") {{ title }} }}"#,
        uuid::Uuid::new_v4(),
        uuid::Uuid::new_v4()
    );

    let data = execute_ok(graph.store.clone(), &query).await;

    assert_eq!(data, json!({ "user": null, "post": null }));
}

#[tokio::test]
async fn test_failed_batch_errors_every_field_but_keeps_siblings() {
    let graph = seeded_graph().await;
    graph.store.fail_on("find_profiles_by_user_ids");

    let response = execute(graph.store.clone(), "{ users { name profile { id } } }").await;

    assert_eq!(response.errors.len(), 3);
    assert!(response
        .errors
        .iter()
        .all(|e| e.message == "An unexpected error occurred"));
    let data = response.data.into_json().unwrap();
    assert_eq!(
        data["users"],
        json!([
            { "name": "Ann", "profile": null },
            { "name": "Bob", "profile": null },
            { "name": "Cat", "profile": null },
        ])
    );
    assert_eq!(graph.store.calls("find_profiles_by_user_ids"), 1);
}

#[tokio::test]
async fn test_posts_list_primes_single_post_lookups() {
    let graph = seeded_graph().await;

    let data = execute_ok(
        graph.store.clone(),
        "{ posts { title author { name profile { isMale } } } }",
    )
    .await;

    assert_eq!(data["posts"].as_array().map(Vec::len), Some(3));
    assert_eq!(data["posts"][2]["author"]["name"], "Bob");
    assert_eq!(graph.store.calls("find_all_posts"), 1);
    assert_eq!(graph.store.calls("find_users_by_ids"), 1);
    assert_eq!(graph.store.calls("find_profiles_by_user_ids"), 1);
}

#[tokio::test]
async fn test_query_depth_is_limited() {
    let graph = seeded_graph().await;

    let response = execute(
        graph.store.clone(),
        "{ users { userSubscribedTo { userSubscribedTo { userSubscribedTo { userSubscribedTo { id } } } } } }",
    )
    .await;

    assert!(!response.errors.is_empty());
    assert_eq!(graph.store.total_calls(), 0);
}
