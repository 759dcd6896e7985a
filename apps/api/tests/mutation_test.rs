//! Integration tests for GraphQL mutations

mod common;

use common::{execute, execute_ok, seeded_graph};
use serde_json::json;
use socialgraph_api::SocialStore;

#[tokio::test]
async fn test_create_change_and_delete_user() {
    let graph = seeded_graph().await;

    let data = execute_ok(
        graph.store.clone(),
        r#"mutation { createUser(dto: { name: "Dan", balance: 12.5 }) { id name balance posts { id } } }"#,
    )
    .await;
    let created = &data["createUser"];
    assert_eq!(created["name"], "Dan");
    assert_eq!(created["posts"], json!([]));
    // The new user's relations come from the primed loaders
    assert_eq!(graph.store.calls("find_posts_by_author_ids"), 0);

    let id = created["id"].as_str().unwrap().to_string();
    let changed = execute_ok(
        graph.store.clone(),
        &format!(r#"mutation {{ changeUser(id: "{id}", dto: {{ balance: 20 }}) {{ name balance }} }}"#),
    )
    .await;
    assert_eq!(changed["changeUser"], json!({ "name": "Dan", "balance": 20.0 }));

    let deleted = execute_ok(
        graph.store.clone(),
        &format!(r#"mutation {{ deleteUser(id: "{id}") }}"#),
    )
    .await;
    assert_eq!(deleted["deleteUser"], "User deleted successfully");
    assert_eq!(graph.store.find_all_users().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_change_missing_user_is_not_found() {
    let graph = seeded_graph().await;
    let id = uuid::Uuid::new_v4();

    let response = execute(
        graph.store.clone(),
        &format!(r#"mutation {{ changeUser(id: "{id}", dto: {{ name: "Zed" }}) {{ id }} }}"#),
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, format!("user not found: {id}"));
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let graph = seeded_graph().await;

    let response = execute(
        graph.store.clone(),
        r#"mutation { createUser(dto: { name: "  ", balance: 0 }) { id } }"#,
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("name must not be empty"));
    assert_eq!(graph.store.find_all_users().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_delete_user_cascades_to_posts_and_subscriptions() {
    let graph = seeded_graph().await;

    execute_ok(
        graph.store.clone(),
        &format!(r#"mutation {{ deleteUser(id: "{}") }}"#, graph.ann.id),
    )
    .await;

    let data = execute_ok(
        graph.store.clone(),
        "{ posts { title } users { name subscribedToUser { name } } }",
    )
    .await;
    assert_eq!(data["posts"], json!([{ "title": "Hello" }]));
    assert_eq!(
        data["users"],
        json!([
            { "name": "Bob", "subscribedToUser": [] },
            { "name": "Cat", "subscribedToUser": [{ "name": "Bob" }] },
        ])
    );
}

#[tokio::test]
async fn test_post_lifecycle() {
    let graph = seeded_graph().await;

    let data = execute_ok(
        graph.store.clone(),
        &format!(
            r#"mutation {{ createPost(dto: {{ authorId: "{}", title: "Fresh", content: "news" }}) {{ id author {{ name }} }} }}"#,
            graph.cat.id
        ),
    )
    .await;
    assert_eq!(data["createPost"]["author"]["name"], "Cat");
    let id = data["createPost"]["id"].as_str().unwrap().to_string();

    let data = execute_ok(
        graph.store.clone(),
        &format!(r#"mutation {{ changePost(id: "{id}", dto: {{ title: "Stale" }}) {{ title content }} }}"#),
    )
    .await;
    assert_eq!(data["changePost"], json!({ "title": "Stale", "content": "news" }));

    let data = execute_ok(
        graph.store.clone(),
        &format!(r#"mutation {{ deletePost(id: "{id}") }}"#),
    )
    .await;
    assert_eq!(data["deletePost"], "Post deleted successfully");
}

#[tokio::test]
async fn test_create_post_for_unknown_author_is_not_found() {
    let graph = seeded_graph().await;
    let author = uuid::Uuid::new_v4();

    let response = execute(
        graph.store.clone(),
        &format!(
            r#"mutation {{ createPost(dto: {{ authorId: "{author}", title: "t", content: "c" }}) {{ id }} }}"#
        ),
    )
    .await;

    assert_eq!(response.errors[0].message, format!("user not found: {author}"));
    assert_eq!(graph.store.find_all_posts().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_profile_lifecycle() {
    let graph = seeded_graph().await;

    let data = execute_ok(
        graph.store.clone(),
        &format!(
            r#"mutation {{ createProfile(dto: {{ userId: "{}", isMale: true, yearOfBirth: 2001, memberTypeId: BUSINESS }}) {{ id memberType {{ discount }} user {{ name }} }} }}"#,
            graph.cat.id
        ),
    )
    .await;
    assert_eq!(data["createProfile"]["memberType"]["discount"], 7.7);
    assert_eq!(data["createProfile"]["user"]["name"], "Cat");
    let id = data["createProfile"]["id"].as_str().unwrap().to_string();

    let data = execute_ok(
        graph.store.clone(),
        &format!(
            r#"mutation {{ changeProfile(id: "{id}", dto: {{ memberTypeId: BASIC }}) {{ memberTypeId yearOfBirth }} }}"#
        ),
    )
    .await;
    assert_eq!(
        data["changeProfile"],
        json!({ "memberTypeId": "BASIC", "yearOfBirth": 2001 })
    );

    let data = execute_ok(
        graph.store.clone(),
        &format!(r#"mutation {{ deleteProfile(id: "{id}") }}"#),
    )
    .await;
    assert_eq!(data["deleteProfile"], "Profile deleted successfully");
}

#[tokio::test]
async fn test_second_profile_for_user_conflicts() {
    let graph = seeded_graph().await;

    let response = execute(
        graph.store.clone(),
        &format!(
            r#"mutation {{ createProfile(dto: {{ userId: "{}", isMale: false, yearOfBirth: 1999, memberTypeId: BASIC }}) {{ id }} }}"#,
            graph.ann.id
        ),
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("already exists"));
}

#[tokio::test]
async fn test_subscribe_and_unsubscribe() {
    let graph = seeded_graph().await;
    let (cat, ann) = (graph.cat.id, graph.ann.id);

    let data = execute_ok(
        graph.store.clone(),
        &format!(r#"mutation {{ subscribeTo(userId: "{cat}", authorId: "{ann}") {{ name }} }}"#),
    )
    .await;
    assert_eq!(data["subscribeTo"], json!({ "name": "Cat" }));

    let response = execute(
        graph.store.clone(),
        &format!(r#"mutation {{ subscribeTo(userId: "{cat}", authorId: "{ann}") {{ name }} }}"#),
    )
    .await;
    assert!(response.errors[0].message.contains("already exists"));

    let unsubscribe = format!(r#"mutation {{ unsubscribeFrom(userId: "{cat}", authorId: "{ann}") }}"#);
    let data = execute_ok(graph.store.clone(), &unsubscribe).await;
    assert_eq!(data["unsubscribeFrom"], true);
    let data = execute_ok(graph.store.clone(), &unsubscribe).await;
    assert_eq!(data["unsubscribeFrom"], false);
}

#[tokio::test]
async fn test_subscription_lists_follow_writes_in_one_document() {
    let graph = seeded_graph().await;
    let (cat, ann) = (graph.cat.id, graph.ann.id);

    let data = execute_ok(
        graph.store.clone(),
        &format!(
            r#"mutation {{
                before: changeUser(id: "{cat}", dto: {{}}) {{ userSubscribedTo {{ name }} }}
                a: subscribeTo(userId: "{cat}", authorId: "{ann}") {{
                    userSubscribedTo {{ name subscribedToUser {{ name }} }}
                }}
                b: unsubscribeFrom(userId: "{cat}", authorId: "{ann}")
                c: createPost(dto: {{ authorId: "{ann}", title: "t", content: "c" }}) {{
                    author {{ subscribedToUser {{ name }} }}
                }}
                d: changeUser(id: "{cat}", dto: {{ name: "Cat2" }}) {{ name userSubscribedTo {{ name }} }}
            }}"#
        ),
    )
    .await;

    assert_eq!(data["before"]["userSubscribedTo"], json!([]));
    assert_eq!(
        data["a"]["userSubscribedTo"],
        json!([{ "name": "Ann", "subscribedToUser": [{ "name": "Cat" }] }])
    );
    assert_eq!(data["b"], true);
    assert_eq!(data["c"]["author"]["subscribedToUser"], json!([]));
    assert_eq!(data["d"], json!({ "name": "Cat2", "userSubscribedTo": [] }));
}

#[tokio::test]
async fn test_posts_by_author_follow_post_writes_in_one_document() {
    let graph = seeded_graph().await;
    let ann = graph.ann.id;

    let data = execute_ok(
        graph.store.clone(),
        &format!(
            r#"mutation {{
                before: changeUser(id: "{ann}", dto: {{}}) {{ posts {{ id title }} }}
                created: createPost(dto: {{ authorId: "{ann}", title: "Third", content: "c" }}) {{
                    author {{ posts {{ title }} }}
                }}
            }}"#
        ),
    )
    .await;

    assert_eq!(data["before"]["posts"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        data["created"]["author"]["posts"],
        json!([{ "title": "First" }, { "title": "Second" }, { "title": "Third" }])
    );

    let first = data["before"]["posts"][0]["id"].as_str().unwrap().to_string();
    let data = execute_ok(
        graph.store.clone(),
        &format!(
            r#"mutation {{
                before: changeUser(id: "{ann}", dto: {{}}) {{ posts {{ title }} }}
                deleted: deletePost(id: "{first}")
                after: changeUser(id: "{ann}", dto: {{}}) {{ posts {{ title }} }}
            }}"#
        ),
    )
    .await;

    assert_eq!(data["before"]["posts"].as_array().map(Vec::len), Some(3));
    assert_eq!(data["deleted"], "Post deleted successfully");
    assert_eq!(
        data["after"]["posts"],
        json!([{ "title": "Second" }, { "title": "Third" }])
    );
}

#[tokio::test]
async fn test_deleted_user_leaves_cached_subscriber_lists() {
    let graph = seeded_graph().await;
    let (ann, bob) = (graph.ann.id, graph.bob.id);

    let data = execute_ok(
        graph.store.clone(),
        &format!(
            r#"mutation {{
                a: changeUser(id: "{bob}", dto: {{}}) {{ subscribedToUser {{ name }} }}
                b: deleteUser(id: "{ann}")
                c: createPost(dto: {{ authorId: "{bob}", title: "t", content: "c" }}) {{
                    author {{ subscribedToUser {{ name }} }}
                }}
            }}"#
        ),
    )
    .await;

    assert_eq!(data["a"]["subscribedToUser"], json!([{ "name": "Ann" }]));
    assert_eq!(data["c"]["author"]["subscribedToUser"], json!([]));
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let graph = seeded_graph().await;
    let id = uuid::Uuid::new_v4();

    let response = execute(
        graph.store.clone(),
        &format!(r#"mutation {{ deletePost(id: "{id}") }}"#),
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, format!("post not found: {id}"));
}
