//! Test fixtures: a small social graph in a [`MemoryStore`]
//!
//! - Ann (BASIC profile) wrote two posts and follows Bob and Cat
//! - Bob (BUSINESS profile) wrote one post and follows Cat
//! - Cat has no profile, no posts and follows nobody

use std::sync::Arc;

use socialgraph_api::models::{
    CreatePost, CreateProfile, CreateUser, MemberTypeId, Subscription, User,
};
use socialgraph_api::{MemoryStore, SocialStore};

/// Seeded store plus the users it holds
pub struct SeededGraph {
    pub store: Arc<MemoryStore>,
    pub ann: User,
    pub bob: User,
    pub cat: User,
}

async fn user(store: &MemoryStore, name: &str, balance: f64) -> User {
    store
        .create_user(CreateUser {
            name: name.to_string(),
            balance,
        })
        .await
        .expect("create user")
}

async fn post(store: &MemoryStore, author: &User, title: &str) {
    store
        .create_post(CreatePost {
            author_id: author.id,
            title: title.to_string(),
            content: format!("{} by {}", title, author.name),
        })
        .await
        .expect("create post");
}

async fn profile(store: &MemoryStore, owner: &User, year_of_birth: i32, tier: MemberTypeId) {
    store
        .create_profile(CreateProfile {
            user_id: owner.id,
            is_male: false,
            year_of_birth,
            member_type_id: tier,
        })
        .await
        .expect("create profile");
}

async fn follow(store: &MemoryStore, subscriber: &User, author: &User) {
    store
        .create_subscription(Subscription::new(subscriber.id, author.id))
        .await
        .expect("create subscription");
}

/// Build the fixture graph; the store's call counters start at zero
pub async fn seeded_graph() -> SeededGraph {
    let store = Arc::new(MemoryStore::new());

    let ann = user(&store, "Ann", 100.0).await;
    let bob = user(&store, "Bob", 50.0).await;
    let cat = user(&store, "Cat", 0.0).await;

    profile(&store, &ann, 1990, MemberTypeId::Basic).await;
    profile(&store, &bob, 1985, MemberTypeId::Business).await;

    post(&store, &ann, "First").await;
    post(&store, &ann, "Second").await;
    post(&store, &bob, "Hello").await;

    follow(&store, &ann, &bob).await;
    follow(&store, &ann, &cat).await;
    follow(&store, &bob, &cat).await;

    store.reset_calls();
    SeededGraph {
        store,
        ann,
        bob,
        cat,
    }
}
