//! Database models and types for socialgraph
//!
//! This module contains SQLx models for:
//! - Users and their balances
//! - Profiles and member tiers
//! - Posts
//! - Subscriptions between users (many-to-many join rows)

pub mod member_type;
pub mod post;
pub mod profile;
pub mod subscription;
pub mod user;

pub use member_type::{MemberType, MemberTypeId};
pub use post::{CreatePost, Post, UpdatePost};
pub use profile::{CreateProfile, Profile, UpdateProfile};
pub use subscription::Subscription;
pub use user::{CreateUser, UpdateUser, User};
