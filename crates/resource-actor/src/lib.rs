//! # Resource Actor
//!
//! A small **Resource-Oriented** actor: one Tokio task owns an in-memory collection of
//! records of one type and serves Create / Get / Update / List / Action requests sent
//! through a typed, cloneable client. The storefront uses it as its order store.
//!
//! ## Layers
//!
//! 1. **Record layer** ([`ActorEntity`]): validation and transitions of one record type.
//! 2. **Runtime layer** ([`ResourceActor`]): the message loop and the store.
//! 3. **Interface layer** ([`ResourceClient`], [`ActorClient`]): typed async calls.
//!
//! ## Guarantees
//!
//! - Requests to one actor are handled sequentially. There is no locking and no
//!   ordering between callers beyond arrival order.
//! - A failing hook never leaves a half-applied record behind.
//! - Reads do not mutate; a record nobody acts on stays byte-for-byte the same.
//! - Records are never removed.
//!
//! ## Context injection
//!
//! Dependencies are handed to [`ResourceActor::run`] rather than to the constructor, so
//! actors and the services that call them can be created in any order and wired last.
//!
//! ```rust,ignore
//! let (actor, client) = ResourceActor::<Order>::new(32);
//! let handle = tokio::spawn(actor.run(()));
//!
//! let id = client.create(order_create).await?;
//! let pending = client.list(OrderFilter::default()).await?;
//!
//! drop(client);          // closes the channel
//! handle.await?;         // actor logs its final size and exits
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real client's requests from scripted expectations.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
