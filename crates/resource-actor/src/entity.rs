//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract a record type (an order, for the storefront)
//! implements to be owned by a [`ResourceActor`](crate::ResourceActor). It names the id,
//! the DTOs for creation and update, the record-specific actions, the list filter, the
//! injected context and the error type, and provides the lifecycle hooks the actor calls.
//!
//! # Records are never deleted
//! The store is append-and-mutate only. A record can be created, read, listed, edited
//! through `on_update` and transitioned through `handle_action`, but there is no removal
//! hook. Business records such as orders are kept forever and moved into a terminal
//! state instead.
//!
//! # Hooks and atomicity
//! The actor calls `on_update` and `handle_action` on a *copy* of the stored record and
//! only writes the copy back when the hook returns `Ok`. A hook may therefore mutate
//! `self` freely before discovering an error; the stored record stays untouched.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// Trait that any record type must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// Hooks are `async` so they can call out to other actors or services. The `Context`
/// associated type is handed to every hook; it is bound late, when the actor is started
/// with [`ResourceActor::run`](crate::ResourceActor::run), not when it is constructed.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this record.
    /// Must be convertible from u32 for automatic id generation and ordered so that
    /// listings come back in creation order.
    type Id: Ord + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new record.
    type Create: Send + Sync + Debug;

    /// The data required to edit an existing record.
    type Update: Send + Sync + Debug;

    /// Record-specific operations (e.g. recording a shipment on an order).
    type Action: Send + Sync + Debug;

    /// The result type returned by actions.
    type ActionResult: Send + Sync + Debug;

    /// Criteria accepted by `List` requests.
    type Filter: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// One error enum per record type; the framework boxes it into
    /// [`FrameworkError::EntityError`](crate::FrameworkError::EntityError).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the record from the freshly assigned id and the creation payload.
    /// Validation of the payload belongs here.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction and before the record is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply an edit.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Handle a record-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Whether this record is part of a `List` response for `filter`.
    fn matches(&self, filter: &Self::Filter) -> bool;
}
