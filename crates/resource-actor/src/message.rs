//! # Generic Messages
//!
//! The request type exchanged between a [`ResourceClient`](crate::ResourceClient) and its
//! [`ResourceActor`](crate::ResourceActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants cover the lifecycle of a stored record:
///
/// - **Create**: uses [`ActorEntity::Create`] to build a new record.
/// - **Get**: fetches the current state of one record by id.
/// - **Update**: applies an [`ActorEntity::Update`] edit.
/// - **List**: returns every record accepted by an [`ActorEntity::Filter`].
/// - **Action**: runs an [`ActorEntity::Action`] transition.
///
/// There is no delete request. Records are only ever transitioned.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    List {
        filter: T::Filter,
        respond_to: Response<Vec<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
