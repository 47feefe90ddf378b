use async_trait::async_trait;
use resource_actor::{ActorEntity, FrameworkError, ResourceActor};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Ticket {
    id: u32,
    title: String,
    closed: bool,
    edits: u32,
}

#[derive(Debug)]
struct TicketCreate {
    title: String,
}

#[derive(Debug)]
struct TicketUpdate {
    title: Option<String>,
}

#[derive(Debug)]
enum TicketAction {
    Close,
}

#[derive(Debug, Default)]
struct TicketFilter {
    closed: Option<bool>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum TicketError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("ticket already closed")]
    AlreadyClosed,
}

#[async_trait]
impl ActorEntity for Ticket {
    type Id = u32;
    type Create = TicketCreate;
    type Update = TicketUpdate;
    type Action = TicketAction;
    type ActionResult = bool;
    type Filter = TicketFilter;
    type Context = ();
    type Error = TicketError;

    fn from_create_params(id: u32, params: TicketCreate) -> Result<Self, Self::Error> {
        if params.title.is_empty() {
            return Err(TicketError::EmptyTitle);
        }
        Ok(Self {
            id,
            title: params.title,
            closed: false,
            edits: 0,
        })
    }

    async fn on_update(&mut self, update: TicketUpdate, _ctx: &()) -> Result<(), Self::Error> {
        self.edits += 1;
        if let Some(title) = update.title {
            if title.is_empty() {
                return Err(TicketError::EmptyTitle);
            }
            self.title = title;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: TicketAction, _ctx: &()) -> Result<bool, Self::Error> {
        match action {
            TicketAction::Close => {
                if self.closed {
                    return Err(TicketError::AlreadyClosed);
                }
                self.closed = true;
                Ok(true)
            }
        }
    }

    fn matches(&self, filter: &TicketFilter) -> bool {
        filter.closed.map_or(true, |closed| closed == self.closed)
    }
}

fn create(title: &str) -> TicketCreate {
    TicketCreate {
        title: title.to_string(),
    }
}

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Ticket>::new(10);
    let handle = tokio::spawn(actor.run(()));

    let first: u32 = client.create(create("Broken seal")).await.unwrap();
    let second: u32 = client.create(create("Late parcel")).await.unwrap();
    assert_eq!((first, second), (1, 2));

    let closed = client.perform_action(first, TicketAction::Close).await.unwrap();
    assert!(closed);

    let updated = client
        .update(
            second,
            TicketUpdate {
                title: Some("Very late parcel".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Very late parcel");

    let open = client
        .list(TicketFilter {
            closed: Some(false),
        })
        .await
        .unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, second);

    let all = client.list(TicketFilter::default()).await.unwrap();
    assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_failed_create_does_not_consume_an_id() {
    let (actor, client) = ResourceActor::<Ticket>::new(10);
    tokio::spawn(actor.run(()));

    let err = client.create(create("")).await.unwrap_err();
    assert_eq!(
        err.entity_error::<TicketError>(),
        Some(&TicketError::EmptyTitle)
    );

    let id = client.create(create("Dented jar")).await.unwrap();
    assert_eq!(id, 1);
    assert_eq!(client.list(TicketFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_hooks_leave_the_record_untouched() {
    let (actor, client) = ResourceActor::<Ticket>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(create("Leaking lid")).await.unwrap();
    let before = client.get(id).await.unwrap().unwrap();

    // on_update bumps `edits` before it rejects the empty title
    let err = client
        .update(
            id,
            TicketUpdate {
                title: Some(String::new()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::EntityError(_)));
    assert_eq!(client.get(id).await.unwrap().unwrap(), before);

    client.perform_action(id, TicketAction::Close).await.unwrap();
    let err = client
        .perform_action(id, TicketAction::Close)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "ticket already closed");
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let (actor, client) = ResourceActor::<Ticket>::new(10);
    tokio::spawn(actor.run(()));

    assert!(client.get(42).await.unwrap().is_none());
    let err = client
        .perform_action(42, TicketAction::Close)
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::NotFound(ref id) if id == "42"));
    let err = client
        .update(42, TicketUpdate { title: None })
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::NotFound(_)));
}

#[tokio::test]
async fn test_reads_are_idempotent() {
    let (actor, client) = ResourceActor::<Ticket>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(create("Idle")).await.unwrap();
    let first = client.get(id).await.unwrap();
    for _ in 0..5 {
        assert_eq!(client.get(id).await.unwrap(), first);
        client.list(TicketFilter::default()).await.unwrap();
    }
}

#[tokio::test]
async fn test_closed_actor_reports_actor_closed() {
    let (actor, client) = ResourceActor::<Ticket>::new(1);
    drop(actor);

    let err = client.get(1).await.unwrap_err();
    assert!(matches!(err, FrameworkError::ActorClosed));
}
