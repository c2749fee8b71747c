//! Event and handler traits

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;
use std::marker::PhantomData;
use uuid::Uuid;

/// Anything that can travel over the [`EventBus`](crate::EventBus).
pub trait Event: Send + Sync + Debug + 'static {
    fn event_name(&self) -> &str;

    fn event_id(&self) -> Uuid;

    fn timestamp(&self) -> DateTime<Utc>;

    /// Downcasting hook for typed handlers
    fn as_any(&self) -> &dyn Any;
}

/// Identity and timing shared by all events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub id: Uuid,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    /// Groups events that belong to one player session or request
    pub correlation_id: Option<Uuid>,
}

impl EventMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            timestamp: Utc::now(),
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }
}

/// Handler for one event type.
#[async_trait]
pub trait EventHandler<E: Event>: Send + Sync {
    async fn handle(&self, event: &E) -> Result<(), EventHandlerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EventHandlerError {
    #[error("Handler failed: {0}")]
    HandlerFailed(String),

    #[error("Event processing error: {0}")]
    ProcessingError(String),
}

/// Type-erased handler stored by the bus.
#[async_trait]
pub trait DynEventHandler: Send + Sync {
    async fn handle_dyn(&self, event: &dyn Event) -> Result<(), EventHandlerError>;
}

/// Adapts an [`EventHandler<E>`] to [`DynEventHandler`].
pub struct TypedEventHandler<E: Event, H: EventHandler<E>> {
    handler: H,
    _event: PhantomData<fn(E)>,
}

impl<E: Event, H: EventHandler<E>> TypedEventHandler<E, H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _event: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Event, H: EventHandler<E> + 'static> DynEventHandler for TypedEventHandler<E, H> {
    async fn handle_dyn(&self, event: &dyn Event) -> Result<(), EventHandlerError> {
        match event.as_any().downcast_ref::<E>() {
            Some(typed) => self.handler.handle(typed).await,
            None => Err(EventHandlerError::HandlerFailed(format!(
                "type mismatch for event {}",
                event.event_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping(EventMetadata);

    impl Event for Ping {
        fn event_name(&self) -> &str {
            &self.0.name
        }

        fn event_id(&self) -> Uuid {
            self.0.id
        }

        fn timestamp(&self) -> DateTime<Utc> {
            self.0.timestamp
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Pong(EventMetadata);

    impl Event for Pong {
        fn event_name(&self) -> &str {
            &self.0.name
        }

        fn event_id(&self) -> Uuid {
            self.0.id
        }

        fn timestamp(&self) -> DateTime<Utc> {
            self.0.timestamp
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Accept;

    #[async_trait]
    impl EventHandler<Ping> for Accept {
        async fn handle(&self, _event: &Ping) -> Result<(), EventHandlerError> {
            Ok(())
        }
    }

    #[test]
    fn test_metadata() {
        let correlation = Uuid::new_v4();
        let metadata = EventMetadata::new("ping").with_correlation_id(correlation);
        assert_eq!(metadata.name, "ping");
        assert_eq!(metadata.correlation_id, Some(correlation));
    }

    #[test]
    fn test_typed_handler_rejects_other_events() {
        let handler = TypedEventHandler::new(Accept);
        tokio_test::block_on(async {
            assert!(handler.handle_dyn(&Ping(EventMetadata::new("ping"))).await.is_ok());
            assert!(matches!(
                handler.handle_dyn(&Pong(EventMetadata::new("pong"))).await,
                Err(EventHandlerError::HandlerFailed(_))
            ));
        });
    }
}
