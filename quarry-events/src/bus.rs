//! In-process event bus
//!
//! The bus is an ordinary value: create one at plugin startup and hand
//! clones to whoever publishes or subscribes.

use crate::event::{DynEventHandler, Event, EventHandler, EventHandlerError, TypedEventHandler};
use dashmap::DashMap;
use std::any::{type_name, TypeId};
use std::sync::Arc;
use tracing::{debug, error, trace};

type HandlerList = Vec<Arc<dyn DynEventHandler>>;

/// How [`EventBus::publish`] runs the handlers of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    /// Every handler on its own tokio task, awaited in subscription order
    #[default]
    Concurrent,
    /// One handler after the other on the publishing task
    Sequential,
}

#[derive(Debug, Clone, Default)]
pub struct EventBusConfig {
    pub delivery: Delivery,
    /// Report the first handler failure instead of logging and moving on
    pub stop_on_error: bool,
}

/// Publish/subscribe hub keyed by event type.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<DashMap<TypeId, HandlerList>>,
    config: Arc<EventBusConfig>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            handlers: Arc::default(),
            config: Arc::new(config),
        }
    }

    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::default()
    }

    /// Subscribe a type-erased handler to events of type `E`.
    pub fn subscribe<E, H>(&self, handler: H)
    where
        E: Event,
        H: DynEventHandler + 'static,
    {
        let mut list = self.handlers.entry(TypeId::of::<E>()).or_default();
        list.push(Arc::new(handler));
        debug!(event = type_name::<E>(), handlers = list.len(), "Handler subscribed");
    }

    /// Subscribe a typed handler, wrapping it in [`TypedEventHandler`].
    pub fn listen<E, H>(&self, handler: H)
    where
        E: Event,
        H: EventHandler<E> + 'static,
    {
        self.subscribe::<E, _>(TypedEventHandler::new(handler));
    }

    /// Deliver `event` to every handler subscribed to its type.
    ///
    /// Returns once all handlers have finished. Failures are logged; with
    /// `stop_on_error` the first one ends delivery and is returned.
    pub async fn publish<E: Event>(&self, event: E) -> Result<(), EventBusError> {
        // Clone the list out of the map so handlers may subscribe while running.
        let Some(handlers) = self.handlers.get(&TypeId::of::<E>()).map(|h| h.value().clone()) else {
            trace!(event = event.event_name(), "No subscribers");
            return Ok(());
        };
        debug!(
            event = event.event_name(),
            id = %event.event_id(),
            handlers = handlers.len(),
            "Publishing event"
        );

        let event: Arc<dyn Event> = Arc::new(event);
        let failures = match self.config.delivery {
            Delivery::Concurrent => self.run_concurrent(&handlers, &event).await,
            Delivery::Sequential => self.run_sequential(&handlers, event.as_ref()).await,
        };

        if self.config.stop_on_error && !failures.is_empty() {
            return Err(EventBusError::HandlersFailed(failures));
        }
        Ok(())
    }

    async fn run_concurrent(
        &self,
        handlers: &[Arc<dyn DynEventHandler>],
        event: &Arc<dyn Event>,
    ) -> Vec<EventHandlerError> {
        let tasks: Vec<_> = handlers
            .iter()
            .cloned()
            .map(|handler| {
                let event = Arc::clone(event);
                tokio::spawn(async move { handler.handle_dyn(event.as_ref()).await })
            })
            .collect();

        let mut failures = Vec::new();
        for task in tasks {
            let outcome = task
                .await
                .unwrap_or_else(|join| Err(EventHandlerError::HandlerFailed(join.to_string())));
            if self.record(event.as_ref(), outcome, &mut failures) {
                break;
            }
        }
        failures
    }

    async fn run_sequential(
        &self,
        handlers: &[Arc<dyn DynEventHandler>],
        event: &dyn Event,
    ) -> Vec<EventHandlerError> {
        let mut failures = Vec::new();
        for handler in handlers {
            let outcome = handler.handle_dyn(event).await;
            if self.record(event, outcome, &mut failures) {
                break;
            }
        }
        failures
    }

    /// Log a failed outcome; true when delivery should stop.
    fn record(
        &self,
        event: &dyn Event,
        outcome: Result<(), EventHandlerError>,
        failures: &mut Vec<EventHandlerError>,
    ) -> bool {
        let Err(e) = outcome else {
            return false;
        };
        error!(event = event.event_name(), error = %e, "Event handler failed");
        failures.push(e);
        self.config.stop_on_error
    }

    /// Drop every handler for events of type `E`.
    pub fn unsubscribe<E: Event>(&self) {
        if let Some((_, removed)) = self.handlers.remove(&TypeId::of::<E>()) {
            debug!(event = type_name::<E>(), handlers = removed.len(), "Handlers removed");
        }
    }

    pub fn clear(&self) {
        self.handlers.clear();
    }

    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers
            .get(&TypeId::of::<E>())
            .map_or(0, |h| h.len())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("{} handler(s) failed", .0.len())]
    HandlersFailed(Vec<EventHandlerError>),
}

#[derive(Debug, Default)]
pub struct EventBusBuilder {
    config: EventBusConfig,
}

impl EventBusBuilder {
    pub fn delivery(mut self, delivery: Delivery) -> Self {
        self.config.delivery = delivery;
        self
    }

    pub fn stop_on_error(mut self, enabled: bool) -> Self {
        self.config.stop_on_error = enabled;
        self
    }

    pub fn build(self) -> EventBus {
        EventBus::with_config(self.config)
    }
}
