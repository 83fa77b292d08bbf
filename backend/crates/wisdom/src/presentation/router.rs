//! Handler Registry
//!
//! Maps one-byte handler ids to the capability served after a valid
//! proof of work. Built once at startup and shared read-only by every worker.

use crate::presentation::handlers::QuoteHandler;
use crate::presentation::protocol::HandlerId;
use futures::future::BoxFuture;
use quote::QuoteRepository;
use std::collections::HashMap;
use std::io;
use tokio::io::AsyncWrite;

pub type HandlerFuture<'a> = BoxFuture<'a, io::Result<()>>;

/// A capability reachable after the proof of work has been accepted.
///
/// Handlers write exactly one newline-terminated line to `conn`. Closing the
/// connection is left to the caller.
pub trait Handler<R>: Send + Sync {
    fn name(&self) -> &'static str;

    fn call<'a>(
        &'a self,
        conn: &'a mut (dyn AsyncWrite + Unpin + Send),
        repo: &'a R,
    ) -> HandlerFuture<'a>;
}

/// Immutable id → handler table.
pub struct HandlerRegistry<R> {
    routes: HashMap<HandlerId, Box<dyn Handler<R>>>,
}

impl<R> HandlerRegistry<R> {
    pub fn builder() -> HandlerRegistryBuilder<R> {
        HandlerRegistryBuilder {
            routes: HashMap::new(),
        }
    }

    pub fn get(&self, id: HandlerId) -> Option<&dyn Handler<R>> {
        self.routes.get(&id).map(|handler| handler.as_ref())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<R> HandlerRegistry<R>
where
    R: QuoteRepository + Sync + 'static,
{
    /// `0x01` → quote
    pub fn with_default_routes() -> Self {
        Self::builder().route(HandlerId::QUOTE, QuoteHandler).build()
    }
}

impl<R> std::fmt::Debug for HandlerRegistry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routes: Vec<_> = self
            .routes
            .iter()
            .map(|(id, handler)| (id.value(), handler.name()))
            .collect();
        routes.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("routes", &routes)
            .finish()
    }
}

pub struct HandlerRegistryBuilder<R> {
    routes: HashMap<HandlerId, Box<dyn Handler<R>>>,
}

impl<R> HandlerRegistryBuilder<R> {
    /// Register `handler` under `id`, replacing any earlier registration.
    pub fn route(mut self, id: HandlerId, handler: impl Handler<R> + 'static) -> Self {
        if let Some(previous) = self.routes.insert(id, Box::new(handler)) {
            tracing::debug!(handler_id = %id, replaced = previous.name(), "Handler replaced");
        }
        self
    }

    pub fn build(self) -> HandlerRegistry<R> {
        HandlerRegistry {
            routes: self.routes,
        }
    }
}
