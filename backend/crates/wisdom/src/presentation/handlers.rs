//! Handlers

use crate::presentation::protocol::{QUOTE_FAILURE_PREFIX, QUOTE_PREFIX, write_line};
use crate::presentation::router::{Handler, HandlerFuture};
use quote::QuoteRepository;
use tokio::io::AsyncWrite;

/// Word of wisdom: one random quote per solved challenge.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteHandler;

impl<R> Handler<R> for QuoteHandler
where
    R: QuoteRepository + Sync,
{
    fn name(&self) -> &'static str {
        "quote"
    }

    fn call<'a>(
        &'a self,
        conn: &'a mut (dyn AsyncWrite + Unpin + Send),
        repo: &'a R,
    ) -> HandlerFuture<'a> {
        Box::pin(async move {
            let line = match repo.random_quote().await {
                Ok(quote) => format!("{QUOTE_PREFIX}{quote}\n"),
                Err(err) => {
                    tracing::warn!(error = %err, kind = %err.kind(), "Quote provider failed");
                    format!("{QUOTE_FAILURE_PREFIX}{err}\n")
                }
            };
            write_line(conn, &line).await
        })
    }
}
