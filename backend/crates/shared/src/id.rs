//! Correlation IDs
//!
//! Every accepted connection (server) and every started request (client) gets
//! a random ID that is attached to its tracing span, so all lines logged for
//! one exchange can be grouped. IDs are never sent over the wire.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

/// What an [`Id`] correlates. The label prefixes the `Debug` output.
pub trait Scope {
    const LABEL: &'static str;
}

/// Random (UUID v4) ID scoped to one kind of exchange.
///
/// ```
/// use kernel::id::ConnectionId;
/// let conn_id = ConnectionId::new();
/// assert_eq!(conn_id.to_string().len(), 36);
/// ```
pub struct Id<S> {
    value: Uuid,
    _scope: PhantomData<fn() -> S>,
}

impl<S: Scope> Id<S> {
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4(),
            _scope: PhantomData,
        }
    }
}

impl<S: Scope> Default for Id<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for Id<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Id<S> {}

impl<S> PartialEq for Id<S> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<S> Eq for Id<S> {}

impl<S> Hash for Id<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<S: Scope> fmt::Debug for Id<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", S::LABEL, self.value)
    }
}

/// Hyphenated UUID, the form used in span fields.
impl<S> fmt::Display for Id<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

pub mod scopes {
    use super::Scope;

    /// One accepted TCP connection on the server.
    pub struct Connection;

    impl Scope for Connection {
        const LABEL: &'static str = "ConnectionId";
    }

    /// One challenge-solve-response exchange started by the client.
    pub struct Request;

    impl Scope for Request {
        const LABEL: &'static str = "RequestId";
    }
}

pub type ConnectionId = Id<scopes::Connection>;
pub type RequestId = Id<scopes::Request>;
