//! Per-request and application-wide values threaded through the chain.
//!
//! Neither type is inspected by routing or chain building. They exist so
//! middleware and handlers can hand each other data without globals: an auth
//! middleware inserts the current user into the [`Context`], a handler reads
//! its database pool from [`Services`].

use std::sync::Arc;

use http::Extensions;

/// Per-request scratch space. Created empty for every request and passed by
/// value down the chain.
#[derive(Debug, Default)]
pub struct Context {
    extensions: Extensions,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, returning the previous value of the same type.
    pub fn insert<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.extensions.insert(value)
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get()
    }

    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.extensions.get_mut()
    }

    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions.remove()
    }
}

/// Application-wide, read-only values shared by every request.
///
/// Cloning is one atomic increment. Build it once at startup:
///
/// ```rust
/// use switchyard::Services;
///
/// #[derive(Clone)]
/// struct Greeting(&'static str);
///
/// let services = Services::new().with(Greeting("hello"));
/// assert_eq!(services.get::<Greeting>().map(|g| g.0), Some("hello"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Services {
    inner: Arc<Extensions>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value`, replacing any previous value of the same type.
    pub fn with<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        Arc::make_mut(&mut self.inner).insert(value);
        self
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.inner.get()
    }
}
