use std::os::fd::OwnedFd;

/// The embedder-supplied capability object the engine reports outcomes through.
///
/// The original C source passed a `void *user_data` alongside raw function
/// pointers; here the embedder simply implements this trait on whatever type
/// already holds the state it needs (a query object, a channel, ...), which
/// plays the role of a typed closure without the `void *` indirection.
///
/// `fd` ownership transfers to the callback in both methods: once either
/// returns, the engine will not touch that descriptor again.
pub trait ConnectCallbacks {
    /// Invoked exactly once per query, when a path's attempt reaches
    /// `Finished` and wins the race (see
    /// [`Engine::dispatch`](crate::engine::Engine::dispatch)).
    fn on_connect(&mut self, path_index: usize, fd: OwnedFd);

    /// Invoked once per successful [`bind_path`](crate::bind::bind_path) call.
    fn on_bind(&mut self, path_index: usize, fd: OwnedFd);
}
