use std::os::unix::io::RawFd;

bitflags::bitflags! {
    /// Readiness interest/events, analogous to `poll(2)`'s `POLLIN`/`POLLOUT`.
    ///
    /// The engine only ever registers [`Interest::WRITABLE`] (write-readiness
    /// is how a non-blocking `connect()` reports completion), but the type is
    /// general so a single `Poller` implementation can multiplex other
    /// subsystems' fds as well.
    #[derive(Copy, Clone, Debug, Default)]
    pub struct Interest: u32 {
        const READABLE = 0b01;
        const WRITABLE = 0b10;
    }
}

/// A token identifying either a watched file descriptor or an armed timer.
///
/// The embedder's poller is free to implement timers however it likes (a
/// `timerfd`, an internal heap, ...) as long as the handle it returns from
/// [`Poller::add_timeout`] is distinct from any live path fd for the lifetime
/// of the query; `dispatch` tells the two apart only by comparing tokens.
pub type Token = RawFd;

/// The narrow adapter surface the engine needs from the embedding event loop.
///
/// The engine does not own an event loop of its own (spec §5: "The engine
/// owns no thread; it runs entirely inside the embedding event loop's
/// callbacks"). This trait is the entire contract: register/unregister
/// interest in a fd, and schedule/cancel a one-shot timer. The embedder is
/// responsible for calling [`crate::engine::Engine::dispatch`] when a watched
/// fd becomes ready or a timer fires.
pub trait Poller {
    /// Register or update interest in `fd`. `Interest::empty()` means
    /// "unregister".
    fn watch_fd(&mut self, fd: RawFd, interest: Interest);

    /// Schedule a one-shot timer `sec` seconds and `nsec` nanoseconds from
    /// now, returning a handle that will later be passed to `dispatch`.
    fn add_timeout(&mut self, sec: i64, nsec: i64) -> Token;

    /// Cancel a timer previously returned by `add_timeout`. A no-op if the
    /// timer has already fired or was already removed.
    fn remove_timeout(&mut self, token: Token);
}
