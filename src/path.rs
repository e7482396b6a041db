use std::net::IpAddr;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

use nix::sys::socket::{SockProtocol, SockType};

/// Address family of a [`Path`]: IPv4 or IPv6 only. Kept narrow on purpose
/// rather than reusing `nix::sys::socket::AddressFamily`, which admits
/// families (Unix, Netlink, ...) the race controller has no opinion about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Inet,
    Inet6,
}

/// Per-path attempt state.
///
/// Declaration order matters: the winner scan in `connect_check` and the
/// grace timer's collapse both rely on `Init < Waiting < Finished < Failed`,
/// which is exactly what derived `Ord` gives us for free from this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum AttemptState {
    #[default]
    Init,
    Waiting,
    Finished,
    Failed,
}

#[derive(Debug, Default)]
struct Attempt {
    state: AttemptState,
    fd: Option<OwnedFd>,
}

/// A single ranked endpoint: an immutable descriptor plus its mutable attempt
/// state.
///
/// `priority`, `weight` and `ttl` are ranking metadata consumed by the
/// upstream sorter that produced this path list; the connect engine never
/// reads them and only carries them for the embedder's convenience.
#[derive(Debug)]
pub struct Path {
    pub family: Family,
    pub addr: IpAddr,
    pub ifindex: Option<u32>,
    pub socktype: SockType,
    pub protocol: Option<SockProtocol>,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
    pub ttl: u32,
    attempt: Attempt,
}

impl Path {
    pub fn new(
        family: Family,
        addr: IpAddr,
        ifindex: Option<u32>,
        socktype: SockType,
        protocol: Option<SockProtocol>,
        port: u16,
    ) -> Self {
        Path {
            family,
            addr,
            ifindex,
            socktype,
            protocol,
            port,
            priority: 0,
            weight: 0,
            ttl: 0,
            attempt: Attempt::default(),
        }
    }

    pub fn state(&self) -> AttemptState {
        self.attempt.state
    }

    /// The fd currently owned by this path, if any, without giving up
    /// ownership. Used by the dispatcher to match an incoming token and by
    /// cleanup to unregister before closing.
    pub fn fd_raw(&self) -> Option<RawFd> {
        self.attempt.fd.as_ref().map(AsRawFd::as_raw_fd)
    }

    /// `Init -> Waiting`: the attempt's socket is non-blocking-connecting.
    pub(crate) fn begin_waiting(&mut self, fd: OwnedFd) {
        debug_assert_eq!(self.attempt.state, AttemptState::Init);
        self.attempt.fd = Some(fd);
        self.attempt.state = AttemptState::Waiting;
    }

    /// `Init -> Finished`: `connect()` succeeded synchronously. Rare in
    /// practice for a non-blocking socket, but legal.
    pub(crate) fn finish_immediately(&mut self, fd: OwnedFd) {
        debug_assert_eq!(self.attempt.state, AttemptState::Init);
        self.attempt.fd = Some(fd);
        self.attempt.state = AttemptState::Finished;
    }

    /// `Waiting -> Finished`: write-readiness observed a zero `SO_ERROR`.
    pub(crate) fn finish_from_waiting(&mut self) {
        debug_assert_eq!(self.attempt.state, AttemptState::Waiting);
        self.attempt.state = AttemptState::Finished;
    }

    /// `Init -> Failed`: the launch syscalls never produced an fd to close
    /// (resolver miss, or `socket()`/`connect()` failed before or without
    /// leaving an open descriptor).
    pub(crate) fn fail_without_fd(&mut self) {
        debug_assert!(self.attempt.fd.is_none());
        self.attempt.state = AttemptState::Failed;
    }

    /// `Waiting -> Failed`: closes the owned fd (drop) and marks failed.
    /// Used both for a non-zero `SO_ERROR` and for the grace timer forcing a
    /// still-pending attempt to give up.
    pub(crate) fn fail_and_close(&mut self) {
        self.attempt.fd = None; // drop closes it
        self.attempt.state = AttemptState::Failed;
    }

    /// `Finished -> Init`: hand the fd to the caller. After this the engine
    /// no longer owns it.
    pub(crate) fn take_fd(&mut self) -> Option<OwnedFd> {
        debug_assert_eq!(self.attempt.state, AttemptState::Finished);
        self.attempt.state = AttemptState::Init;
        self.attempt.fd.take()
    }

    /// `any -> Init`: close the fd if one is held, unconditionally reset
    /// state. Used by [`Engine::cleanup`](crate::engine::Engine::cleanup),
    /// which is required to be idempotent and callable from any state.
    pub(crate) fn force_cleanup(&mut self) {
        self.attempt.fd = None;
        self.attempt.state = AttemptState::Init;
    }
}
