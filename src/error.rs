use std::fmt;

use nix::errno::Errno;

/// A syscall-level failure encountered while launching or binding an attempt.
///
/// This never crosses the public API as a `Result`: per-attempt failures are
/// contained to the owning [`Path`](crate::path::Path) and folded into its
/// state machine (see [`AttemptState::Failed`](crate::path::AttemptState::Failed)).
/// It exists so call sites have something concrete to log at `debug!` before
/// discarding it, wrapping an `Errno` the same way any fallible syscall site
/// would for fluent `?`-based handling, without pretending the caller can
/// act on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    /// `get_path_sockaddr` (or the default resolver) could not materialize a
    /// sockaddr for this path, e.g. because the family is unsupported.
    UnresolvedPath,
    /// `socket(2)` failed.
    Socket(Errno),
    /// `bind(2)` failed.
    Bind(Errno),
    /// `connect(2)` failed for a reason other than `EINPROGRESS`.
    Connect(Errno),
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectError::UnresolvedPath => write!(f, "path could not be resolved to a sockaddr"),
            ConnectError::Socket(e) => write!(f, "socket() failed: {e}"),
            ConnectError::Bind(e) => write!(f, "bind() failed: {e}"),
            ConnectError::Connect(e) => write!(f, "connect() failed: {e}"),
        }
    }
}

impl std::error::Error for ConnectError {}
