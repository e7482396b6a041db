use std::os::fd::AsRawFd;

use nix::errno::Errno;
use nix::sys::socket::{self, AddressFamily, SockFlag};

use crate::error::ConnectError;
use crate::path::{AttemptState, Family, Path};
use crate::poller::{Interest, Poller};
use crate::resolver::PathResolver;

/// Outcome of a single [`launch`] call, used by the race controller to decide
/// whether to keep scanning for a same-family fallback (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LaunchOutcome {
    Waiting,
    Finished,
    Failed,
}

fn address_family(family: Family) -> AddressFamily {
    match family {
        Family::Inet => AddressFamily::Inet,
        Family::Inet6 => AddressFamily::Inet6,
    }
}

/// Attempt launcher (spec §4.2).
///
/// Precondition: `paths[index].state() == Init`. Never blocks: the socket is
/// created non-blocking and a `connect()` that would block is left
/// in-progress for the poller to report later.
pub(crate) fn launch<R: PathResolver, P: Poller>(
    paths: &mut [Path],
    index: usize,
    resolver: &R,
    poller: &mut P,
) -> LaunchOutcome {
    debug_assert_eq!(paths[index].state(), AttemptState::Init);

    let resolved = match resolver.get_path_sockaddr(paths, index) {
        Some(resolved) => resolved,
        None => {
            log::debug!("path {index}: {}", ConnectError::UnresolvedPath);
            paths[index].fail_without_fd();
            return LaunchOutcome::Failed;
        }
    };

    let family = address_family(paths[index].family);
    let fd = match socket::socket(
        family,
        resolved.socktype,
        SockFlag::SOCK_NONBLOCK,
        resolved.protocol,
    ) {
        Ok(fd) => fd,
        Err(errno) => {
            log::debug!("path {index}: {}", ConnectError::Socket(errno));
            paths[index].fail_without_fd();
            return LaunchOutcome::Failed;
        }
    };

    match socket::connect(fd.as_raw_fd(), &resolved.sockaddr) {
        Ok(()) => {
            log::debug!("path {index}: connect() succeeded immediately");
            paths[index].finish_immediately(fd);
            LaunchOutcome::Finished
        }
        Err(Errno::EINPROGRESS) => {
            poller.watch_fd(fd.as_raw_fd(), Interest::WRITABLE);
            paths[index].begin_waiting(fd);
            LaunchOutcome::Waiting
        }
        Err(errno) => {
            log::debug!("path {index}: {}", ConnectError::Connect(errno));
            // `fd` is dropped here, closing it; the path never took ownership.
            paths[index].fail_without_fd();
            LaunchOutcome::Failed
        }
    }
}
