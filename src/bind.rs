use std::os::fd::AsRawFd;

use nix::sys::socket::{self, AddressFamily, SockFlag};

use crate::callbacks::ConnectCallbacks;
use crate::error::ConnectError;
use crate::path::{Family, Path};
use crate::resolver::PathResolver;

fn address_family(family: Family) -> AddressFamily {
    match family {
        Family::Inet => AddressFamily::Inet,
        Family::Inet6 => AddressFamily::Inet6,
    }
}

/// `bind_path` (spec §4.6): a peer operation, not part of the connect race.
///
/// Obtains a sockaddr via the shared [`PathResolver`], creates a non-blocking
/// socket, `bind`s it, and hands the bound fd to `callbacks.on_bind` together
/// with the path's index. On any syscall failure the fd (if one was opened)
/// is closed and the function returns silently — the embedder sees no
/// callback. This is a deliberate asymmetry with `launch`'s handling of the
/// same resolver miss (silent here, but a `Failed` transition there; see
/// DESIGN.md for why that asymmetry is kept rather than unified).
pub fn bind_path<R: PathResolver, C: ConnectCallbacks>(
    paths: &[Path],
    index: usize,
    resolver: &R,
    callbacks: &mut C,
) {
    let resolved = match resolver.get_path_sockaddr(paths, index) {
        Some(resolved) => resolved,
        None => {
            log::debug!("bind_path({index}): {}", ConnectError::UnresolvedPath);
            return;
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
            log::debug!("bind_path({index}): {}", ConnectError::Socket(errno));
            return;
        }
    };

    if let Err(errno) = socket::bind(fd.as_raw_fd(), &resolved.sockaddr) {
        log::debug!("bind_path({index}): {}", ConnectError::Bind(errno));
        // `fd` drops here, closing it.
        return;
    }

    callbacks.on_bind(index, fd);
}
