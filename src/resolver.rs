use std::net::{SocketAddrV4, SocketAddrV6};

use nix::sys::socket::{SockaddrIn, SockaddrIn6, SockaddrStorage, SockProtocol, SockType};

use crate::path::{Family, Path};

/// Everything [`launcher::launch`](crate::launcher::launch) needs to open and
/// connect a socket for one path.
#[derive(Debug, Clone)]
pub struct ResolvedAddr {
    pub sockaddr: SockaddrStorage,
    pub socktype: SockType,
    pub protocol: Option<SockProtocol>,
}

/// The path-introspection helper consumed from the surrounding query object
/// (spec §6: `get_path_sockaddr(query, index) -> (sockaddr, len, socktype,
/// protocol) | none`).
///
/// Taking `paths` explicitly rather than storing a borrow of them sidesteps
/// the self-referential lifetime a `Engine`-owned resolver would otherwise
/// need, and replaces the original's `path - paths` pointer arithmetic with
/// an explicit index, per the rewrite's design notes.
pub trait PathResolver {
    /// Resolve `paths[index]` to a ready-to-use sockaddr, or `None` if the
    /// path cannot be materialized (e.g. an address family the embedder's
    /// resolution pipeline does not support on this host).
    fn get_path_sockaddr(&self, paths: &[Path], index: usize) -> Option<ResolvedAddr>;
}

/// The natural resolver: each [`Path`] already carries everything needed to
/// build a sockaddr, so this just assembles one directly from its fields.
/// Embedders with a more elaborate path-materialization step (NAT64
/// synthesis, local binding hints, ...) can supply their own
/// [`PathResolver`] instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPathResolver;

impl PathResolver for DefaultPathResolver {
    fn get_path_sockaddr(&self, paths: &[Path], index: usize) -> Option<ResolvedAddr> {
        let path = paths.get(index)?;

        let sockaddr = match (path.family, path.addr) {
            (Family::Inet, std::net::IpAddr::V4(v4)) => {
                SockaddrStorage::from(SockaddrIn::from(SocketAddrV4::new(v4, path.port)))
            }
            (Family::Inet6, std::net::IpAddr::V6(v6)) => SockaddrStorage::from(SockaddrIn6::from(
                SocketAddrV6::new(v6, path.port, 0, path.ifindex.unwrap_or(0)),
            )),
            // family/address mismatch: not a path this resolver can materialize.
            _ => return None,
        };

        Some(ResolvedAddr {
            sockaddr,
            socktype: path.socktype,
            protocol: path.protocol,
        })
    }
}
