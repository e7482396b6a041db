use std::os::fd::RawFd;

use crate::callbacks::ConnectCallbacks;
use crate::config::ConnectOptions;
use crate::launcher::{self, LaunchOutcome};
use crate::path::{AttemptState, Family, Path};
use crate::poller::{Interest, Poller, Token};
use crate::resolver::PathResolver;

/// Overall query state as seen from the connect engine (spec §3).
///
/// The engine only ever drives `Init -> Waiting -> Finished`; `Failed` is
/// produced by the surrounding query once every path has failed (spec §7:
/// "the engine itself does not synthesize a failure callback"), so there is
/// deliberately no engine method that sets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverallState {
    #[default]
    Init,
    Waiting,
    Finished,
}

/// Whether a [`Engine::dispatch`] call was meant for this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// `token` matched a path fd or the grace timer; state may have changed.
    Consumed,
    /// `token` belongs to some other subsystem; the engine did nothing.
    Unhandled,
}

/// The connect engine: single-threaded, event-driven, races non-blocking
/// connect attempts across address families (spec §§2-5).
///
/// Generic over the embedder-supplied poller, path resolver and callback
/// object rather than trait objects, since a query owns exactly one of each
/// for its whole lifetime and there is no need to erase their types.
pub struct Engine<P, R, C> {
    paths: Vec<Path>,
    grace_timer: Option<Token>,
    overall: OverallState,
    poller: P,
    resolver: R,
    callbacks: C,
    options: ConnectOptions,
}

impl<P: Poller, R: PathResolver, C: ConnectCallbacks> Engine<P, R, C> {
    pub fn new(
        paths: Vec<Path>,
        poller: P,
        resolver: R,
        callbacks: C,
        options: ConnectOptions,
    ) -> Self {
        Engine {
            paths,
            grace_timer: None,
            overall: OverallState::Init,
            poller,
            resolver,
            callbacks,
            options,
        }
    }

    pub fn overall_state(&self) -> OverallState {
        self.overall
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn callbacks(&self) -> &C {
        &self.callbacks
    }

    /// Races the first `Init` IPv4 path and the first `Init` IPv6 path in
    /// input order (spec §4.3: "at most one per family is launched
    /// initially"). A no-op on an empty path list.
    pub fn start(&mut self) {
        let mut launched = [false, false]; // [Inet, Inet6]

        for index in 0..self.paths.len() {
            let slot = family_slot(self.paths[index].family);
            if launched[slot] || self.paths[index].state() != AttemptState::Init {
                continue;
            }
            launched[slot] = true;

            match self.launch_path(index) {
                LaunchOutcome::Failed => self.retry_family(self.paths[index].family),
                LaunchOutcome::Finished => self.arm_grace_timer(),
                LaunchOutcome::Waiting => {}
            }
        }

        if launched[0] || launched[1] {
            self.overall = OverallState::Waiting;
        }

        // An immediate synchronous success during the loop above needs a
        // winner scan even though no poller event will ever arrive for it.
        self.connect_check();
    }

    /// Routes a poller callback to the matching path or to the grace timer
    /// (spec §4.4). Returns [`DispatchOutcome::Unhandled`] if `token`
    /// matches neither, so the embedder can try other subsystems.
    pub fn dispatch(&mut self, token: Token, events: Interest) -> DispatchOutcome {
        if let Some(index) = self.paths.iter().position(|p| p.fd_raw() == Some(token)) {
            log::trace!("dispatch: token {token} matched path {index}");
            self.poller.watch_fd(token, Interest::empty());

            if events.contains(Interest::WRITABLE) {
                match socket_error(token) {
                    Ok(0) => {
                        self.paths[index].finish_from_waiting();
                        self.arm_grace_timer();
                        self.connect_check();
                    }
                    Ok(_) | Err(_) => {
                        let family = self.paths[index].family;
                        self.paths[index].fail_and_close();
                        self.connect_failed(family);
                    }
                }
            }

            return DispatchOutcome::Consumed;
        }

        if self.grace_timer == Some(token) {
            log::trace!("dispatch: token {token} matched the grace timer");
            self.grace_timer = None;
            self.handle_grace_expiry();
            return DispatchOutcome::Consumed;
        }

        DispatchOutcome::Unhandled
    }

    /// Tears down every outstanding socket and the grace timer. Idempotent
    /// and safe to call from any state, including mid-dispatch after a
    /// callback has returned (spec §4.5).
    pub fn cleanup(&mut self) {
        for index in 0..self.paths.len() {
            if let Some(fd) = self.paths[index].fd_raw() {
                self.poller.watch_fd(fd, Interest::empty());
            }
            self.paths[index].force_cleanup();
        }

        if let Some(token) = self.grace_timer.take() {
            self.poller.remove_timeout(token);
        }
    }

    fn launch_path(&mut self, index: usize) -> LaunchOutcome {
        launcher::launch(&mut self.paths, index, &self.resolver, &mut self.poller)
    }

    /// On a `Failed` transition for `family`, launch the next `Init` path of
    /// that family (spec §4.3), stopping at the first attempt that does not
    /// itself immediately fail. This keeps "at most one in-flight attempt
    /// per family" true even when several same-family candidates fail back
    /// to back within one scan (see DESIGN.md, Open Question #2: "launch
    /// next only", not "launch every remaining one").
    fn retry_family(&mut self, family: Family) {
        for index in 0..self.paths.len() {
            if self.paths[index].family != family || self.paths[index].state() != AttemptState::Init
            {
                continue;
            }
            match self.launch_path(index) {
                LaunchOutcome::Failed => continue,
                LaunchOutcome::Finished => {
                    self.arm_grace_timer();
                    return;
                }
                LaunchOutcome::Waiting => return,
            }
        }
    }

    fn connect_failed(&mut self, family: Family) {
        self.retry_family(family);
        self.connect_check();
    }

    /// Arms the grace timer on the *first* successful transition and only
    /// the first (spec Open Question #1): every call site that can produce
    /// `Finished` routes through here, so there is exactly one place that
    /// decides "first", rather than each caller separately checking and
    /// racing to set it.
    fn arm_grace_timer(&mut self) {
        if self.grace_timer.is_none() {
            let grace = self.options.grace_window;
            let token = self
                .poller
                .add_timeout(grace.as_secs() as i64, grace.subsec_nanos() as i64);
            self.grace_timer = Some(token);
        }
    }

    /// Grace timer fired: force every still-pending path to `Failed` without
    /// retrying (spec §4.3). At least one path is already `Finished` by
    /// construction, since the timer is armed only after a first success
    /// (spec §7: "impossible by construction").
    fn handle_grace_expiry(&mut self) {
        for index in 0..self.paths.len() {
            match self.paths[index].state() {
                AttemptState::Waiting => {
                    if let Some(fd) = self.paths[index].fd_raw() {
                        self.poller.watch_fd(fd, Interest::empty());
                    }
                    self.paths[index].fail_and_close();
                }
                AttemptState::Init => self.paths[index].fail_without_fd(),
                AttemptState::Finished | AttemptState::Failed => {}
            }
        }
        self.connect_check();
    }

    /// Winner selection (spec §4.3 `connect_check`): walk paths in input
    /// order, stop at the first not-yet-decided path, deliver the first
    /// `Finished` one found and mark the query done.
    fn connect_check(&mut self) {
        for index in 0..self.paths.len() {
            let state = self.paths[index].state();
            if state < AttemptState::Finished {
                return;
            }
            if state == AttemptState::Finished {
                let fd = self.paths[index]
                    .take_fd()
                    .expect("a Finished path always owns its fd");
                self.overall = OverallState::Finished;
                self.callbacks.on_connect(index, fd);
                return;
            }
            // Failed: keep scanning.
        }
    }
}

fn family_slot(family: Family) -> usize {
    match family {
        Family::Inet => 0,
        Family::Inet6 => 1,
    }
}

/// Reads the pending `SO_ERROR` off `fd` (0 means the connect succeeded).
///
/// Uses `libc` directly rather than a `nix` sockopt wrapper, since there is
/// no safe wrapper for reading a pending `SO_ERROR` off a connecting socket.
fn socket_error(fd: RawFd) -> std::io::Result<i32> {
    let mut errval: libc::c_int = 0;
    let mut len = std::mem::size_of::<libc::c_int>() as libc::socklen_t;

    let ret = unsafe {
        libc::getsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_ERROR,
            &mut errval as *mut libc::c_int as *mut libc::c_void,
            &mut len,
        )
    };

    if ret == -1 {
        return Err(std::io::Error::last_os_error());
    }

    Ok(errval)
}
