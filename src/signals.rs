//! External stop requests for the supervisor
//!
//! SIGINT and SIGTERM set a process-wide flag. The handlers are installed
//! without `SA_RESTART`, so a supervisor blocked in `sem_timedwait` wakes up
//! with `EINTR` and can check the flag. A signal that lands between the flag
//! check and the wait is picked up when the wait times out.

use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

use crate::error::{Error, Result};

/// Anything the coordinator loop can poll for a stop request.
pub trait StopRequest {
    fn is_requested(&self) -> bool;
}

impl StopRequest for AtomicBool {
    fn is_requested(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

/// Set from the signal handler; once true it stays true.
static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_stop_signal(_signal: libc::c_int) {
    STOP_REQUESTED.store(true, Ordering::SeqCst);
}

/// Stop requests delivered by SIGINT or SIGTERM.
#[derive(Debug)]
pub struct SignalStop {
    _private: (),
}

impl SignalStop {
    /// Install the SIGINT and SIGTERM handlers.
    pub fn install() -> Result<Self> {
        let action = SigAction::new(
            SigHandler::Handler(handle_stop_signal),
            SaFlags::empty(),
            SigSet::empty(),
        );
        for signal in [Signal::SIGINT, Signal::SIGTERM] {
            // SAFETY: the handler only stores to an atomic, which is
            // async-signal-safe.
            unsafe { sigaction(signal, &action) }
                .map_err(|e| Error::resource("sigaction", signal.as_str(), e))?;
        }
        Ok(Self { _private: () })
    }
}

impl StopRequest for SignalStop {
    fn is_requested(&self) -> bool {
        STOP_REQUESTED.load(Ordering::SeqCst)
    }
}
