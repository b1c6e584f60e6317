//! Named POSIX semaphores

use std::ffi::CString;
use std::io;
use std::ptr::NonNull;
use std::time::Duration;

use nix::sys::time::TimeSpec;
use nix::time::{clock_gettime, ClockId};

use crate::error::{Error, Result};

/// Outcome of a blocking wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The semaphore was decremented.
    Acquired,
    /// A caught signal interrupted the wait; the count is unchanged.
    Interrupted,
}

/// Handle to a named semaphore.
///
/// The creating process owns the name and unlinks it on drop; every handle
/// closes its own reference.
pub struct NamedSemaphore {
    name: String,
    c_name: CString,
    sem: NonNull<libc::sem_t>,
    owner: bool,
}

// SAFETY: sem_t operations are thread-safe; the handle is closed exactly once.
unsafe impl Send for NamedSemaphore {}
unsafe impl Sync for NamedSemaphore {}

fn c_name(name: &str, op: &'static str) -> Result<CString> {
    CString::new(name)
        .map_err(|_| Error::resource(op, name, io::Error::from_raw_os_error(libc::EINVAL)))
}

impl NamedSemaphore {
    /// Create `name` exclusively with the given initial count.
    pub fn create(name: &str, value: u32) -> Result<Self> {
        let c_name = c_name(name, "sem_open")?;
        // SAFETY: valid C string; mode and value are passed as C unsigned ints.
        let sem = unsafe {
            libc::sem_open(
                c_name.as_ptr(),
                libc::O_CREAT | libc::O_EXCL,
                0o600 as libc::c_uint,
                value as libc::c_uint,
            )
        };
        let sem = Self::check(sem, name)?;

        tracing::debug!("created semaphore {} = {}", name, value);
        Ok(Self {
            name: name.to_string(),
            c_name,
            sem,
            owner: true,
        })
    }

    /// Open an existing semaphore. Fails if it does not exist.
    pub fn open(name: &str) -> Result<Self> {
        let c_name = c_name(name, "sem_open")?;
        // SAFETY: valid C string, no creation flags.
        let sem = unsafe { libc::sem_open(c_name.as_ptr(), 0) };
        let sem = Self::check(sem, name)?;

        tracing::debug!("opened semaphore {}", name);
        Ok(Self {
            name: name.to_string(),
            c_name,
            sem,
            owner: false,
        })
    }

    fn check(sem: *mut libc::sem_t, name: &str) -> Result<NonNull<libc::sem_t>> {
        if sem == libc::SEM_FAILED {
            return Err(Error::resource("sem_open", name, io::Error::last_os_error()));
        }
        NonNull::new(sem)
            .ok_or_else(|| Error::resource("sem_open", name, io::Error::last_os_error()))
    }

    /// Block until the count can be decremented or a signal interrupts.
    pub fn wait(&self) -> Result<WaitOutcome> {
        // SAFETY: sem is a live handle from sem_open.
        if unsafe { libc::sem_wait(self.sem.as_ptr()) } == 0 {
            return Ok(WaitOutcome::Acquired);
        }
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EINTR) {
            Ok(WaitOutcome::Interrupted)
        } else {
            Err(Error::sync("sem_wait", &self.name, err))
        }
    }

    /// Like [`NamedSemaphore::wait`], but give up after `timeout`.
    /// Returns `None` if the timeout expired first.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Option<WaitOutcome>> {
        let now = clock_gettime(ClockId::CLOCK_REALTIME)
            .map_err(|e| Error::sync("clock_gettime", &self.name, e.into()))?;
        let deadline = now + TimeSpec::from(timeout);

        // SAFETY: sem is a live handle and deadline a valid timespec.
        if unsafe { libc::sem_timedwait(self.sem.as_ptr(), deadline.as_ref()) } == 0 {
            return Ok(Some(WaitOutcome::Acquired));
        }
        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::ETIMEDOUT) => Ok(None),
            Some(libc::EINTR) => Ok(Some(WaitOutcome::Interrupted)),
            _ => Err(Error::sync("sem_timedwait", &self.name, err)),
        }
    }

    /// Block until the count can be decremented, retrying after signals.
    pub fn acquire(&self) -> Result<()> {
        while self.wait()? == WaitOutcome::Interrupted {}
        Ok(())
    }

    /// Decrement without blocking. Returns false if the count is zero.
    pub fn try_acquire(&self) -> Result<bool> {
        loop {
            // SAFETY: sem is a live handle from sem_open.
            if unsafe { libc::sem_trywait(self.sem.as_ptr()) } == 0 {
                return Ok(true);
            }
            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                Some(libc::EAGAIN) => return Ok(false),
                Some(libc::EINTR) => continue,
                _ => return Err(Error::sync("sem_trywait", &self.name, err)),
            }
        }
    }

    /// Increment the count, waking one waiter if any.
    pub fn post(&self) -> Result<()> {
        // SAFETY: sem is a live handle from sem_open.
        if unsafe { libc::sem_post(self.sem.as_ptr()) } == 0 {
            Ok(())
        } else {
            Err(Error::sync("sem_post", &self.name, io::Error::last_os_error()))
        }
    }

    /// Current count (a snapshot; may be stale immediately).
    #[cfg(test)]
    pub(crate) fn value(&self) -> Result<i32> {
        let mut value: libc::c_int = 0;
        // SAFETY: sem is a live handle and value is a valid out pointer.
        if unsafe { libc::sem_getvalue(self.sem.as_ptr(), &mut value) } == 0 {
            Ok(value)
        } else {
            Err(Error::sync("sem_getvalue", &self.name, io::Error::last_os_error()))
        }
    }
}

impl Drop for NamedSemaphore {
    fn drop(&mut self) {
        // SAFETY: the handle is closed exactly once, here.
        if unsafe { libc::sem_close(self.sem.as_ptr()) } == -1 {
            tracing::error!("sem_close {} failed: {}", self.name, io::Error::last_os_error());
        }
        if self.owner {
            // SAFETY: c_name is a valid C string.
            if unsafe { libc::sem_unlink(self.c_name.as_ptr()) } == -1 {
                tracing::error!("sem_unlink {} failed: {}", self.name, io::Error::last_os_error());
            } else {
                tracing::debug!("unlinked semaphore {}", self.name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::test_support::unique_name;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_create_and_count() {
        let name = unique_name("sem");
        let sem = NamedSemaphore::create(&name, 2).unwrap();
        assert_eq!(sem.value().unwrap(), 2);

        sem.acquire().unwrap();
        assert!(sem.try_acquire().unwrap());
        assert!(!sem.try_acquire().unwrap());
        assert_eq!(sem.value().unwrap(), 0);

        sem.post().unwrap();
        assert_eq!(sem.value().unwrap(), 1);
    }

    #[test]
    fn test_create_is_exclusive() {
        let name = unique_name("sem");
        let _sem = NamedSemaphore::create(&name, 0).unwrap();
        match NamedSemaphore::create(&name, 0) {
            Err(Error::Resource { source, .. }) => {
                assert_eq!(source.raw_os_error(), Some(libc::EEXIST));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("second create succeeded"),
        }
    }

    #[test]
    fn test_open_missing_fails() {
        let name = unique_name("sem");
        match NamedSemaphore::open(&name) {
            Err(Error::Resource { op, source, .. }) => {
                assert_eq!(op, "sem_open");
                assert_eq!(source.raw_os_error(), Some(libc::ENOENT));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("opened a semaphore that was never created"),
        }
    }

    #[test]
    fn test_opened_handle_shares_count() {
        let name = unique_name("sem");
        let owner = NamedSemaphore::create(&name, 0).unwrap();
        let other = NamedSemaphore::open(&name).unwrap();

        other.post().unwrap();
        assert!(owner.try_acquire().unwrap());
    }

    #[test]
    fn test_wait_blocks_until_post() {
        let name = unique_name("sem");
        let sem = NamedSemaphore::create(&name, 0).unwrap();
        let (tx, rx) = mpsc::channel();

        let waiter_name = name.clone();
        let handle = thread::spawn(move || {
            let sem = NamedSemaphore::open(&waiter_name).unwrap();
            let outcome = sem.wait().unwrap();
            tx.send(outcome).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        sem.post().unwrap();
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            WaitOutcome::Acquired
        );
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_timeout() {
        let name = unique_name("sem");
        let sem = NamedSemaphore::create(&name, 1).unwrap();

        assert_eq!(
            sem.wait_timeout(Duration::from_millis(50)).unwrap(),
            Some(WaitOutcome::Acquired)
        );

        let start = std::time::Instant::now();
        assert_eq!(sem.wait_timeout(Duration::from_millis(50)).unwrap(), None);
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(sem.value().unwrap(), 0);
    }

    #[test]
    fn test_owner_drop_unlinks() {
        let name = unique_name("sem");
        drop(NamedSemaphore::create(&name, 1).unwrap());
        assert!(NamedSemaphore::open(&name).is_err());
    }
}
