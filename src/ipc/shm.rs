//! Named POSIX shared memory mappings

use std::ffi::c_void;
use std::num::NonZeroUsize;
use std::os::fd::OwnedFd;
use std::ptr::NonNull;

use nix::fcntl::OFlag;
use nix::sys::mman::{mmap, munmap, shm_open, shm_unlink, MapFlags, ProtFlags};
use nix::sys::stat::Mode;
use nix::unistd::ftruncate;

use crate::error::{Error, Result};

/// A mapped shared memory object.
///
/// The creating process owns the name: dropping its region unmaps the memory
/// and unlinks the object. Attached regions only unmap.
pub struct SharedRegion {
    name: String,
    _fd: OwnedFd,
    base: NonNull<c_void>,
    len: usize,
    owner: bool,
}

// SAFETY: the mapping is process-wide and the pointer is never aliased mutably
// through this handle without external synchronization.
unsafe impl Send for SharedRegion {}

fn map(name: &str, fd: &OwnedFd, len: usize) -> Result<NonNull<c_void>> {
    let length = NonZeroUsize::new(len).ok_or_else(|| {
        Error::resource("mmap", name, std::io::Error::from_raw_os_error(libc::EINVAL))
    })?;
    // SAFETY: a fresh shared mapping of a file descriptor we own.
    unsafe {
        mmap(
            None,
            length,
            ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
            MapFlags::MAP_SHARED,
            fd,
            0,
        )
    }
    .map_err(|e| Error::resource("mmap", name, e))
}

impl SharedRegion {
    /// Create `name` exclusively, size it to `len` bytes and map it.
    ///
    /// Fails if the object already exists. Fresh objects are zero-filled.
    pub fn create(name: &str, len: usize) -> Result<Self> {
        let fd = shm_open(
            name,
            OFlag::O_CREAT | OFlag::O_EXCL | OFlag::O_RDWR,
            Mode::S_IRUSR | Mode::S_IWUSR,
        )
        .map_err(|e| Error::resource("shm_open", name, e))?;

        let mapped = ftruncate(&fd, len as libc::off_t)
            .map_err(|e| Error::resource("ftruncate", name, e))
            .and_then(|_| map(name, &fd, len));

        let base = match mapped {
            Ok(base) => base,
            Err(err) => {
                if let Err(e) = shm_unlink(name) {
                    tracing::error!("shm_unlink {} failed: {}", name, e);
                }
                return Err(err);
            }
        };

        tracing::debug!("created shared memory {} ({} bytes)", name, len);
        Ok(Self {
            name: name.to_string(),
            _fd: fd,
            base,
            len,
            owner: true,
        })
    }

    /// Map an existing object of `len` bytes. Fails if it does not exist.
    pub fn open(name: &str, len: usize) -> Result<Self> {
        let fd = shm_open(name, OFlag::O_RDWR, Mode::empty())
            .map_err(|e| Error::resource("shm_open", name, e))?;
        let base = map(name, &fd, len)?;

        tracing::debug!("attached shared memory {}", name);
        Ok(Self {
            name: name.to_string(),
            _fd: fd,
            base,
            len,
            owner: false,
        })
    }

    pub fn as_ptr(&self) -> *mut u8 {
        self.base.as_ptr().cast()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub(crate) fn is_owner(&self) -> bool {
        self.owner
    }
}

impl Drop for SharedRegion {
    fn drop(&mut self) {
        // SAFETY: base/len come from a successful mmap and are unmapped once.
        if let Err(e) = unsafe { munmap(self.base, self.len) } {
            tracing::error!("munmap {} failed: {}", self.name, e);
        }
        if self.owner {
            match shm_unlink(self.name.as_str()) {
                Ok(()) => tracing::debug!("unlinked shared memory {}", self.name),
                Err(e) => tracing::error!("shm_unlink {} failed: {}", self.name, e),
            }
        }
    }
}
