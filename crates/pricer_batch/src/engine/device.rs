//! Compute device context.
//!
//! A [`Device`] is a dedicated rayon thread pool. Kernels are closures run
//! inside the pool; a panic in any worker aborts the launch and is reported
//! as [`EngineError::LaunchFailed`] instead of unwinding into the caller.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use super::error::EngineError;

/// A compute device hosting at most one batch at a time.
///
/// # Examples
///
/// ```rust
/// use pricer_batch::engine::Device;
///
/// let device = Device::new(0, 2).unwrap();
/// assert_eq!(device.threads(), 2);
/// assert!(!device.is_busy());
/// ```
pub struct Device {
    id: usize,
    pool: ThreadPool,
    busy: AtomicBool,
}

impl Device {
    /// Creates device `id` backed by `threads` worker threads.
    ///
    /// `threads == 0` uses one thread per logical CPU.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Device` if the thread pool cannot be built.
    pub fn new(id: usize, threads: usize) -> Result<Self, EngineError> {
        let threads = if threads == 0 { num_cpus::get() } else { threads };
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |i| format!("mc-device-{}-{}", id, i))
            .build()
            .map_err(|e| EngineError::Device(e.to_string()))?;
        debug!(device = id, threads, "device created");
        Ok(Self {
            id,
            pool,
            busy: AtomicBool::new(false),
        })
    }

    /// Creates device `id` with one thread per logical CPU.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Device` if the thread pool cannot be built.
    pub fn with_default_threads(id: usize) -> Result<Self, EngineError> {
        Self::new(id, 0)
    }

    /// Device id.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Worker threads of the device.
    #[inline]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Returns `true` while a batch holds the device.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Takes exclusive use of the device.
    pub(crate) fn lease(&self) -> Result<DeviceLease<'_>, EngineError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| EngineError::DeviceBusy { device: self.id })?;
        Ok(DeviceLease { device: self })
    }

    /// Runs `kernel` on the device and waits for it to finish.
    ///
    /// Returning from `launch` is the synchronisation point between kernels:
    /// every write made by the kernel is visible to the caller.
    pub(crate) fn launch<R, F>(&self, kernel: &'static str, f: F) -> Result<R, EngineError>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        trace!(device = self.id, kernel, "launch");
        self.pool
            .install(|| panic::catch_unwind(AssertUnwindSafe(f)))
            .map_err(|payload| EngineError::LaunchFailed {
                kernel,
                message: panic_message(payload.as_ref()),
            })
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("threads", &self.threads())
            .field("busy", &self.is_busy())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Exclusive hold on a [`Device`], released on drop.
#[derive(Debug)]
pub(crate) struct DeviceLease<'d> {
    device: &'d Device,
}

impl<'d> DeviceLease<'d> {
    #[inline]
    pub(crate) fn device(&self) -> &'d Device {
        self.device
    }
}

impl Drop for DeviceLease<'_> {
    fn drop(&mut self) {
        self.device.busy.store(false, Ordering::Release);
        trace!(device = self.device.id, "device released");
    }
}
