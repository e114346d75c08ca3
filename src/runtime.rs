//! Runtime abstraction layer for async tile loads
//!
//! The session never assumes a global event loop: the host hands it a spawner
//! object and every tile load is submitted there. Completions come back over a
//! channel that the frame thread drains, so the spawner only decides where the
//! resolve futures are polled.

use crate::prelude::{Future, Mutex, VecDeque};
use crate::Result;
use futures::future::BoxFuture;

/// A trait for spawning detached async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    fn spawn_boxed(&self, future: BoxFuture<'static, ()>);
}

/// Convenience function for spawning with type safety
pub fn spawn<F>(spawner: &dyn AsyncSpawner, future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    spawner.spawn_boxed(Box::pin(future));
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use crate::LodError;
        use ::tokio::runtime::Handle;

        /// Spawns loads onto a tokio runtime
        #[derive(Debug, Clone)]
        pub struct TokioSpawner {
            handle: Handle,
        }

        impl TokioSpawner {
            pub fn new(handle: Handle) -> Self {
                Self { handle }
            }

            /// Spawner for the runtime the caller is running inside
            pub fn current() -> Result<Self> {
                Handle::try_current()
                    .map(Self::new)
                    .map_err(|e| LodError::Runtime(e.to_string()))
            }
        }

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(&self, future: BoxFuture<'static, ()>) {
                // Dropping the JoinHandle detaches the task
                let _ = self.handle.spawn(future);
            }
        }
    }

    /// Spawns loads onto a `futures` thread pool
    #[derive(Debug, Clone)]
    pub struct ThreadPoolSpawner {
        pool: futures::executor::ThreadPool,
    }

    impl ThreadPoolSpawner {
        pub fn new(threads: usize) -> Result<Self> {
            let pool = futures::executor::ThreadPool::builder()
                .pool_size(threads.max(1))
                .name_prefix("lodmap-loader-")
                .create()?;
            Ok(Self { pool })
        }
    }

    impl AsyncSpawner for ThreadPoolSpawner {
        fn spawn_boxed(&self, future: BoxFuture<'static, ()>) {
            self.pool.spawn_ok(future);
        }
    }

    /// Queues loads until the host runs them, typically once per frame.
    /// Each queued future is driven to completion on the calling thread.
    #[derive(Default)]
    pub struct ManualSpawner {
        queue: Mutex<VecDeque<BoxFuture<'static, ()>>>,
    }

    impl ManualSpawner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn pending(&self) -> usize {
            self.queue.lock().map(|queue| queue.len()).unwrap_or(0)
        }

        /// Remove every queued future without running it, oldest first
        pub fn take_pending(&self) -> Vec<BoxFuture<'static, ()>> {
            match self.queue.lock() {
                Ok(mut queue) => queue.drain(..).collect(),
                Err(_) => Vec::new(),
            }
        }

        /// Run everything queued so far, returning how many tasks ran
        pub fn run_pending(&self) -> usize {
            let batch = self.take_pending();
            let count = batch.len();
            for future in batch {
                futures::executor::block_on(future);
            }
            count
        }
    }

    impl AsyncSpawner for ManualSpawner {
        fn spawn_boxed(&self, future: BoxFuture<'static, ()>) {
            if let Ok(mut queue) = self.queue.lock() {
                queue.push_back(future);
            }
        }
    }

    impl std::fmt::Debug for ManualSpawner {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ManualSpawner")
                .field("pending", &self.pending())
                .finish()
        }
    }
}

pub use spawners::{ManualSpawner, ThreadPoolSpawner};

#[cfg(feature = "tokio-runtime")]
pub use spawners::tokio_impl::TokioSpawner;
