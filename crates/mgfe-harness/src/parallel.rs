//! Thread pool setup for the assembly loops.

use log::info;

use crate::{HarnessError, Result};

/// Configure the global rayon pool. `None` keeps rayon's default of one
/// thread per core. Calling this twice is an error from rayon itself.
pub fn init_thread_pool(num_threads: Option<usize>) -> Result<()> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = num_threads {
        builder = builder.num_threads(n);
    }
    builder
        .build_global()
        .map_err(|e| HarnessError::ThreadPool(e.to_string()))?;
    info!("thread pool: {} workers", rayon::current_num_threads());
    Ok(())
}
