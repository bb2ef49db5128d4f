use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Bounded rayon pool for narration and rendering work.
pub(crate) fn build_thread_pool(threads: usize) -> NewsreelResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(NewsreelError::validation("workers must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/pool.rs"]
mod tests;
