/// Parallel processing utilities
use crate::SeqAtomsError;

fn resolve_threads(threads: usize) -> usize {
    if threads == 0 {
        num_cpus::get()
    } else {
        threads
    }
}

/// Dedicated pool for one fan-out; 0 threads = one per CPU
pub fn build_pool(threads: usize) -> Result<rayon::ThreadPool, SeqAtomsError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(resolve_threads(threads))
        .thread_name(|i| format!("seqatoms-worker-{}", i))
        .build()
        .map_err(|e| SeqAtomsError::Config(format!("cannot build worker pool: {}", e)))
}
