//! Concurrent tile selection and mosaic assembly
//!
//! Both phases fan independent work units out over a bounded worker
//! pool: one unit per grid cell during selection, one per distinct
//! candidate during assembly. Saturated pools apply backpressure; a
//! single aggregation point collects exactly one result per unit, and
//! any unit failure aborts the phase (a mosaic is fully assembled or
//! the run fails).

use crate::io::error::{Result, invalid_parameter};

/// Per-candidate tile preparation and canvas composition
pub mod assembler;
/// Per-cell candidate selection against a search index
pub mod selector;

pub use assembler::{AssemblerConfig, assemble};
pub use selector::{Selection, SelectorConfig, select_tiles};

/// Build a bounded worker pool with a fixed thread count
pub(crate) fn worker_pool(threads: usize) -> Result<rayon::ThreadPool> {
    if threads == 0 {
        return Err(invalid_parameter(
            "threads",
            &threads,
            &"must be at least 1",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| invalid_parameter("threads", &threads, &e))
}
