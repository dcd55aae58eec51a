//! Library surface of the proof generator client: the fetch layer, the
//! proof pipeline, and the output record assembler. The `pgen` binary is a
//! thin CLI wrapper around [`pipeline::run`].

pub mod fetch;
pub mod pipeline;
pub mod record;

pub use pipeline::{run, PipelineConfig, PipelineError};
pub use record::ProofRecord;
