pub mod assemble;
pub mod batch;
pub mod classify;
pub mod normalize;

pub use assemble::assemble;
pub use batch::{collect_batch, collect_batch_at};
pub use classify::{classify, Classification};
pub use normalize::{normalize, normalize_row};
