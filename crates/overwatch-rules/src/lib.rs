//! Per-step rules of the Overwatch gridworld.
//!
//! - [`RewardEvaluator`] scores each surveillance agent from what its
//!   observation window shows.
//! - [`CaptureEngine`] decides which targets the snipers have caught and
//!   tombstones them in their agent layer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod capture;
pub mod reward;

pub use capture::{need_to_surround, CaptureEngine, CapturePolicy, CaptureReport};
pub use reward::{RewardCount, RewardEvaluator, RewardMech};
