//! Usage gating: the daily free quota and the post-download promo cadence.

pub mod promo;
pub mod usage;
