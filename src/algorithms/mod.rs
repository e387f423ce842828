pub mod brute_force;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod scan;
pub mod top_k;
