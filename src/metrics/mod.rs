pub mod euclidean;
pub mod znormalized;
