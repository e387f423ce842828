pub mod discord;
pub mod distance_metric;
pub mod window;
