pub mod chart;
pub mod core;
pub mod game;
pub mod import;
pub mod model;
pub mod records;
pub mod summary;
