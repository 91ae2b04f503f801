pub mod memory;
pub mod pool;
pub mod postgres;
pub mod repository;
pub mod seed;
