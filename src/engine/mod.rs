pub mod models;
pub mod scoring;
pub mod carry;
pub mod winner;
pub mod debounce;
pub mod records;
pub mod controller;
pub mod simulator;
