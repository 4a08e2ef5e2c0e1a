pub mod backend;
pub mod cli;
