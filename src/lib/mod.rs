pub mod filter;
pub mod input;
pub mod receiver;
pub mod report;
pub mod utils;
