pub mod error;
pub mod features;
pub mod network;
pub mod parse;
pub mod report;
pub mod training;
