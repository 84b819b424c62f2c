pub mod audit;
pub mod config;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod parse;
pub mod response;
pub mod scoring;
pub mod util;
