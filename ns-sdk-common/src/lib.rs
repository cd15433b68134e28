//! ns-sdk内部使用的公共工具

mod error;
pub mod helper;

pub use error::Error;
