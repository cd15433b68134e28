#![doc = include_str!("../README.md")]

#[cfg(feature = "netstorage")]
pub mod netstorage;

/// NetStorage账户凭证
#[cfg(feature = "netstorage")]
pub mod credentials;
