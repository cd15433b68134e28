//! Credentials definitions.
//!
//! NetStorage使用账户页面上的`hostname`、`key_name`和`key`（共享密钥）计算每个请求的签名，
//! 三者都不能为空，在构建时检查，而不是等到发起请求的时候才报错。
//!
//! # Example
//! ```
//! use ns_sdk::credentials::{Credentials, Scheme};
//!
//! let creds = Credentials::new(
//!     "example-nsu.akamaihd.net",
//!     "key-name",
//!     "secret-key",
//!     Scheme::Https,
//! )
//! .unwrap();
//! assert_eq!(creds.scheme().as_str(), "https");
//! ```

use std::fmt::{Debug, Formatter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    /// `ssl`为`true`时使用https
    pub fn from_ssl(ssl: bool) -> Self {
        if ssl { Scheme::Https } else { Scheme::Http }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    hostname: String,
    key_name: String,
    key: Vec<u8>,
    scheme: Scheme,
}

impl Credentials {
    pub fn new(
        hostname: impl Into<String>,
        key_name: impl Into<String>,
        key: impl Into<Vec<u8>>,
        scheme: Scheme,
    ) -> Result<Self, CredentialsError> {
        let hostname = hostname.into();
        let key_name = key_name.into();
        let key = key.into();
        if hostname.is_empty() {
            return Err(CredentialsError::Empty("hostname"));
        }
        if key_name.is_empty() {
            return Err(CredentialsError::Empty("key_name"));
        }
        if key.is_empty() {
            return Err(CredentialsError::Empty("key"));
        }

        Ok(Self {
            hostname,
            key_name,
            key,
            scheme,
        })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// 原始的共享密钥字节，签名时直接使用，不做任何变换
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }
}

// 不打印key
impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("hostname", &self.hostname)
            .field("key_name", &self.key_name)
            .field("key", &"***")
            .field("scheme", &self.scheme)
            .finish()
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("netstorage {0} must not be empty")]
    Empty(&'static str),
}
