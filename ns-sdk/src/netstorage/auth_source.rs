//! 签名中的时间戳和随机数来源
//!
//! 每次请求都会重新获取，用于服务端的重放检测。测试时可以用[`FixedAuthSource`]得到确定的签名。

use rand::Rng;
use time::OffsetDateTime;

/// 随机数的范围：`[0, NONCE_UPPER)`
pub const NONCE_UPPER: u32 = 100_000;

pub trait AuthSource: Send + Sync {
    /// 当前的Unix时间戳（秒）
    fn unix_timestamp(&self) -> i64;

    /// `[0, NONCE_UPPER)`范围内的随机数
    fn nonce(&self) -> u32;
}

/// 系统时钟 + 线程本地的随机数生成器
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAuthSource;

impl AuthSource for SystemAuthSource {
    fn unix_timestamp(&self) -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }

    fn nonce(&self) -> u32 {
        rand::rng().random_range(0..NONCE_UPPER)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedAuthSource {
    pub timestamp: i64,
    pub nonce: u32,
}

impl AuthSource for FixedAuthSource {
    fn unix_timestamp(&self) -> i64 {
        self.timestamp
    }

    fn nonce(&self) -> u32 {
        self.nonce
    }
}
