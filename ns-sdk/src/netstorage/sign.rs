//! 请求签名
//!
//! 每个请求携带三个header：
//!
//! ```text
//! X-Akamai-ACS-Action:    version=1&action=<action>
//! X-Akamai-ACS-Auth-Data: 5, 0.0.0.0, 0.0.0.0, <unix时间戳>, <随机数>, <key_name>
//! X-Akamai-ACS-Auth-Sign: base64(HMAC-SHA256(key, <auth data><path>\nx-akamai-acs-action:<action header>\n))
//! ```

use super::auth_source::AuthSource;
use super::error::{ArgumentError, Error};
use base64::{Engine, engine::general_purpose};
use ns_sdk_common::helper::sign_hmac_sha256;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

pub const ACTION_HEADER: &str = "X-Akamai-ACS-Action";
pub const AUTH_DATA_HEADER: &str = "X-Akamai-ACS-Auth-Data";
pub const AUTH_SIGN_HEADER: &str = "X-Akamai-ACS-Auth-Sign";

// 请求URI中path需要编码的字符，已有的`%XX`保持不变
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'\'');

/// 一次请求的签名结果，每次请求重新计算，不缓存
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// 编码后的path（包含query），签名和请求url使用同一个值
    pub path: String,
    pub action: String,
    pub auth_data: String,
    pub signature: String,
}

/// path必须以`/`开头；返回按请求URI规则编码后的path，保留query，丢弃fragment
///
/// path不会被改写：`\`编码为`%5C`，不合法的`%`转义、控制字符以及`.`/`..`段都返回
/// [`ArgumentError::InvalidPath`]
pub fn canonical_path(path: &str) -> Result<String, Error> {
    let invalid = || Error::from(ArgumentError::InvalidPath(path.to_owned()));

    if !path.starts_with('/') || path.chars().any(|c| c.is_ascii_control()) {
        return Err(invalid());
    }

    let without_fragment = path.split_once('#').map_or(path, |(p, _)| p);
    let (path_part, query) = match without_fragment.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (without_fragment, None),
    };

    if !valid_escapes(path_part) {
        return Err(invalid());
    }
    // http url会合并`.`和`..`段，签名的path和实际请求的path会不一致
    let dot_segment = path_part.split('/').any(|seg| {
        let decoded = percent_decode_str(seg).decode_utf8_lossy();
        decoded == "." || decoded == ".."
    });
    if dot_segment {
        return Err(invalid());
    }

    let mut encoded = utf8_percent_encode(path_part, PATH_ENCODE_SET).to_string();
    if let Some(q) = query {
        encoded.push('?');
        encoded.extend(utf8_percent_encode(q, QUERY_ENCODE_SET));
    }
    Ok(encoded)
}

// 每个`%`后面必须跟两位十六进制数字
fn valid_escapes(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let ok = bytes
                .get(i + 1..i + 3)
                .is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit));
            if !ok {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

pub fn action_header(action: &str) -> String {
    format!("version=1&action={action}")
}

pub fn auth_data_header(timestamp: i64, nonce: u32, key_name: &str) -> String {
    format!("5, 0.0.0.0, 0.0.0.0, {timestamp}, {nonce}, {key_name}")
}

// auth data和path之间没有分隔符
pub fn signing_payload(auth_data: &str, path: &str, action_header: &str) -> String {
    format!("{auth_data}{path}\nx-akamai-acs-action:{action_header}\n")
}

/// base64(HMAC-SHA256(key, payload))，key按原始字节使用
pub fn sign(key: &[u8], payload: &str) -> Result<String, Error> {
    let mac = sign_hmac_sha256(key, payload.as_bytes()).map_err(|e| Error::Signing(e.to_string()))?;
    Ok(general_purpose::STANDARD.encode(mac))
}

/// 生成一次请求需要的所有签名header，时间戳和随机数每次都从`auth_source`重新获取
pub fn encode(
    action: &str,
    path: &str,
    key_name: &str,
    key: &[u8],
    auth_source: &dyn AuthSource,
) -> Result<CanonicalRequest, Error> {
    let path = canonical_path(path)?;
    let action = action_header(action);
    let auth_data = auth_data_header(auth_source.unix_timestamp(), auth_source.nonce(), key_name);
    let signature = sign(key, &signing_payload(&auth_data, &path, &action))?;

    Ok(CanonicalRequest {
        path,
        action,
        auth_data,
        signature,
    })
}
