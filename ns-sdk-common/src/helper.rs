use crate::Error;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use sha2::Sha256;

/// 按给定顺序转换为`HeaderMap`，header的名称或值不合法时返回错误
pub fn into_header_map<'a>(
    headers: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::new();
    for (k, v) in headers {
        let name = HeaderName::from_bytes(k.as_bytes())
            .map_err(|e| Error::InvalidHeader(format!("{k}: {e}")))?;
        let value =
            HeaderValue::from_str(v).map_err(|e| Error::InvalidHeader(format!("{k}: {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// HMAC-SHA256，secret按原始字节使用
pub fn sign_hmac_sha256(secret: &[u8], str_to_sign: &[u8]) -> Result<Vec<u8>, Error> {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|e| Error::Common(e.to_string()))?;
    mac.update(str_to_sign);
    Ok(mac.finalize().into_bytes().to_vec())
}
