use super::Client;
use super::error::{ArgumentError, Error};
use super::operation::{BodySource, Operation};
use super::resolve::resolve;
use super::sign::{ACTION_HEADER, AUTH_DATA_HEADER, AUTH_SIGN_HEADER, encode};
use super::transport::{ByteStream, TransportRequest, TransportResponse};
use ns_sdk_common::helper::into_header_map;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use std::future::Future;
use tokio::io::AsyncRead;
use tokio_stream::StreamExt;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::{Position, Url};

pub(crate) const USER_AGENT: &str = concat!("NetStorageKit-Rust/", env!("CARGO_PKG_VERSION"));

/// api调用的结果
///
/// - `body`：下载成功时为`"Download done"`，其它情况为完整的响应体文本
/// - 状态码不会被解释，例如404、403需要调用者根据`status`自行判断
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

pub(crate) async fn dispatch(client: &Client, operation: Operation) -> Result<Response, Error> {
    let action = operation.action.clone();
    let path = operation.path.clone();

    let res = send(client, operation).await;
    if let Err(e) = &res {
        if e.is_cancelled() {
            warn!(%action, %path, "netstorage request cancelled");
        }
    }
    res
}

async fn send(client: &Client, operation: Operation) -> Result<Response, Error> {
    let Operation {
        action,
        method,
        path,
        body,
        response,
        cancellation,
    } = operation;

    let creds = &client.credentials;
    // path不合法时在这里返回，不会有任何io
    let canonical = encode(
        &action,
        &path,
        creds.key_name(),
        creds.key(),
        client.auth_source.as_ref(),
    )?;
    let url_str = format!(
        "{}://{}{}",
        creds.scheme().as_str(),
        creds.hostname(),
        canonical.path
    );
    let url = Url::parse(&url_str)
        .map_err(|e| ArgumentError::InvalidUrl(format!("{url_str}: {e}")))?;
    // 请求的path必须和签名的path完全一致
    if url[Position::BeforePath..] != canonical.path {
        return Err(ArgumentError::InvalidPath(path.clone()).into());
    }
    let headers = into_header_map([
        (ACTION_HEADER, canonical.action.as_str()),
        (AUTH_DATA_HEADER, canonical.auth_data.as_str()),
        (AUTH_SIGN_HEADER, canonical.signature.as_str()),
        ("Accept-Encoding", "identity"),
        ("User-Agent", USER_AGENT),
    ])
    .map_err(|e| ArgumentError::InvalidHeader(e.to_string()))?;

    let body = cancellable(&cancellation, open_body(body)).await?;

    debug!(%method, %url, %action, "send netstorage request");
    let request = TransportRequest {
        method,
        url,
        headers,
        body,
    };
    let TransportResponse {
        status,
        headers,
        body,
    } = cancellable(&cancellation, client.transport.execute(request)).await?;

    debug!(%status, %action, "resolve netstorage response");
    // 响应体在resolve中读完或随之drop
    let body = resolve(&response, &path, status, body, &cancellation)
        .await
        .map_err(|e| Error::Resolve {
            status,
            source: Box::new(e),
        })?;

    Ok(Response {
        status,
        headers,
        body,
    })
}

async fn cancellable<T>(
    cancellation: &CancellationToken,
    fut: impl Future<Output = Result<T, Error>>,
) -> Result<T, Error> {
    tokio::select! {
        biased;
        _ = cancellation.cancelled() => Err(Error::Cancelled),
        res = fut => res,
    }
}

async fn open_body(body: BodySource) -> Result<Option<ByteStream>, Error> {
    match body {
        BodySource::None => Ok(None),
        BodySource::Reader(reader) => Ok(Some(into_byte_stream(reader))),
        BodySource::LocalFile(path) => {
            let file = tokio::fs::File::open(&path).await?;
            Ok(Some(into_byte_stream(file)))
        }
    }
}

fn into_byte_stream<R: AsyncRead + Send + 'static>(reader: R) -> ByteStream {
    Box::pin(ReaderStream::new(reader).map(|item| item.map_err(Error::from)))
}
