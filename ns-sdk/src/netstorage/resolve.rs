//! 响应体处理：下载写入本地文件，其它情况读取为文本

use super::error::{ArgumentError, Error};
use super::operation::ResponseKind;
use super::transport::ByteStream;
use bytes::Bytes;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub(crate) const DOWNLOAD_DONE: &str = "Download done";

pub(crate) async fn resolve(
    kind: &ResponseKind,
    remote_path: &str,
    status: StatusCode,
    body: ByteStream,
    cancellation: &CancellationToken,
) -> Result<String, Error> {
    match kind {
        ResponseKind::Download { destination } if status == StatusCode::OK => {
            let target = download_destination(remote_path, destination.as_deref()).await?;
            let written = download_to_file(&target, body, cancellation).await?;
            debug!(destination = %target.display(), bytes = written, "download done");
            Ok(DOWNLOAD_DONE.to_owned())
        }
        _ => read_text(body, cancellation).await,
    }
}

/// 远程path的文件名，如`/cpcode/dir/report.txt` -> `report.txt`
pub(crate) fn base_name(remote_path: &str) -> Result<&str, Error> {
    let name = remote_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    if name.is_empty() {
        return Err(ArgumentError::InvalidPath(remote_path.to_owned()).into());
    }
    Ok(name)
}

// - 没有指定destination：当前目录下的同名文件
// - destination是已存在的目录：该目录下的同名文件
// - 其它：直接作为文件路径
async fn download_destination(
    remote_path: &str,
    destination: Option<&Path>,
) -> Result<PathBuf, Error> {
    let file_name = base_name(remote_path)?;
    let Some(dest) = destination.filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(PathBuf::from(file_name));
    };
    match tokio::fs::metadata(dest).await {
        Ok(meta) if meta.is_dir() => Ok(dest.join(file_name)),
        _ => Ok(dest.to_path_buf()),
    }
}

// 失败或取消时删除已写入的部分文件
async fn download_to_file(
    target: &Path,
    mut body: ByteStream,
    cancellation: &CancellationToken,
) -> Result<u64, Error> {
    let mut file = tokio::fs::File::create(target).await?;

    let res = async {
        let mut written = 0u64;
        while let Some(chunk) = next_chunk(&mut body, cancellation).await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok::<u64, Error>(written)
    }
    .await;
    drop(file);

    if res.is_err() {
        if let Err(e) = tokio::fs::remove_file(target).await {
            warn!(destination = %target.display(), error = %e, "failed to remove partial download");
        }
    }
    res
}

async fn read_text(mut body: ByteStream, cancellation: &CancellationToken) -> Result<String, Error> {
    let mut buf = Vec::new();
    while let Some(chunk) = next_chunk(&mut body, cancellation).await? {
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

async fn next_chunk(
    body: &mut ByteStream,
    cancellation: &CancellationToken,
) -> Result<Option<Bytes>, Error> {
    tokio::select! {
        biased;
        _ = cancellation.cancelled() => Err(Error::Cancelled),
        chunk = body.next() => chunk.transpose(),
    }
}
