//! NetStorage的各个api
//!
//! 所有api都按`client.xxx(..).send().await`的方式调用，可选`.cancellation(token)`。

use super::Client;
use super::dispatch::{Response, dispatch};
use super::error::{ArgumentError, Error};
use super::operation::{BodySource, Operation, ResponseKind};
use bon::bon;
use reqwest::Method;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

// 与query参数相同的编码方式：`/` -> `%2F`，空格 -> `+`
fn query_escape(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[bon]
impl Client {
    /// 目录列表，响应体为xml
    #[builder(finish_fn = send)]
    pub async fn dir(
        &self,
        #[builder(start_fn)] path: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        let op = Operation::new("dir&format=xml", Method::GET, path, cancellation);
        dispatch(self, op).await
    }

    /// 下载文件，成功时`body`为`"Download done"`
    ///
    /// - `path`：不能以`/`结尾，不能下载目录
    /// - `destination`：本地路径。不设置时保存到当前目录下的同名文件；
    ///   如果是已存在的目录，保存到该目录下的同名文件；否则直接作为文件路径
    ///
    /// 状态码不为200时不会创建本地文件，`body`为响应体文本
    #[builder(finish_fn = send)]
    pub async fn download(
        &self,
        #[builder(start_fn)] path: &str,
        #[builder(into)] destination: Option<PathBuf>,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        if path.ends_with('/') {
            return Err(ArgumentError::DownloadDirectory(path.to_owned()).into());
        }

        let op = Operation::new("download", Method::GET, path, cancellation)
            .response(ResponseKind::Download { destination });
        dispatch(self, op).await
    }

    /// 目录的磁盘使用情况，响应体为xml
    #[builder(finish_fn = send)]
    pub async fn du(
        &self,
        #[builder(start_fn)] path: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        let op = Operation::new("du&format=xml", Method::GET, path, cancellation);
        dispatch(self, op).await
    }

    #[builder(finish_fn = send)]
    pub async fn stat(
        &self,
        #[builder(start_fn)] path: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        let op = Operation::new("stat&format=xml", Method::GET, path, cancellation);
        dispatch(self, op).await
    }

    /// 创建空目录
    #[builder(finish_fn = send)]
    pub async fn mkdir(
        &self,
        #[builder(start_fn)] path: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        let op = Operation::new("mkdir", Method::POST, path, cancellation);
        dispatch(self, op).await
    }

    /// 删除空目录
    #[builder(finish_fn = send)]
    pub async fn rmdir(
        &self,
        #[builder(start_fn)] path: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        let op = Operation::new("rmdir", Method::POST, path, cancellation);
        dispatch(self, op).await
    }

    /// 修改mtime，`mtime`为Unix时间戳（秒）
    #[builder(finish_fn = send)]
    pub async fn mtime(
        &self,
        #[builder(start_fn)] path: &str,
        #[builder(start_fn)] mtime: i64,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        let action = format!("mtime&format=xml&mtime={mtime}");
        let op = Operation::new(action, Method::POST, path, cancellation);
        dispatch(self, op).await
    }

    /// 删除文件或符号链接
    #[builder(finish_fn = send)]
    pub async fn delete(
        &self,
        #[builder(start_fn)] path: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        let op = Operation::new("delete", Method::POST, path, cancellation);
        dispatch(self, op).await
    }

    /// 递归删除整个目录，需要账户在该CP Code上开通了quick-delete权限
    #[builder(finish_fn = send)]
    pub async fn quick_delete(
        &self,
        #[builder(start_fn)] path: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        let op = Operation::new(
            "quick-delete&quick-delete=imreallyreallysure",
            Method::POST,
            path,
            cancellation,
        );
        dispatch(self, op).await
    }

    /// 重命名文件或符号链接
    #[builder(finish_fn = send)]
    pub async fn rename(
        &self,
        #[builder(start_fn)] target: &str,
        #[builder(start_fn)] destination: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        let action = format!("rename&destination={}", query_escape(destination));
        let op = Operation::new(action, Method::POST, target, cancellation);
        dispatch(self, op).await
    }

    /// 在`destination`创建指向`target`的符号链接
    #[builder(finish_fn = send)]
    pub async fn symlink(
        &self,
        #[builder(start_fn)] target: &str,
        #[builder(start_fn)] destination: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        let action = format!("symlink&target={}", query_escape(target));
        let op = Operation::new(action, Method::POST, destination, cancellation);
        dispatch(self, op).await
    }

    /// 上传本地文件
    ///
    /// - `local_source`：必须是普通文件，不能上传目录
    /// - `destination`：以`/`结尾时自动拼接本地文件名
    #[builder(finish_fn = send)]
    pub async fn upload(
        &self,
        #[builder(start_fn)] local_source: &Path,
        #[builder(start_fn)] destination: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error> {
        let meta = tokio::fs::metadata(local_source)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::from(ArgumentError::MissingSource(
                    local_source.display().to_string(),
                )),
                _ => Error::IO(e),
            })?;
        if !meta.is_file() {
            return Err(ArgumentError::NotAFile(local_source.display().to_string()).into());
        }

        let mut destination = destination.to_owned();
        if destination.ends_with('/') {
            if let Some(name) = local_source.file_name() {
                destination.push_str(&name.to_string_lossy());
            }
        }

        let op = Operation::new("upload", Method::PUT, destination, cancellation)
            .body(BodySource::LocalFile(local_source.to_path_buf()));
        dispatch(self, op).await
    }

    /// 直接上传`content`中的内容，`destination`不能以`/`结尾
    #[builder(finish_fn = send)]
    pub async fn upload_content<R>(
        &self,
        #[builder(start_fn)] content: R,
        #[builder(start_fn)] destination: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<Response, Error>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        if destination.ends_with('/') {
            return Err(ArgumentError::ContentDestinationDirectory(destination.to_owned()).into());
        }

        let op = Operation::new("upload", Method::PUT, destination, cancellation)
            .body(BodySource::Reader(Box::new(content)));
        dispatch(self, op).await
    }
}

#[test]
fn query_escape_test() {
    assert_eq!(query_escape("/a/new file.txt"), "%2Fa%2Fnew+file.txt");
    assert_eq!(query_escape("/a/b&c=d"), "%2Fa%2Fb%26c%3Dd");
}
