use crate::credentials::CredentialsError;
use reqwest::StatusCode;

/// 参数错误，在签名和发送请求之前返回
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("invalid netstorage path: {0}")]
    InvalidPath(String),
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    #[error("invalid request header: {0}")]
    InvalidHeader(String),
    #[error("netstorage download path shouldn't be a directory: {0}")]
    DownloadDirectory(String),
    #[error("local source does not exist: {0}")]
    MissingSource(String),
    #[error("you should upload a file, not {0}")]
    NotAFile(String),
    #[error("destination path should not be a directory: {0}")]
    ContentDestinationDirectory(String),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
    #[error("io error: {0}")]
    IO(#[from] std::io::Error),
    #[error("signing error: {0}")]
    Signing(String),
    #[error("transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
    #[error("request cancelled")]
    Cancelled,
    #[error("credentials error: {0}")]
    Credentials(#[from] CredentialsError),
    /// 已经收到响应，但读取或保存响应体失败；`status`为服务器返回的状态码
    #[error("failed to resolve response body, status: {status}, error: {source}")]
    Resolve {
        status: StatusCode,
        #[source]
        source: Box<Error>,
    },
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(Box::new(e))
    }
}

impl Error {
    /// 如果错误发生在收到响应之后，返回响应的状态码
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Resolve { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            Error::Cancelled => true,
            Error::Resolve { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}
