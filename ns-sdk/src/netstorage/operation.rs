use reqwest::Method;
use std::path::PathBuf;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

/// 请求体的来源，reader和本地文件不能同时存在
pub(crate) enum BodySource {
    None,
    LocalFile(PathBuf),
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

/// 响应的处理方式
pub(crate) enum ResponseKind {
    Text,
    /// 状态码为200时写入本地文件，否则按`Text`处理
    Download { destination: Option<PathBuf> },
}

/// 一次api调用的描述，由各个api构建后交给dispatch
pub(crate) struct Operation {
    pub action: String,
    pub method: Method,
    pub path: String,
    pub body: BodySource,
    pub response: ResponseKind,
    pub cancellation: CancellationToken,
}

impl Operation {
    pub(crate) fn new(
        action: impl Into<String>,
        method: Method,
        path: impl Into<String>,
        cancellation: Option<CancellationToken>,
    ) -> Self {
        Self {
            action: action.into(),
            method,
            path: path.into(),
            body: BodySource::None,
            response: ResponseKind::Text,
            cancellation: cancellation.unwrap_or_default(),
        }
    }

    pub(crate) fn body(mut self, body: BodySource) -> Self {
        self.body = body;
        self
    }

    pub(crate) fn response(mut self, response: ResponseKind) -> Self {
        self.response = response;
        self
    }
}
