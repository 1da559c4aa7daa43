use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderName, HeaderValue};

use crate::error::ImproveError;

use super::{DynHttpTransport, HttpRequest, HttpResponse, HttpTransport};

/// 基于 reqwest 的默认 HttpTransport
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// 使用自定义 reqwest::Client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 创建默认配置 不设置超时
    pub fn default_client() -> Result<Self, ImproveError> {
        Client::builder().build().map(Self::new).map_err(|err| {
            ImproveError::transport(format!("failed to create reqwest client: {err}"))
        })
    }

    /// 整个请求的超时由调用方环境决定
    pub fn with_timeout(timeout: Duration) -> Result<Self, ImproveError> {
        Client::builder()
            .timeout(timeout)
            .build()
            .map(Self::new)
            .map_err(|err| {
                ImproveError::transport(format!("failed to create reqwest client: {err}"))
            })
    }

    fn build_request(&self, request: HttpRequest) -> Result<reqwest::RequestBuilder, ImproveError> {
        let mut builder = self.client.post(&request.url);

        for (name, value) in request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| ImproveError::transport(format!("invalid header name: {err}")))?;
            let header_value = HeaderValue::from_str(&value).map_err(|err| {
                ImproveError::transport(format!("invalid header value for {header_name}: {err}"))
            })?;
            builder = builder.header(header_name, header_value);
        }

        Ok(builder.body(request.body))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ImproveError> {
        let url = request.url.clone();
        let response = self
            .build_request(request)?
            .send()
            .await
            .map_err(|err| ImproveError::transport(err.to_string()))?;

        let status = response.status().as_u16();
        tracing::debug!(%url, status, "provider responded");
        let body = response
            .bytes()
            .await
            .map_err(|err| ImproveError::transport(err.to_string()))?
            .to_vec();

        Ok(HttpResponse { status, body })
    }
}

/// 便捷构造线程安全 Transport
pub fn default_dyn_transport(timeout: Option<Duration>) -> Result<DynHttpTransport, ImproveError> {
    let transport = match timeout {
        Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
        None => ReqwestTransport::default_client()?,
    };
    Ok(Arc::new(transport))
}
