//! HTTP 辅助工具：JSON 渲染、失败响应与 Location 构建。

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::error;

use crate::config::TASK_PATH;

/// 以四空格缩进序列化为 JSON 字节。
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// 构建带 `application/json` 类型的响应。
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match to_pretty_json(value) {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "failed to serialize response body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// 失败响应：无论调用方期望的状态码是什么，一律返回 401。
pub fn failure(msg: &str, _intended: StatusCode) -> Response {
    json_response(StatusCode::UNAUTHORIZED, &json!({ "msg": msg }))
}

/// 根据请求的 Host 头拼出任务监视器的绝对地址。
pub fn task_location(headers: &HeaderMap, fallback_host: &str) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback_host);
    format!("http://{host}{TASK_PATH}")
}
