//! 固件推送：multipart 解析、按序校验与任务复位。

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Extension, Multipart};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::Response;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{
    ACCEPTED_APPLY_TIME, ACCEPTED_FILENAME, ACCEPTED_PAYLOAD, ACCEPTED_TARGET, REPORTED_VERSION,
};
use crate::error::ApiError;
use crate::http::{json_response, task_location};
use crate::task::TaskProgressEngine;

const PARAMETERS_FIELD: &str = "UpdateParameters";
const FILE_FIELD: &str = "UpdateFile";

#[derive(Debug)]
pub struct PushConfig {
    pub location_host: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    ApplyTimeInvalid,
    TargetInvalid,
    FilenameInvalid,
    PayloadInvalid,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::ApplyTimeInvalid => "apply time is not Immediate",
            RejectReason::TargetInvalid => "first target is not the BMC inventory item",
            RejectReason::FilenameInvalid => "unexpected upload filename",
            RejectReason::PayloadInvalid => "unexpected upload payload",
        };
        f.write_str(text)
    }
}

/// 上传的固件文件。
#[derive(Debug)]
pub struct UploadFile {
    pub filename: String,
    pub payload: Bytes,
}

/// 单次推送请求中提取出的字段，仅在处理期间存在。
///
/// 字段类型不符或缺失都保留为空值，交给按序校验决定错误。
#[derive(Debug)]
pub struct PushRequest {
    pub apply_time: Option<String>,
    pub targets: Vec<String>,
    pub upload: Option<UploadFile>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ApprovedPush {
    #[serde(rename = "Version")]
    version: &'static str,
}

impl PushRequest {
    /// 从 multipart 表单读取 `UpdateParameters` 与 `UpdateFile`。
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut parameters: Option<Value> = None;
        let mut upload: Option<UploadFile> = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some(PARAMETERS_FIELD) => {
                    let text = field.text().await?;
                    parameters = Some(serde_json::from_str(&text)?);
                }
                Some(FILE_FIELD) => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let payload = field.bytes().await?;
                    upload = Some(UploadFile { filename, payload });
                }
                _ => {}
            }
        }

        let parameters = parameters
            .ok_or_else(|| ApiError::MalformedPush(format!("missing {PARAMETERS_FIELD} part")))?;
        Ok(Self::from_parameters(&parameters, upload))
    }

    fn from_parameters(parameters: &Value, upload: Option<UploadFile>) -> Self {
        let apply_time = parameters
            .get("@Redfish.OperationApplyTime")
            .and_then(Value::as_str)
            .map(str::to_owned);
        // 遇到第一个非字符串元素即截断，保证 targets[0] 仍对应原始首元素。
        let targets = parameters
            .get("Targets")
            .and_then(Value::as_array)
            .map(|targets| {
                targets
                    .iter()
                    .map_while(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            apply_time,
            targets,
            upload,
        }
    }
}

type PushCheck = fn(&PushRequest) -> Result<(), RejectReason>;

/// 校验顺序决定了畸形请求得到的错误。
const PUSH_CHECKS: [PushCheck; 4] = [
    check_apply_time,
    check_target,
    check_filename,
    check_payload,
];

fn check_apply_time(request: &PushRequest) -> Result<(), RejectReason> {
    match request.apply_time.as_deref() {
        Some(ACCEPTED_APPLY_TIME) => Ok(()),
        _ => Err(RejectReason::ApplyTimeInvalid),
    }
}

// 只检查第一个目标。
fn check_target(request: &PushRequest) -> Result<(), RejectReason> {
    match request.targets.first() {
        Some(target) if target == ACCEPTED_TARGET => Ok(()),
        _ => Err(RejectReason::TargetInvalid),
    }
}

fn check_filename(request: &PushRequest) -> Result<(), RejectReason> {
    match &request.upload {
        Some(upload) if upload.filename == ACCEPTED_FILENAME => Ok(()),
        _ => Err(RejectReason::FilenameInvalid),
    }
}

fn check_payload(request: &PushRequest) -> Result<(), RejectReason> {
    let payload = request.upload.as_ref().map(|upload| &upload.payload[..]);
    match payload.map(std::str::from_utf8) {
        Some(Ok(text)) if text == ACCEPTED_PAYLOAD => Ok(()),
        _ => Err(RejectReason::PayloadInvalid),
    }
}

/// 按序执行校验，遇到第一个失败即返回。
pub fn validate(request: &PushRequest) -> Result<ApprovedPush, RejectReason> {
    PUSH_CHECKS.iter().try_for_each(|check| check(request))?;
    Ok(ApprovedPush {
        version: REPORTED_VERSION,
    })
}

/// 推送接口：校验通过后复位任务进度并返回 202 与任务地址。
pub async fn firmware_push(
    Extension(engine): Extension<Arc<TaskProgressEngine>>,
    Extension(push): Extension<Arc<PushConfig>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let request = match multipart {
        Ok(multipart) => PushRequest::from_multipart(multipart).await,
        Err(rejection) => Err(rejection.into()),
    }
    .inspect_err(|err| {
        warn!(error = %err, "unreadable firmware push");
    })?;
    let filename = request
        .upload
        .as_ref()
        .map(|upload| upload.filename.as_str())
        .unwrap_or_default();
    let approved = validate(&request).inspect_err(|reason| {
        warn!(filename, reason = %reason, "firmware push rejected");
    })?;

    let location = task_location(&headers, &push.location_host);
    let location_value = HeaderValue::from_str(&location)
        .map_err(|_| ApiError::MalformedPush("invalid task location".into()))?;

    engine.reset().await;
    info!(
        filename,
        bytes = request.upload.as_ref().map_or(0, |upload| upload.payload.len()),
        location,
        "firmware push accepted"
    );
    let mut response = json_response(StatusCode::ACCEPTED, &approved);
    response.headers_mut().insert(header::LOCATION, location_value);
    Ok(response)
}
