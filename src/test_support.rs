//! 测试用的 multipart 推送表单构造器。

use axum::body::Body as AxumBody;
use axum::http::{Method, Request, header};
use serde_json::json;

use crate::config::FIRMWARE_PUSH_PATH;

pub const BOUNDARY: &str = "redfish-mock-boundary";

#[derive(Clone)]
pub struct PushForm {
    pub apply_time: &'static str,
    pub targets: Vec<&'static str>,
    pub filename: &'static str,
    pub payload: &'static [u8],
    /// 直接写入 `UpdateParameters` 的原始 JSON，覆盖上面的字段。
    pub raw_parameters: Option<&'static str>,
    pub include_parameters: bool,
    pub include_file: bool,
}

impl PushForm {
    pub fn valid() -> Self {
        Self {
            apply_time: "Immediate",
            targets: vec!["/redfish/v1/UpdateService/FirmwareInventory/BMC"],
            filename: "BMC Firmware.bin",
            payload: b"hello",
            raw_parameters: None,
            include_parameters: true,
            include_file: true,
        }
    }

    pub fn body(&self) -> Vec<u8> {
        let parameters = match self.raw_parameters {
            Some(raw) => raw.to_string(),
            None => json!({
                "Targets": self.targets,
                "@Redfish.OperationApplyTime": self.apply_time,
            })
            .to_string(),
        };
        let mut body = Vec::new();
        if self.include_parameters {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\n\
                     Content-Disposition: form-data; name=\"UpdateParameters\"\r\n\
                     Content-Type: application/json\r\n\r\n\
                     {parameters}\r\n"
                )
                .as_bytes(),
            );
        }
        if self.include_file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\n\
                     Content-Disposition: form-data; name=\"UpdateFile\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    self.filename
                )
                .as_bytes(),
            );
            body.extend_from_slice(self.payload);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    pub fn request(&self) -> Request<AxumBody> {
        Request::builder()
            .method(Method::POST)
            .uri(FIRMWARE_PUSH_PATH)
            .header(header::HOST, "localhost:4661")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(AxumBody::from(self.body()))
            .expect("push request")
    }
}
