//! CLI 参数与模拟服务常量。

use clap::Parser;
use shadow_rs::formatcp;

use crate::build;

const VERSION_INFO: &str = formatcp!(
    r#"{}\ncommit_hash: {}\nbuild_time: {}\nbuild_env: {},{}"#,
    build::PKG_VERSION,
    build::SHORT_COMMIT,
    build::BUILD_TIME,
    build::RUST_VERSION,
    build::RUST_CHANNEL
);

pub const AUTH_USER: &str = "username2";
pub const AUTH_PASS: &str = "password2";
pub const DEFAULT_HTTP_PORT: u16 = 4661;

pub const SERVICE_ROOT_PATH: &str = "/redfish/v1/";
pub const UPDATE_SERVICE_PATH: &str = "/redfish/v1/UpdateService";
pub const FIRMWARE_INVENTORY_PATH: &str = "/redfish/v1/UpdateService/FirmwareInventory";
pub const FIRMWARE_BMC_PATH: &str = "/redfish/v1/UpdateService/FirmwareInventory/BMC";
pub const FIRMWARE_BIOS_PATH: &str = "/redfish/v1/UpdateService/FirmwareInventory/BIOS";
pub const FIRMWARE_PUSH_PATH: &str = "/FWUpdate";

pub const TASK_ID: &str = "545";
pub const TASK_PATH: &str = "/redfish/v1/TaskService/Tasks/545";

pub const ACCEPTED_APPLY_TIME: &str = "Immediate";
pub const ACCEPTED_TARGET: &str = FIRMWARE_BMC_PATH;
pub const ACCEPTED_FILENAME: &str = "BMC Firmware.bin";
pub const ACCEPTED_PAYLOAD: &str = "hello";
pub const REPORTED_VERSION: &str = "P79 v1.45";

/// 模拟服务的命令行参数。
#[derive(Parser, Debug)]
#[command(
    name = "redfish-mock",
    version = VERSION_INFO,
    about = "Mock Redfish firmware update service"
)]
pub struct Args {
    #[arg(
        short = 'b',
        long,
        default_value = "0.0.0.0",
        help = "Bind address for HTTP"
    )]
    pub host: String,
    #[arg(
        short = 'p',
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        help = "HTTP port"
    )]
    pub port: u16,
    #[arg(
        long,
        help = "Host used in the task Location header when the request has no Host header"
    )]
    pub location_host: Option<String>,
}

impl Args {
    /// 推送响应中 Location 头的回退主机名。
    pub fn fallback_location_host(&self) -> String {
        self.location_host
            .clone()
            .unwrap_or_else(|| format!("localhost:{}", self.port))
    }
}
