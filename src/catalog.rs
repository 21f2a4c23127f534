//! 静态 Redfish 资源树：服务根、更新服务与固件清单。

use axum::extract::Extension;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{
    FIRMWARE_BIOS_PATH, FIRMWARE_BMC_PATH, FIRMWARE_INVENTORY_PATH, FIRMWARE_PUSH_PATH,
    SERVICE_ROOT_PATH, UPDATE_SERVICE_PATH,
};
use crate::http::json_response;

/// 启动时构建、此后只读的资源文档表。
#[derive(Debug)]
pub struct ResourceCatalog {
    documents: HashMap<&'static str, Value>,
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceCatalog {
    pub fn new() -> Self {
        let documents = HashMap::from([
            (SERVICE_ROOT_PATH, service_root()),
            (UPDATE_SERVICE_PATH, update_service()),
            (FIRMWARE_INVENTORY_PATH, firmware_inventory()),
            (FIRMWARE_BMC_PATH, firmware_bmc()),
            (FIRMWARE_BIOS_PATH, firmware_bios()),
        ]);
        Self { documents }
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.documents.get(path)
    }

    /// 所有已知路径，按字典序排列。
    pub fn paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<_> = self.documents.keys().copied().collect();
        paths.sort_unstable();
        paths
    }
}

fn service_root() -> Value {
    json!({
        "@odata.id": SERVICE_ROOT_PATH,
        "RedfishVersion": "1.6.0",
        "UUID": "92384634-2938-2342-8820-489239905423",
        "UpdateService": { "@odata.id": UPDATE_SERVICE_PATH },
    })
}

fn update_service() -> Value {
    json!({
        "@odata.id": UPDATE_SERVICE_PATH,
        "@odata.type": "#UpdateService.v1_8_0.UpdateService",
        "FirmwareInventory": { "@odata.id": FIRMWARE_INVENTORY_PATH },
        "HttpPushUri": FIRMWARE_PUSH_PATH,
        "HttpPushUriOptions": {
            "HttpPushUriApplyTime": {
                "ApplyTime": "Immediate",
            }
        },
        "HttpPushUriOptionsBusy": false,
        "ServiceEnabled": true,
    })
}

fn firmware_inventory() -> Value {
    json!({
        "@odata.id": FIRMWARE_INVENTORY_PATH,
        "@odata.type": "#SoftwareInventoryCollection.SoftwareInventoryCollection",
        "Members": [
            { "@odata.id": FIRMWARE_BMC_PATH },
            { "@odata.id": FIRMWARE_BIOS_PATH },
        ],
        "Members@odata.count": 2,
    })
}

fn firmware_bmc() -> Value {
    json!({
        "@odata.id": FIRMWARE_BMC_PATH,
        "@odata.type": "#SoftwareInventory.v1_2_3.SoftwareInventory",
        "Id": "BMC",
        "LowestSupportedVersion": "1.30.367a12-rev1",
        "Manufacturer": "Contoso",
        "Name": "Contoso BMC Firmware",
        "RelatedItem": [{ "@odata.id": "/redfish/v1/Managers/BMC" }],
        "ReleaseDate": "2017-08-22T12:00:00",
        "SoftwareId": "1624A9DF-5E13-47FC-874A-DF3AFF143089",
        "UefiDevicePaths": ["BMC(0x1,0x0ABCDEF)"],
        "Updateable": true,
        "Version": "1.45.455b66-rev4",
    })
}

fn firmware_bios() -> Value {
    json!({
        "@odata.id": FIRMWARE_BIOS_PATH,
        "@odata.type": "#SoftwareInventory.v1_2_3.SoftwareInventory",
        "Id": "BIOS",
        "LowestSupportedVersion": "P79 v1.10",
        "Manufacturer": "Contoso",
        "Name": "Contoso BIOS Firmware",
        "RelatedItem": [{ "@odata.id": "/redfish/v1/Systems/437XR1138R2" }],
        "ReleaseDate": "2017-12-06T12:00:00",
        "SoftwareId": "FEE82A67-6CE2-4625-9F44-237AD2402C28",
        "Updateable": true,
        "Version": "P79 v1.45",
    })
}

/// 按请求路径返回对应的静态文档。
pub async fn get_resource(
    Extension(catalog): Extension<Arc<ResourceCatalog>>,
    uri: Uri,
) -> Response {
    match catalog.get(uri.path()) {
        Some(document) => json_response(StatusCode::OK, document),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
