//! 路由装配：按精确路径与方法分发到各处理器。

use axum::extract::{Extension, connect_info::ConnectInfo};
use axum::http::Request;
use axum::routing::{get, post};
use axum::{Router, middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info_span};

use crate::auth::{AuthConfig, auth_middleware};
use crate::catalog::{ResourceCatalog, get_resource};
use crate::config::{FIRMWARE_PUSH_PATH, SERVICE_ROOT_PATH, TASK_PATH};
use crate::task::{TaskProgressEngine, get_task};
use crate::upload::{PushConfig, firmware_push};

/// 服务启动时构建一次、由所有处理器共享的状态。
#[derive(Clone)]
pub struct MockState {
    pub catalog: Arc<ResourceCatalog>,
    pub auth: Arc<AuthConfig>,
    pub engine: Arc<TaskProgressEngine>,
    pub push: Arc<PushConfig>,
}

impl MockState {
    pub fn new(location_host: String) -> Self {
        Self {
            catalog: Arc::new(ResourceCatalog::new()),
            auth: Arc::new(AuthConfig::default()),
            engine: Arc::new(TaskProgressEngine::new()),
            push: Arc::new(PushConfig { location_host }),
        }
    }
}

/// 构建完整的 Redfish 模拟路由；只有服务根需要认证。
pub fn build_router(state: MockState) -> Router {
    let mut app = Router::new();
    for path in state.catalog.paths() {
        let handler = get(get_resource);
        app = if path == SERVICE_ROOT_PATH {
            app.route(path, handler.layer(middleware::from_fn(auth_middleware)))
        } else {
            app.route(path, handler)
        };
    }

    app.route(TASK_PATH, get(get_task))
        .route(FIRMWARE_PUSH_PATH, post(firmware_push))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let client_ip = request
                        .extensions()
                        .get::<ConnectInfo<SocketAddr>>()
                        .map(|ConnectInfo(addr)| addr.to_string())
                        .unwrap_or_else(|| "unknown".to_string());

                    info_span!(
                        env!("CARGO_CRATE_NAME"),
                        client_ip,
                        method = ?request.method(),
                        path = ?request.uri().path(),
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(Extension(state.catalog))
        .layer(Extension(state.auth))
        .layer(Extension(state.engine))
        .layer(Extension(state.push))
}
