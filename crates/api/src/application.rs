// 引入标准库：
// `Path`: 文件路径处理。
use std::path::Path;

// 仅在 Unix 系统下引入文件系统模块，用于处理 Unix Domain Socket 文件。
#[cfg(unix)]
use std::fs;

// 引入 actix-web 框架组件：
// `middleware::Logger`: HTTP 请求日志中间件。
// `web`: 路由配置和数据提取。
// `App`: 应用程序构造器。
// `HttpServer`: HTTP 服务器。
use actix_web::{middleware::Logger, web, App, HttpServer};

// 引入领域层配置和服务：
// `AdminConfig`: 网关服务配置。
// `resolve_base_url` / `ServiceKind`: 下游服务地址解析。
// `init_telemetry`: 初始化遥测。
use pupero_admin_domain::config::{AdminConfig, ConfigError};
use pupero_admin_domain::services::telemetry::{init_telemetry, TelemetryConfig, TelemetryError};
use pupero_admin_domain::{resolve_base_url, ServiceKind};
// 引入错误宏。
use thiserror::Error;
use tracing::info;

// 引入内部模块：
// 处理函数 handlers。
// 应用状态 AppState。
use crate::{
    handlers::{
        drain_queue_handler, health_handler, metrics_handler, queue_stats_handler,
        user_addresses_handler, user_balance_handler,
    },
    state::AppState,
};

// 注册对外代理路由。
// 测试代码复用同一张路由表，保证测试覆盖的就是线上暴露的接口。
pub(crate) fn configure_proxy_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(health_handler))
        .route("/health", web::get().to(health_handler))
        .route("/user/{user_id}/balance", web::get().to(user_balance_handler))
        .route(
            "/user/{user_id}/addresses",
            web::get().to(user_addresses_handler),
        )
        .route("/queue", web::get().to(queue_stats_handler))
        .route("/drain", web::post().to(drain_queue_handler));
}

// 应用程序启动入口函数。
// 返回 `Result<(), BootstrapError>`。
pub async fn run() -> Result<(), BootstrapError> {
    // 1. 加载配置
    let config = AdminConfig::load_from_env()?;

    // 2. 初始化遥测 (Telemetry)
    // 根据 "ADMIN" 前缀的环境变量配置遥测。
    let telemetry_config = TelemetryConfig::from_env("ADMIN");
    let telemetry = init_telemetry(&telemetry_config)?;

    // 3. 解析两个下游服务的基础地址
    // 启动时解析一次并缓存，之后所有请求只读。
    let transactions_base = resolve_base_url(
        config.transactions_service_url(),
        ServiceKind::Transactions,
    );
    let monero_base = resolve_base_url(config.monero_service_url(), ServiceKind::Monero);
    info!(
        transactions = %transactions_base,
        monero = %monero_base,
        "resolved downstream base urls"
    );

    // 4. 构建共享 HTTP 客户端
    // 超时按路由在每次请求上单独设置，客户端本身不带全局超时。
    let client = reqwest::Client::builder()
        .build()
        .map_err(|err| BootstrapError::HttpClient(err.to_string()))?;

    // 5. 构建应用状态
    // 将两个基础地址、HTTP 客户端和遥测守卫组合成 AppState。
    let state = AppState::new(transactions_base, monero_base, client, telemetry);

    // 判断是否在公共接口上暴露指标端点。
    // 如果配置了内部监听器（Internal Listener），则只在内部接口暴露指标，公共接口不暴露。
    let include_metrics_on_public = !config.has_internal_listener();

    // 克隆 state 用于公共服务器闭包。
    let public_state = state.clone();

    // 6. 配置并创建公共 HTTP 服务器 (Public Server)
    // `move ||` 闭包会在每个 worker 线程中执行，构建 App 实例。
    let mut public_server = HttpServer::new(move || {
        let mut app = App::new()
            // 注入共享状态数据
            .app_data(web::Data::new(public_state.clone()))
            // 添加日志中间件
            .wrap(Logger::default())
            // 注册健康检查和四条代理路由
            .configure(configure_proxy_routes);

        // 如果需要在公共接口暴露指标，注册 /metrics 路由。
        if include_metrics_on_public {
            app = app.route("/metrics", web::get().to(metrics_handler));
        }

        app
    });

    // 绑定公共服务器地址。
    // Unix 系统下支持 Unix Domain Socket (UDS)。
    #[cfg(unix)]
    {
        if let Some(socket) = config.unix_socket() {
            // 如果配置了 UDS，先清理可能存在的旧 socket 文件。
            cleanup_socket(socket)?;
            public_server = public_server.bind_uds(socket)?;
        } else {
            // 否则绑定 TCP 地址。
            public_server = public_server.bind(config.bind_address())?;
        }
    }

    // 非 Unix 系统（如 Windows）不支持 UDS。
    #[cfg(not(unix))]
    {
        if let Some(socket) = config.unix_socket() {
            return Err(BootstrapError::Io(std::io::Error::other(format!(
                "unix socket '{socket}' requested but this platform does not support it"
            ))));
        }
        public_server = public_server.bind(config.bind_address())?;
    }

    // 运行公共服务器（非阻塞，返回 Server 句柄）。
    let public_server = public_server.run();

    // 7. 配置并创建内部 HTTP 服务器 (Internal Server) - 可选
    // 内部服务器只承载监控指标，不向公网暴露。
    let internal_server = if config.has_internal_listener() {
        let internal_state = state.clone();
        let mut internal_server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(internal_state.clone()))
                .wrap(Logger::default())
                // 内部接口始终暴露指标
                .route("/metrics", web::get().to(metrics_handler))
        });

        #[cfg(unix)]
        {
            if let Some(socket) = config.internal_unix_socket() {
                cleanup_socket(socket)?;
                internal_server = internal_server.bind_uds(socket)?;
            } else if let Some(addr) = config.internal_bind_address() {
                internal_server = internal_server.bind(addr)?;
            } else {
                return Err(BootstrapError::Io(std::io::Error::other(
                    "internal listener configured but no bind target provided",
                )));
            }
        }

        #[cfg(not(unix))]
        {
            if let Some(socket) = config.internal_unix_socket() {
                return Err(BootstrapError::Io(std::io::Error::other(format!(
                    "internal unix socket '{socket}' requested but this platform does not support it"
                ))));
            }
            if let Some(addr) = config.internal_bind_address() {
                internal_server = internal_server.bind(addr)?;
            } else {
                return Err(BootstrapError::Io(std::io::Error::other(
                    "internal listener configured but no bind target provided",
                )));
            }
        }

        Some(internal_server.run())
    } else {
        None
    };

    // 8. 并发运行服务器
    if let Some(internal) = internal_server {
        // 如果开启了内部服务器，使用 `try_join!` 同时等待两个服务器运行。
        // 任何一个出错都会导致整体退出。
        tokio::try_join!(public_server, internal)?;
    } else {
        // 否则只等待公共服务器。
        public_server.await?;
    }

    Ok(())
}

// 定义启动过程中的错误枚举。
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to build http client: {0}")]
    HttpClient(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// 辅助函数：清理 Unix Socket 文件。
// 如果 socket 文件已存在（例如上次非正常退出遗留），bind 会失败，所以需要先删除。
#[cfg(unix)]
fn cleanup_socket(path: &str) -> std::io::Result<()> {
    let socket_path = Path::new(path);
    if socket_path.exists() {
        fs::remove_file(socket_path)?;
    }
    Ok(())
}

// 非 Unix 系统的空实现。
#[cfg(not(unix))]
fn cleanup_socket(_path: &str) -> std::io::Result<()> {
    Ok(())
}

// 单元测试模块。
#[cfg(test)]
mod tests {
    // 测试 cleanup_socket 功能。
    #[cfg(unix)]
    #[actix_web::test]
    async fn cleanup_socket_removes_stale_file() {
        use super::cleanup_socket;

        // 创建一个唯一的临时文件路径。
        let path = std::env::temp_dir().join(format!(
            "pupero-admin-test-{}-{}.sock",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::SystemTime::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        // 创建一个伪造的 socket 文件。
        std::fs::write(&path, b"stub").expect("write socket file");
        // 调用清理函数。
        cleanup_socket(path.to_str().unwrap()).expect("cleanup succeeds");
        // 断言文件已被删除。
        assert!(!path.exists());
    }
}
