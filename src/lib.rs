pub mod api;
pub mod config;
pub mod core;

/// 安装 env_logger，输出到 stdout；默认 info，可用 RUST_LOG 覆盖。重复调用无副作用
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format_target(false)
        .try_init();
}
