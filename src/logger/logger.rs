use serde::Serialize;

#[derive(Serialize)]
pub struct LoggerExtraFields {
    pub request_id: String,
}

pub fn level_filter(level: &str) -> log::LevelFilter {
    match level {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    }
}

pub fn setup_logger(level: &str) {
    env_logger::builder()
        .filter_level(level_filter(level))
        .format_timestamp_micros()
        .format(ecs_logger::format)
        .target(env_logger::Target::Stdout)
        .init();
}
