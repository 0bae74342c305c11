use log::LevelFilter;

pub fn setup_logging() {
    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, LevelFilter::Info)
        // devtools traffic the driver does not understand is reported at error level
        .filter(Some("chromiumoxide"), LevelFilter::Off)
        .format_target(false);

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    }

    builder.init();
}
