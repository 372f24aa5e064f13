use env_logger::{Builder, Env};
use log::error;

fn init_logger() {
    // Уровень из RUST_LOG, по умолчанию info.
    // Пример: RUST_LOG=snipvault=debug snipvault list --path ./vault
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = snipvault::cli::run() {
        error!("{:?}", e);
        std::process::exit(1);
    }
}
