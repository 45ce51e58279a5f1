use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = mod_manager_lib::cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
