fn main() {
    if let Err(e) = factcheck_lib::run() {
        tracing::error!("Fatal: {e}");
        eprintln!("factcheck: {e}");
        std::process::exit(1);
    }
}
