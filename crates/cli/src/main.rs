fn main() {
    if let Err(err) = tagscope_cli::run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
