fn main() {
    if let Err(err) = sigil::cli::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
