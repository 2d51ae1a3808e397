fn main() {
    if let Err(err) = labelscope::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
