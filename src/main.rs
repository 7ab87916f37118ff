fn main() {
    if let Err(code) = procsynth::cli::run() {
        std::process::exit(code.as_i32());
    }
}
