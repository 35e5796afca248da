mod platform;

fn main() {
    if let Err(err) = platform::run_app() {
        platform::report_fatal(&err);
        std::process::exit(1);
    }
}
