//! fisk CLI entry point.

#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

fn main() {
    match fisk::run() {
        Ok(()) => {}
        Err(fisk::Error::Interrupted) => std::process::exit(130), // 128 + SIGINT(2)
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
