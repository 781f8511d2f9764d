//! kiln CLI entry point; logging is configured by `cli::run` once flags are parsed.

fn main() {
    kiln::cli::run();
}
