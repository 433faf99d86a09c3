//! # Block Sandbox Entry Point
//!
//! Native entry point. It calls into the library's `run()` function; for the
//! web build see `run_web()` in the library.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    #[cfg(not(target_family = "wasm"))]
    {
        if let Err(err) = block_sandbox::run() {
            log::error!("{err}");
            eprintln!("block-sandbox: {err}");
            std::process::exit(1);
        }
    }
}
