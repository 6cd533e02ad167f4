//! # Wish CLI
//!
//! A terminal display layer for `wishapp`. The binary is thin: everything
//! lives in `src/cli/`, and this file only calls `cli::run()` and turns an error
//! into an exit code.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/wish/src/cli/)                           │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring, dispatch, watch loop (commands.rs)       │
//! │  - Terminal output with colored/timeago (render.rs)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  wishapp::api::WishApi → commands → WishStore               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logging goes to stderr through `tracing-subscriber`; `RUST_LOG` is honored and
//! `-v` switches to debug output.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
