//! # Staticpages CLI
//!
//! A thin command-line client over a file-backed page store. This file only
//! invokes `cli::run()` and turns errors into an exit status; everything else
//! lives in `src/cli/`.
//!
//! ## Workspace Structure
//!
//! - `crates/staticpages/`: the UI-agnostic library
//! - `crates/staticpages-cli/`: this binary
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/staticpages-cli/src/cli/)                │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Config, logging and API wiring, dispatch (commands.rs)   │
//! │  - Terminal and JSON rendering (render.rs)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/staticpages/src/api.rs)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CLI is the only place that writes to stdout/stderr or decides exit
//! codes. Validation failures print one `field: message (params)` line each.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", cli::render::render_error(&e));
        std::process::exit(1);
    }
}
