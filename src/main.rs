//! Kodegen Bundler Assets - content-addressed asset bundler.
//!
//! This binary builds one script or stylesheet artifact per invocation and
//! prints its name (or markup) for templates to reference.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match kodegen_bundler_assets::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for path in e.failed_sources() {
                eprintln!("  unreadable: {}", path.display());
            }
            1
        }
    };

    process::exit(exit_code);
}
