#![forbid(unsafe_code)]
#![warn(
    unused,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Browser entry point. Native builds only print how to serve the console.

#[cfg(target_arch = "wasm32")]
fn main() {
    marquee_ui::run_app();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use std::io::Write;

    writeln!(std::io::stderr().lock(), "{}", native_hint())
}

#[cfg(not(target_arch = "wasm32"))]
fn native_hint() -> String {
    format!(
        "marquee-ui targets wasm32: run `trunk serve` in crates/marquee-ui \
         (set MARQUEE_API_BASE_URL to override {})",
        marquee_session::DEFAULT_API_URL
    )
}
