//! Browser module for the kfit page.
//!
//! On load it greets once, binds the `#draw` form to an asynchronous
//! `POST /draw`, and wires `#fitplot` to an in-browser k-means fit.
//!
//! Only the host-testable [`binder`] is built by default, so the workspace
//! builds on native targets without a wasm toolchain. Enable the real module
//! with `--features web` on `wasm32-unknown-unknown`, e.g.
//! `wasm-pack build crates/kfit_web --target web --out-dir ../../www/pkg -- --features web`.

pub mod binder;
pub mod form_fields;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::{fit, fit_draw, greet, start};
