//! # quadframe
//!
//! Fill four image slots, tune each one's tones, and export them as a single
//! 2x2 grid.
//!
//! # Model
//!
//! ```text
//! raw bytes ──decode──▶ crop to 16:9 ──▶ slot image ──tone adjust──▶ displayed image
//!                                                                         │
//!                     slot 0 │ slot 1                                     │
//!                     ───────┼───────   ◀────────── compose ──────────────┘
//!                     slot 2 │ slot 3
//! ```
//!
//! Each of the four slots keeps the cropped image, the identifier it came
//! from, and an [`Adjustment`](imaging::Adjustment). The displayed image is
//! always recomputed from the first and last of those. Slots can be exchanged
//! wholesale (image, identifier and adjustment move together), and the grid
//! compositor places the displayed images in slot order for both the preview
//! and the export.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Pure image operations: aspect crop, tone adjustment, grid composition |
//! | [`slot`] | One slot: state, invariants, load and clear |
//! | [`store`] | The four slots and the swap protocol |
//! | [`shared`] | Mutex-per-slot store for concurrent callers |
//! | [`payload`] | Textual drag payload `slot|source|exposure|shadow|highlight` |
//! | [`naming`] | Export filenames derived from slot sources |
//! | [`export`] | JPEG export and PNG preview writing |
//! | [`session`] | JSON session persistence and replay for the CLI |
//! | [`config`] | `quadframe.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Center Crop on Load
//!
//! Cropping happens once, when bytes enter a slot. Everything downstream
//! (adjustment, composition, export) works on images that already have the
//! target aspect ratio, so the compositor only ever scales.
//!
//! ## Lookup-Table Tone Curve
//!
//! The tone transform depends on nothing but the channel value and the three
//! adjustment values, so it is evaluated once per possible byte into a
//! 256-entry table and applied to the pixel buffer in parallel with `rayon`.
//!
//! ## Sessions Instead of a Running Process
//!
//! The CLI is stateless between invocations. Slot contents live in a JSON
//! session file holding sources and adjustments only; opening it replays the
//! loads, so derived images are never persisted.

pub mod config;
pub mod export;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod payload;
pub mod session;
pub mod shared;
pub mod slot;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
