//! # Asset Extractor
//!
//! Cut game assets out of a sprite sheet or screenshot. Mark rectangles on a
//! source image; each one is cropped, has its flat background keyed out to
//! transparency, is upscaled with a smoothing filter, and is encoded as PNG.
//! The results can be written one by one or bundled into a zip.
//!
//! # Architecture: One Pass Per Selection
//!
//! ```text
//! image bytes ──decode──► PixelBuffer ──► Selector (rectangles, in order)
//!                                               │
//!                     ┌─────────────────────────┘
//!                     ▼  for each rectangle i
//!    crop ──► remove_background ──► upscale(scale) ──► encode PNG
//!                                                          │
//!                                                          ▼
//!                                             Artifact asset_{i+1}.png
//!                                                          │
//!                                      export: PNG files, zip, manifest.json
//! ```
//!
//! Every stage takes an owned [`imaging::PixelBuffer`] and returns a new
//! one, so no two stages ever share a buffer. Only decode and encode touch a
//! codec, and they sit behind the [`imaging::ImageBackend`] trait so tests can
//! record calls and inject encode failures.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | The context object: source image, selections, scale, last run's artifacts |
//! | [`selection`] | Drag-to-select rectangles with a minimum size; selection files |
//! | [`process`] | Batch run over all selections with per-asset fallback |
//! | [`imaging`] | Pixel buffers, geometry, background keying, upscaling, PNG codec |
//! | [`archive`] | Zip bundling of artifacts |
//! | [`export`] | Writing PNGs, the archive and `manifest.json` to a directory |
//! | [`preview`] | Overlay rendering of selections for inspection |
//! | [`config`] | TOML config loading, merging and validation |
//! | [`naming`] | `asset_N.png` naming |
//! | [`types`] | Shared geometry types (`Point`, `Rectangle`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Corner-Sampled Background Key
//!
//! The background colour is whatever sits at the crop's top-left pixel, and
//! every pixel within a Manhattan RGB distance of 50 of it becomes
//! transparent. There is no flood fill: a matching colour inside the sprite is
//! keyed out too. This is simple and predictable on the flat backdrops sprite
//! sheets use; users crop so the corner lands on background.
//!
//! ## Premultiplied Bilinear Upscaling
//!
//! Upscaling uses `image`'s `Triangle` (bilinear) filter on premultiplied
//! RGBA. Wider kernels such as Lanczos3 ring: they leave faint alpha halos
//! several pixels into the keyed background, which show up as a fringe when
//! the sprite is alpha-blended in a game. Bilinear keeps the soft edge within
//! one source pixel of the sprite outline. Resampling straight RGBA would drag the RGB of fully
//! transparent background pixels into the sprite's edges as well.
//!
//! ## Nothing Aborts a Batch
//!
//! A selection whose processed result fails to encode falls back to the
//! plain crop; if even that fails, the artifact is kept as failed with no
//! bytes. One artifact per selection, always, in selection order.

pub mod archive;
pub mod config;
pub mod export;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod preview;
pub mod process;
pub mod selection;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
