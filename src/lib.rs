//! sublocate finds where small grayscale probes sit inside a larger reference
//! image.
//!
//! The core is an exhaustive mean-squared-error search ([`score`],
//! [`locate`]) over every valid origin, with a deterministic first-minimum
//! tie-break. Around it the crate provides a binary PGM codec, a 3x3 box
//! smoother, seeded random probe generation and a batch driver that writes a
//! `label, x, y` ledger. Row parallelism is available via the `rayon` feature.

pub mod batch;
pub mod filter;
pub mod generate;
pub mod image;
mod kernel;
pub mod search;
mod trace;
pub mod util;

pub use batch::{BatchLocator, BatchReport, Ledger, MatchResult, SkippedProbe};
pub use filter::{smooth_3x3, smooth_image};
pub use generate::{generate, write_sub_images, GenerateConfig, SubImage};
pub use crate::image::pgm::{read_pgm, write_pgm};
pub use crate::image::{GrayImage, ImageView};
pub use search::{locate, score, LocateConfig, Locator, Match, Offset};
pub use util::{SubLocateError, SubLocateResult};

#[cfg(feature = "image-io")]
pub use crate::image::io;
