//! # pixmill
//!
//! Bit-exact pixel kernels for video and image pipelines: YUV to RGB,
//! channel reorders, fixed-ratio and arbitrary box/bilinear scaling, plane
//! transposition and rotation, and SSE/PSNR comparison.
//!
//! Every kernel has a scalar implementation that defines its output. The
//! x86-64 AVX2 and ARM NEON paths are selected at runtime and produce the
//! same bytes for the same input on every tier.
//!
//! ## Core operations (always available)
//!
//! Row functions take raw `&[u8]` / `&mut [u8]` slices and a pixel count.
//! Plane functions take [`Plane`] / [`PlaneMut`] views with an element
//! stride; a negative stride addresses the plane bottom-up.
//!
//! All size checks happen once at the public boundary and fail with
//! [`SizeError`]. A zero width or height is a successful no-op.
//!
//! ## Feature flags
//!
//! - **`std`** (default): [`compute_psnr`] and [`plane_psnr`], which need
//!   `f64::log10`.
//! - **`rayon`**: long SSE buffers are reduced block by block in parallel.
//! - **`rgb`**: conversions on [`rgb`] crate pixel types (`Bgra<u8>`,
//!   `Rgb<u8>`, `Bgra<u16>`, ...) via bytemuck.
//! - **`imgref`**: whole-image transpose, rotate, scale and compare on
//!   [`imgref`] types. Implies `rgb`.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod compare;
mod convert;
mod error;
mod plane;
mod rotate;
mod scale;

pub use compare::*;
pub use convert::*;
pub use error::SizeError;
pub use plane::{Plane, PlaneMut};
pub use rotate::*;
pub use scale::*;

#[cfg(feature = "rgb")]
pub mod typed;

#[cfg(feature = "imgref")]
pub mod img;
