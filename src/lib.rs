//! GPU textures from decoded scene assets.
//!
//! Single images go through [`dispatch`] to pick their pixel format, sprite
//! sheets through [`atlas`] to be packed into one RGBA atlas. Both end up as a
//! [`render::Texture`] owned by a [`render::GraphicsBackend`].

pub mod asset;
pub mod atlas;
mod cache;
pub mod codec;
mod config;
pub mod dispatch;
mod error;
mod loader;
pub mod render;

pub use cache::*;
pub use config::*;
pub use error::*;
pub use loader::*;

pub use glam;
pub use wgpu;
