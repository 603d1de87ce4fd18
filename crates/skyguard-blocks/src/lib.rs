//! Block and item catalogs plus the accessor traits generators write through.
#![forbid(unsafe_code)]

pub mod access;
pub mod config;
pub mod items;
pub mod registry;
pub mod types;

pub use access::{BlockAccess, Container};
pub use items::{ItemCatalog, ItemId, ItemRegistry, ItemStack};
pub use registry::BlockRegistry;
pub use types::{Block, BlockId, BlockState};
