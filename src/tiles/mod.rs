pub mod grid;
pub mod loader;
pub mod scheduler;
pub mod source;
pub mod store;

// Re-exports for convenience
pub use grid::{TileGrid, TileIndex};
pub use loader::{TileLoader, TileResult};
pub use scheduler::TileScheduler;
pub use source::{FileTileResolver, InMemoryResolver, TileHandle, TileKey, TileResolver};
pub use store::{TileStatus, TileStore};
