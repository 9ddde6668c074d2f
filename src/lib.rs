//! Outfitter is a headless outfit-composition engine.
//!
//! The embedding application owns the UI; this crate owns the model and the
//! pixels:
//!
//! - stage overlay assets from a [`Catalog`] onto a [`Stage`] through drag,
//!   drop, and tap payloads ([`interact`], [`payload`])
//! - transform placements with pointer sessions or discrete step controls
//!   ([`interact`], [`steps`])
//! - doodle new assets on a [`PaintSurface`] and save them back as catalog
//!   entries
//! - flatten the figure and every placed item into a PNG [`Snapshot`]
#![forbid(unsafe_code)]

mod compose;
mod glyph;
mod raster;

pub mod catalog;
pub mod error;
pub mod geom;
pub mod interact;
pub mod paint;
pub mod payload;
pub mod snapshot;
pub mod stage;
pub mod steps;
pub mod store;

pub use catalog::{Archetype, Catalog, CatalogBuilder, Category, ImageSource, OverlayAsset};
pub use error::{OutfitterError, OutfitterResult};
pub use geom::{DevicePoint, Rgb, StagePoint, StageRect};
pub use interact::{DropOutcome, ResizeSession, TapPlacement};
pub use paint::{PaintSurface, Tool};
pub use payload::TransferPayload;
pub use snapshot::{BaseFigure, Snapshot, SnapshotOptions};
pub use stage::{InstanceId, ItemEffects, PlacedItem, Placement, Stage};
pub use steps::{MoveDirection, OpacityDirection, ResizeDirection, RotateDirection};
pub use store::{ImageStore, StoredImage};
