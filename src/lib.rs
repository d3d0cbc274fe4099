//! Ghost-object placement for interactive 3-D clients.
//!
//! A host application owns a [`PlacementController`], feeds it a
//! [`FrameInput`] once per frame, and forwards input edges. The controller
//! resolves the pointer against the scene, snaps the target to a grid,
//! smooths the preview's pose with a damped spring, and decides whether
//! the placement can be committed. The scene itself stays behind the
//! [`SceneBackend`] and [`SpatialQuery`] traits; a simple AABB-based
//! [`StaticScene`] is provided for tests and headless hosts.
//!
//! ```
//! use glam::Vec3;
//! use gridghost::{
//!     ObjectTemplate, PlacementConfig, PlacementController, StaticScene,
//!     TemplateCatalog,
//! };
//!
//! let mut catalog = TemplateCatalog::new();
//! catalog.register(ObjectTemplate::new("crate", Vec3::splat(0.5)));
//!
//! let mut scene = StaticScene::new();
//! let mut controller = PlacementController::new(PlacementConfig::default(), catalog);
//! controller.activate("crate", Vec3::ZERO, &mut scene);
//! assert!(controller.is_active());
//! ```

pub mod catalog;
pub mod config;
pub mod controller;
pub mod grid;
pub mod input;
pub mod raycast;
pub mod scene;
pub mod spring;
pub mod validator;

pub use catalog::{ObjectTemplate, TemplateCatalog};
pub use config::PlacementConfig;
pub use controller::{FrameInput, PlacementController};
pub use grid::{GridConfig, snap_to_grid};
pub use input::{InputKey, PlacementAction, PlacementInput, PointerMode, PointerTracker};
pub use raycast::{ResolvedTarget, Viewpoint, ray_plane_y, resolve_surface};
pub use scene::{Aabb, ObjectId, SceneBackend, SpatialQuery, StaticScene, SurfaceHit};
pub use spring::Spring;
pub use validator::{
    FeedbackRenderer, NullFeedbackRenderer, PlacementFeedback, RecordingFeedbackRenderer,
};
