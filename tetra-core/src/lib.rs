/// Tetra Core Library - Shared scene, camera and animation logic
///
/// This library holds everything about the rotating tetrahedron viewer that
/// does not depend on a platform: geometry, transforms, projection, damped
/// orbit controls, the frame-driven animation, label placement and the
/// application state the browser and terminal front ends drive.

pub mod animation;
pub mod app;
pub mod config;
pub mod controls;
pub mod display;
pub mod error;
pub mod geometry;
pub mod label;
pub mod projection;
pub mod scene;
pub mod transform;
pub mod viewport;

// Re-export commonly used types
pub use animation::{Animator, FixedFrames, FrameSource, FrameTick};
pub use app::{run_frames, AppState, FrameRenderer};
pub use config::SceneConfig;
pub use controls::OrbitControls;
pub use display::{DisplayMode, DARK_MODE_CLASS};
pub use error::{Result, TetraError};
pub use geometry::{Mesh, Segment, Triangle, Vertex};
pub use label::LabelPlacement;
pub use projection::{Camera, Ndc};
pub use scene::{Color, Light, Scene};
pub use transform::{RotationState, Transform};
pub use viewport::Viewport;
