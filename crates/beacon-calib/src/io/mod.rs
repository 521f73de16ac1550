/// Camera model reader module.
pub mod camera;

/// Scene file reader module.
pub mod scene;

/// JSON detection sidecar module.
pub mod sidecar;
