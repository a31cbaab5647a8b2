mod camera;
mod classifier;
mod composite;
mod debounce;
mod detector;
mod observation;
mod state;
mod stillness;

pub use camera::{
    CameraProvider, CaptureConstraints, CaptureQuality, CaptureStream, Orientation, VirtualCamera,
};
pub use classifier::{ClassifierConfig, ClassifierDebug, FaceSignalClassifier};
pub use composite::{render_composite, sharp_region, CompositeMonitor, CropRegion};
pub use debounce::DebounceTimer;
pub use detector::{load_first_available, DetectorProvider, LandmarkDetector};
pub use observation::{
    classify, BoundingBox, FaceObservation, GazeSignals, GazeThresholds, Keypoint, Landmark, Point,
};
pub use state::{AttentionState, RawAttention};
pub use stillness::StillnessTracker;
