pub mod image;
pub mod language;
pub mod message;
pub mod plant;

pub use image::ImagePayload;
pub use message::{Message, Role};
pub use plant::{CombinedResult, PlantInfo, PredictionResult};
