pub mod plant_api_client;

pub use plant_api_client::{ChatReply, PlantApiClient};
