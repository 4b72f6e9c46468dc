pub mod analysis;
pub mod discovery;
pub mod journey;
pub mod layout;
pub mod model;
pub mod video;
