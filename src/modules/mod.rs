pub mod analysis;
pub mod extraction;
pub mod pipeline;
pub mod upload;
