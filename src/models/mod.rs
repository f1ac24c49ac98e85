pub mod chart;
pub mod conversation;
pub mod dataset;
pub mod response;
pub mod upload;
