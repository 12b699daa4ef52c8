pub mod aggregate;
pub mod export;
pub mod listing;
pub mod matches;
pub mod pipeline;
pub mod session;
pub mod text;
