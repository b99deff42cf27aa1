pub mod datetime;
pub mod feedback;
pub mod markdown;
pub mod validation;
