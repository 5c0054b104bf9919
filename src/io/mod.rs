pub mod reporting;
pub mod request;
