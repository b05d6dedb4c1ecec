pub mod filters;
pub mod request_params;
