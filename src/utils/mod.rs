pub mod api_response;
pub mod media_utils;
