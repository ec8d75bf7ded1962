pub mod media_fetcher;
pub mod s3_service;
pub mod storage;
pub mod upload_service;
