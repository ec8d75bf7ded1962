pub mod upload_model;
