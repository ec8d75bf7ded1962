use async_trait::async_trait;
use sea_orm::*;

use crate::entities::{upload, upload::Entity as Upload};
use crate::models::upload_model::NewUpload;

/// Row store for upload metadata. Rows are insert-only.
#[async_trait]
pub trait UploadRepository: Send + Sync {
    async fn insert(&self, new_upload: NewUpload) -> Result<upload::Model, DbErr>;

    /// Every row, newest first.
    async fn list_recent(&self) -> Result<Vec<upload::Model>, DbErr>;

    async fn find(&self, id: i64) -> Result<Option<upload::Model>, DbErr>;
}

pub struct SeaOrmUploadRepository {
    db: DatabaseConnection,
}

impl SeaOrmUploadRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UploadRepository for SeaOrmUploadRepository {
    async fn insert(&self, new_upload: NewUpload) -> Result<upload::Model, DbErr> {
        let row = upload::ActiveModel {
            id: NotSet,
            created_at: NotSet,
            guest_name: Set(Some(new_upload.guest_name)),
            message: Set(new_upload.message),
            file_url: Set(new_upload.file_url),
        };

        row.insert(&self.db).await
    }

    async fn list_recent(&self) -> Result<Vec<upload::Model>, DbErr> {
        Upload::find()
            .order_by_desc(upload::Column::CreatedAt)
            .order_by_desc(upload::Column::Id)
            .all(&self.db)
            .await
    }

    async fn find(&self, id: i64) -> Result<Option<upload::Model>, DbErr> {
        Upload::find_by_id(id).one(&self.db).await
    }
}
