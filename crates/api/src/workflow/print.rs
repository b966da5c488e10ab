use atelier_cloud::{ProcessingRequest, StoredObject};
use atelier_core::catalog::{image_object_key, IMAGE_STATUS_PENDING, IMAGE_VERSION_ORIGINAL};
use atelier_core::language::LanguageCode;
use atelier_core::translation::EntityRef;
use atelier_core::types::DbId;
use atelier_db::models::image::{CreateImage, Image};
use atelier_db::repositories::{ImageRepo, PrintRepo};
use uuid::Uuid;

use super::upload::{inspect, ImageUpload, InspectedImage};
use super::{
    metadata_is_empty, validate_metadata, validate_texts, write_texts, CatalogWorkflow,
    PrintInput, ProcessingStatus, WorkflowResult,
};

/// Result of [`CatalogWorkflow::create_print`].
#[derive(Debug, Clone)]
pub struct CreatedPrint {
    pub print_id: DbId,
    pub image_id: Option<DbId>,
    pub processing: ProcessingStatus,
}

/// An upload that has been written to the object store.
struct StagedImage {
    stored: StoredObject,
    inspected: InspectedImage,
    content_type: String,
}

impl CatalogWorkflow {
    /// Create a print with metadata, text and an optional source image.
    ///
    /// 1. The image, if any, is validated and written to the object store.
    /// 2. Print, metadata, translations and the image row are written in
    ///    one transaction. If it fails the stored object is removed again.
    /// 3. The processing pipeline is notified. A failure here is logged and
    ///    reported as [`ProcessingStatus::Unconfirmed`]; the print stays.
    pub async fn create_print(
        &self,
        artist_id: DbId,
        input: &PrintInput,
        language: &LanguageCode,
        upload: Option<ImageUpload>,
    ) -> WorkflowResult<CreatedPrint> {
        validate_texts(input.title.as_deref(), input.description.as_deref(), true)?;
        validate_metadata(&input.metadata)?;
        let inspected = upload
            .as_ref()
            .map(|u| inspect(u, self.max_upload_bytes))
            .transpose()?;

        // 1. Store the binary.
        let staged = match (upload, inspected) {
            (Some(upload), Some(inspected)) => {
                let key = image_object_key(
                    artist_id,
                    &Uuid::now_v7().to_string(),
                    inspected.extension,
                );
                let stored = self
                    .store
                    .put(&key, upload.bytes, &upload.content_type)
                    .await?;
                Some(StagedImage {
                    stored,
                    inspected,
                    content_type: upload.content_type,
                })
            }
            _ => None,
        };

        // 2. Persist everything else atomically.
        let (print_id, image) = match self
            .persist_print(artist_id, input, language, staged.as_ref())
            .await
        {
            Ok(persisted) => persisted,
            Err(err) => {
                if let Some(staged) = &staged {
                    if let Err(cleanup) = self.store.delete(&staged.stored.key).await {
                        tracing::warn!(
                            key = %staged.stored.key,
                            error = %cleanup,
                            "Failed to remove orphaned upload",
                        );
                    }
                }
                return Err(err);
            }
        };

        // 3. Hand off to the processing pipeline.
        let processing = match &image {
            None => ProcessingStatus::NotRequested,
            Some(image) => {
                let request = ProcessingRequest {
                    print_id,
                    image_id: image.id,
                    storage_key: image.storage_key.clone(),
                    public_url: image.public_url.clone(),
                    content_type: image.content_type.clone(),
                };
                match self.trigger.notify(&request).await {
                    Ok(()) => ProcessingStatus::Confirmed,
                    Err(err) => {
                        tracing::warn!(
                            print_id,
                            image_id = image.id,
                            error = %err,
                            "Processing notification failed; print created unconfirmed",
                        );
                        ProcessingStatus::Unconfirmed
                    }
                }
            }
        };

        tracing::info!(
            print_id,
            artist_id,
            language = %language,
            has_image = image.is_some(),
            "Print created",
        );
        Ok(CreatedPrint {
            print_id,
            image_id: image.map(|i| i.id),
            processing,
        })
    }

    async fn persist_print(
        &self,
        artist_id: DbId,
        input: &PrintInput,
        language: &LanguageCode,
        staged: Option<&StagedImage>,
    ) -> WorkflowResult<(DbId, Option<Image>)> {
        let mut tx = self.pool.begin().await?;

        let print =
            PrintRepo::create(&mut *tx, artist_id, input.status.unwrap_or_default()).await?;
        PrintRepo::upsert_metadata(&mut *tx, print.id, &input.metadata).await?;
        write_texts(
            &mut tx,
            EntityRef::print(print.id),
            input.title.as_deref(),
            input.description.as_deref(),
            language,
        )
        .await?;

        let image = match staged {
            Some(staged) => Some(
                ImageRepo::upsert(
                    &mut *tx,
                    &CreateImage {
                        print_id: print.id,
                        version: IMAGE_VERSION_ORIGINAL.to_string(),
                        storage_key: staged.stored.key.clone(),
                        public_url: staged.stored.public_url.clone(),
                        width: Some(staged.inspected.width),
                        height: Some(staged.inspected.height),
                        content_type: staged.content_type.clone(),
                        file_size: staged.inspected.file_size,
                        checksum_sha256: Some(staged.inspected.checksum_sha256.clone()),
                        status: Some(IMAGE_STATUS_PENDING.to_string()),
                    },
                )
                .await?,
            ),
            None => None,
        };

        tx.commit().await?;
        Ok((print.id, image))
    }

    /// Patch status, text and metadata of an owned print. Absent metadata
    /// fields keep their stored value.
    pub async fn update_print(
        &self,
        artist_id: DbId,
        print_id: DbId,
        input: &PrintInput,
        language: &LanguageCode,
    ) -> WorkflowResult<()> {
        validate_texts(input.title.as_deref(), input.description.as_deref(), false)?;
        validate_metadata(&input.metadata)?;

        let mut tx = self.pool.begin().await?;
        let print = Self::owned_print(&mut *tx, artist_id, print_id).await?;

        let mut changed = write_texts(
            &mut tx,
            EntityRef::print(print.id),
            input.title.as_deref(),
            input.description.as_deref(),
            language,
        )
        .await?;
        if !metadata_is_empty(&input.metadata) {
            PrintRepo::upsert_metadata(&mut *tx, print.id, &input.metadata).await?;
            changed = true;
        }

        match input.status {
            Some(status) if status.as_str() != print.status => {
                PrintRepo::set_status(&mut *tx, print.id, status).await?;
            }
            _ if changed => PrintRepo::touch(&mut *tx, print.id).await?,
            _ => {}
        }
        tx.commit().await?;

        tracing::info!(print_id, artist_id, language = %language, "Print updated");
        Ok(())
    }

    /// Delete an owned print. It leaves every gallery first so those
    /// galleries stay dense; stored image objects are removed after commit.
    pub async fn delete_print(&self, artist_id: DbId, print_id: DbId) -> WorkflowResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::owned_print(&mut *tx, artist_id, print_id).await?;
        let keys: Vec<String> = ImageRepo::list_for_print(&mut *tx, print_id)
            .await?
            .into_iter()
            .map(|image| image.storage_key)
            .collect();
        let galleries = PrintRepo::delete(&mut tx, print_id)
            .await?
            .unwrap_or_default();
        tx.commit().await?;

        tracing::info!(
            print_id,
            artist_id,
            galleries = galleries.len(),
            "Print deleted",
        );

        for key in keys {
            if let Err(err) = self.store.delete(&key).await {
                tracing::warn!(%key, error = %err, "Failed to remove stored image");
            }
        }
        Ok(())
    }
}
