use atelier_core::language::LanguageCode;
use atelier_core::translation::EntityRef;
use atelier_core::types::DbId;
use atelier_db::repositories::GalleryRepo;

use super::{validate_texts, write_texts, CatalogWorkflow, GalleryInput, WorkflowResult};

impl CatalogWorkflow {
    /// Create a gallery with its title (and optional description) in
    /// `language`. Returns the new gallery id.
    pub async fn create_gallery(
        &self,
        artist_id: DbId,
        input: &GalleryInput,
        language: &LanguageCode,
    ) -> WorkflowResult<DbId> {
        validate_texts(input.title.as_deref(), input.description.as_deref(), true)?;

        let mut tx = self.pool.begin().await?;
        let gallery =
            GalleryRepo::create(&mut *tx, artist_id, input.status.unwrap_or_default()).await?;
        write_texts(
            &mut tx,
            EntityRef::gallery(gallery.id),
            input.title.as_deref(),
            input.description.as_deref(),
            language,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            gallery_id = gallery.id,
            artist_id,
            language = %language,
            status = %gallery.status,
            "Gallery created",
        );
        Ok(gallery.id)
    }

    /// Patch status and/or text of an owned gallery.
    pub async fn update_gallery(
        &self,
        artist_id: DbId,
        gallery_id: DbId,
        input: &GalleryInput,
        language: &LanguageCode,
    ) -> WorkflowResult<()> {
        validate_texts(input.title.as_deref(), input.description.as_deref(), false)?;

        let mut tx = self.pool.begin().await?;
        let gallery = Self::owned_gallery(&mut *tx, artist_id, gallery_id).await?;

        let texts_changed = write_texts(
            &mut tx,
            EntityRef::gallery(gallery.id),
            input.title.as_deref(),
            input.description.as_deref(),
            language,
        )
        .await?;

        match input.status {
            Some(status) if status.as_str() != gallery.status => {
                GalleryRepo::set_status(&mut *tx, gallery.id, status).await?;
            }
            _ if texts_changed => GalleryRepo::touch(&mut *tx, gallery.id).await?,
            _ => {}
        }
        tx.commit().await?;

        tracing::info!(gallery_id, artist_id, language = %language, "Gallery updated");
        Ok(())
    }

    /// Delete an owned gallery with its translations and membership.
    /// Member prints are untouched.
    pub async fn delete_gallery(&self, artist_id: DbId, gallery_id: DbId) -> WorkflowResult<()> {
        let mut tx = self.pool.begin().await?;
        Self::owned_gallery(&mut *tx, artist_id, gallery_id).await?;
        GalleryRepo::delete(&mut tx, gallery_id).await?;
        tx.commit().await?;

        tracing::info!(gallery_id, artist_id, "Gallery deleted");
        Ok(())
    }
}
