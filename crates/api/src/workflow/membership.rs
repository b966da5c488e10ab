use atelier_core::ordering::OrderAssignment;
use atelier_core::types::DbId;
use atelier_db::models::gallery_print::GalleryPrint;
use atelier_db::repositories::GalleryPrintRepo;

use super::{CatalogWorkflow, WorkflowResult};

impl CatalogWorkflow {
    /// Add an owned print to an owned gallery, at the end or at a
    /// one-based `position`.
    pub async fn add_print_to_gallery(
        &self,
        artist_id: DbId,
        gallery_id: DbId,
        print_id: DbId,
        position: Option<i64>,
    ) -> WorkflowResult<GalleryPrint> {
        let mut tx = self.pool.begin().await?;
        Self::owned_gallery(&mut *tx, artist_id, gallery_id).await?;
        Self::owned_print(&mut *tx, artist_id, print_id).await?;

        let member = match position {
            Some(position) => {
                GalleryPrintRepo::insert_at(&mut tx, gallery_id, print_id, position).await?
            }
            None => GalleryPrintRepo::append(&mut tx, gallery_id, print_id).await?,
        };
        tx.commit().await?;

        tracing::info!(
            gallery_id,
            print_id,
            order = member.sort_order,
            "Print added to gallery",
        );
        Ok(member)
    }

    /// Take a print out of an owned gallery. Returns the order it held.
    pub async fn remove_print_from_gallery(
        &self,
        artist_id: DbId,
        gallery_id: DbId,
        print_id: DbId,
    ) -> WorkflowResult<i32> {
        let mut tx = self.pool.begin().await?;
        Self::owned_gallery(&mut *tx, artist_id, gallery_id).await?;
        let removed = GalleryPrintRepo::remove(&mut tx, gallery_id, print_id).await?;
        tx.commit().await?;

        tracing::info!(gallery_id, print_id, order = removed, "Print removed from gallery");
        Ok(removed)
    }

    /// Apply a batch reorder to an owned gallery and return its full
    /// resulting order. A batch naming a non-member changes nothing.
    pub async fn update_print_order(
        &self,
        artist_id: DbId,
        gallery_id: DbId,
        requested: &[OrderAssignment],
    ) -> WorkflowResult<Vec<OrderAssignment>> {
        let mut tx = self.pool.begin().await?;
        Self::owned_gallery(&mut *tx, artist_id, gallery_id).await?;
        let order = GalleryPrintRepo::reorder_batch(&mut tx, gallery_id, requested).await?;
        tx.commit().await?;

        tracing::info!(
            gallery_id,
            requested = requested.len(),
            members = order.len(),
            "Gallery order updated",
        );
        Ok(order)
    }
}
