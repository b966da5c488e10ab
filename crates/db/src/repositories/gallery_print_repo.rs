//! Repository for the `gallery_prints` table.
//!
//! Every mutation locks the parent gallery row (`SELECT ... FOR UPDATE`),
//! loads the gallery's [`MemberOrder`], applies one transition and writes
//! back only the rows whose order changed. The lock serialises concurrent
//! mutations on the same gallery; different galleries never contend.
//! Mutations take `&mut PgConnection` and must run inside a transaction
//! owned by the caller, so the lock is held until commit and readers only
//! ever see dense states.

use atelier_core::error::CoreError;
use atelier_core::ordering::{MemberOrder, OrderAssignment};
use atelier_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::gallery_print::GalleryPrint;
use crate::DbResult;

const COLUMNS: &str = "gallery_id, print_id, sort_order, created_at, updated_at";

/// Ordered membership of prints in galleries.
pub struct GalleryPrintRepo;

impl GalleryPrintRepo {
    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Add a print at the end of a gallery (`order = N + 1`).
    pub async fn append(
        conn: &mut PgConnection,
        gallery_id: DbId,
        print_id: DbId,
    ) -> DbResult<GalleryPrint> {
        Self::add(conn, gallery_id, print_id, None).await
    }

    /// Add a print at a one-based `position`, clamped to `[1, N + 1]`.
    /// Members at or after the position move down by one.
    pub async fn insert_at(
        conn: &mut PgConnection,
        gallery_id: DbId,
        print_id: DbId,
        position: i64,
    ) -> DbResult<GalleryPrint> {
        Self::add(conn, gallery_id, print_id, Some(position)).await
    }

    /// Remove a print from a gallery and close the gap it leaves.
    ///
    /// Returns the order the print held.
    pub async fn remove(
        conn: &mut PgConnection,
        gallery_id: DbId,
        print_id: DbId,
    ) -> DbResult<i32> {
        Self::lock_gallery(conn, gallery_id).await?;
        let before = Self::load(&mut *conn, gallery_id).await?;

        let mut after = before.clone();
        let removed = after.remove(print_id)?;

        sqlx::query("DELETE FROM gallery_prints WHERE gallery_id = $1 AND print_id = $2")
            .bind(gallery_id)
            .bind(print_id)
            .execute(&mut *conn)
            .await?;
        Self::write_orders(conn, gallery_id, &after.changes_since(&before)).await?;

        tracing::debug!(gallery_id, print_id, removed, "Removed gallery member");
        Ok(removed)
    }

    /// Apply a batch reorder and return the full resulting order.
    ///
    /// The batch is validated in full before anything is written: a print
    /// that is not a member fails the whole call with
    /// [`CoreError::MemberNotInParent`]. Requested values act as sort keys
    /// and the gallery is re-numbered `1..N`.
    pub async fn reorder_batch(
        conn: &mut PgConnection,
        gallery_id: DbId,
        requested: &[OrderAssignment],
    ) -> DbResult<Vec<OrderAssignment>> {
        Self::lock_gallery(conn, gallery_id).await?;
        let before = Self::load(&mut *conn, gallery_id).await?;

        let mut after = before.clone();
        after.reorder(requested)?;

        let changes = after.changes_since(&before);
        Self::write_orders(conn, gallery_id, &changes).await?;

        tracing::debug!(
            gallery_id,
            requested = requested.len(),
            changed = changes.len(),
            "Reordered gallery members",
        );
        Ok(after.assignments())
    }

    /// Remove a print from every gallery it belongs to, keeping each of
    /// those galleries dense. Galleries are locked in id order.
    ///
    /// The caller must already hold `FOR UPDATE` on the print row, or a
    /// membership added after the gallery lookup would be missed.
    ///
    /// Returns the ids of the galleries the print was removed from.
    pub async fn remove_print_everywhere(
        conn: &mut PgConnection,
        print_id: DbId,
    ) -> DbResult<Vec<DbId>> {
        let gallery_ids = Self::galleries_for_print(&mut *conn, print_id).await?;
        for &gallery_id in &gallery_ids {
            Self::remove(conn, gallery_id, print_id).await?;
        }
        Ok(gallery_ids)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// One page of a gallery's members in order, plus the total count.
    pub async fn list_ordered(
        pool: &PgPool,
        gallery_id: DbId,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<GalleryPrint>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gallery_prints \
             WHERE gallery_id = $1 \
             ORDER BY sort_order ASC \
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, GalleryPrint>(&query)
            .bind(gallery_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        let total = Self::count(pool, gallery_id).await?;
        Ok((items, total))
    }

    /// Number of prints in a gallery.
    pub async fn count<'e, E: PgExecutor<'e>>(
        executor: E,
        gallery_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM gallery_prints WHERE gallery_id = $1")
            .bind(gallery_id)
            .fetch_one(executor)
            .await
    }

    /// Ids of the galleries a print belongs to, ascending.
    pub async fn galleries_for_print<'e, E: PgExecutor<'e>>(
        executor: E,
        print_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT gallery_id FROM gallery_prints WHERE print_id = $1 ORDER BY gallery_id",
        )
        .bind(print_id)
        .fetch_all(executor)
        .await
    }

    /// The current membership state of a gallery.
    pub async fn load<'e, E: PgExecutor<'e>>(
        executor: E,
        gallery_id: DbId,
    ) -> Result<MemberOrder, sqlx::Error> {
        let rows: Vec<(DbId, i32)> = sqlx::query_as(
            "SELECT print_id, sort_order FROM gallery_prints \
             WHERE gallery_id = $1 ORDER BY sort_order",
        )
        .bind(gallery_id)
        .fetch_all(executor)
        .await?;
        Ok(MemberOrder::from_rows(gallery_id, rows))
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn add(
        conn: &mut PgConnection,
        gallery_id: DbId,
        print_id: DbId,
        position: Option<i64>,
    ) -> DbResult<GalleryPrint> {
        // Print before gallery, the same order `PrintRepo::delete` locks in.
        Self::share_print(conn, print_id).await?;
        Self::lock_gallery(conn, gallery_id).await?;
        let before = Self::load(&mut *conn, gallery_id).await?;

        let mut after = before.clone();
        let sort_order = match position {
            Some(position) => after.insert_at(print_id, position)?,
            None => after.append(print_id)?,
        };

        Self::write_orders(conn, gallery_id, &after.changes_since(&before)).await?;

        let query = format!(
            "INSERT INTO gallery_prints (gallery_id, print_id, sort_order) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, GalleryPrint>(&query)
            .bind(gallery_id)
            .bind(print_id)
            .bind(sort_order)
            .fetch_one(&mut *conn)
            .await?;

        tracing::debug!(gallery_id, print_id, sort_order, "Added gallery member");
        Ok(row)
    }

    /// Take the row lock that serialises membership changes on a gallery.
    async fn lock_gallery(conn: &mut PgConnection, gallery_id: DbId) -> DbResult<()> {
        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM galleries WHERE id = $1 FOR UPDATE")
                .bind(gallery_id)
                .fetch_optional(&mut *conn)
                .await?;
        match locked {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound {
                entity: "Gallery",
                id: gallery_id,
            }
            .into()),
        }
    }

    /// Hold a share lock on the print so a concurrent delete waits for this
    /// membership to commit and then sees it.
    async fn share_print(conn: &mut PgConnection, print_id: DbId) -> DbResult<()> {
        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM prints WHERE id = $1 FOR SHARE")
                .bind(print_id)
                .fetch_optional(&mut *conn)
                .await?;
        match locked {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound {
                entity: "Print",
                id: print_id,
            }
            .into()),
        }
    }

    /// Rewrite the order of existing rows in one statement.
    async fn write_orders(
        conn: &mut PgConnection,
        gallery_id: DbId,
        changes: &[OrderAssignment],
    ) -> Result<(), sqlx::Error> {
        if changes.is_empty() {
            return Ok(());
        }
        let print_ids: Vec<DbId> = changes.iter().map(|c| c.print_id).collect();
        let orders: Vec<i32> = changes.iter().map(|c| c.sort_order).collect();

        sqlx::query(
            "UPDATE gallery_prints AS gp SET sort_order = v.sort_order \
             FROM UNNEST($2::BIGINT[], $3::INT[]) AS v(print_id, sort_order) \
             WHERE gp.gallery_id = $1 AND gp.print_id = v.print_id",
        )
        .bind(gallery_id)
        .bind(&print_ids)
        .bind(&orders)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}
