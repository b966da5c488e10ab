//! Read-side aggregation of galleries and prints into page-shaped results.
//!
//! Entity rows come from one filtered query plus one `COUNT(*)` sharing
//! the same predicates. Display text for the whole page is resolved in a
//! single batch translation lookup, thumbnails in a single image lookup.
//! Missing translations fall back to the per-field defaults; nothing here
//! fails for absent text.

use std::collections::{BTreeMap, HashMap};

use atelier_core::catalog::{CatalogSort, PrintFilter, Visibility, IMAGE_VERSION_THUMBNAIL};
use atelier_core::language::LanguageCode;
use atelier_core::pagination::{Page, PageRequest};
use atelier_core::translation::{DisplayText, EntityRef, EntityType, TextField};
use atelier_core::types::{DbId, Timestamp};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::models::catalog::{GalleryDetail, GallerySummary, PrintCard, PrintDetail};
use crate::models::image::ImageInfo;
use crate::models::print::PrintMetadata;
use crate::repositories::{GalleryRepo, ImageRepo, PrintRepo, TranslationRepo};

#[derive(Debug, FromRow)]
struct GalleryRow {
    id: DbId,
    artist_id: DbId,
    status: String,
    print_count: i64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

#[derive(Debug, FromRow)]
struct PrintRow {
    id: DbId,
    artist_id: DbId,
    status: String,
    sort_order: Option<i32>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

const PUBLISHED: &str = "published";

// ---------------------------------------------------------------------------
// Predicate builders
// ---------------------------------------------------------------------------

fn push_gallery_scope(qb: &mut QueryBuilder<'_, Postgres>, visibility: Visibility) {
    qb.push(" FROM galleries g");
    match visibility {
        Visibility::Published => {
            qb.push(" WHERE g.status = ").push_bind(PUBLISHED);
        }
        Visibility::OwnedBy(artist_id) => {
            qb.push(" WHERE g.artist_id = ").push_bind(artist_id);
        }
    }
}

/// `FROM`, joins and `WHERE` for print listings. Gallery-scoped listings
/// join the membership table so they can order by it.
fn push_print_scope(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &PrintFilter,
    visibility: Visibility,
) {
    qb.push(" FROM prints p LEFT JOIN print_metadata m ON m.print_id = p.id");
    if let Some(gallery_id) = filter.gallery_id {
        qb.push(" JOIN gallery_prints gp ON gp.print_id = p.id AND gp.gallery_id = ")
            .push_bind(gallery_id);
    }

    match visibility {
        Visibility::Published => {
            qb.push(" WHERE p.status = ").push_bind(PUBLISHED);
            if filter.is_gallery_scoped() {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM galleries g \
                     WHERE g.id = gp.gallery_id AND g.status = ",
                )
                .push_bind(PUBLISHED)
                .push(")");
            }
        }
        Visibility::OwnedBy(artist_id) => {
            qb.push(" WHERE p.artist_id = ").push_bind(artist_id);
        }
    }

    if let Some(technique) = &filter.technique {
        qb.push(" AND m.technique = ").push_bind(technique.clone());
    }
    if let Some(year) = filter.year {
        qb.push(" AND m.year_created = ").push_bind(year);
    }
    if let Some(plate_material) = &filter.plate_material {
        qb.push(" AND m.plate_material = ").push_bind(plate_material.clone());
    }
    if let Some(paper_type) = &filter.paper_type {
        qb.push(" AND m.paper_type = ").push_bind(paper_type.clone());
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Composes entities, translations, thumbnails and membership order.
pub struct CatalogRepo;

impl CatalogRepo {
    /// One page of galleries with resolved text and member counts.
    ///
    /// On the public surface `print_count` counts published prints only.
    pub async fn list_galleries(
        pool: &PgPool,
        visibility: Visibility,
        sort: CatalogSort,
        request: PageRequest,
        language: &LanguageCode,
    ) -> Result<Page<GallerySummary>, sqlx::Error> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_gallery_scope(&mut count, visibility);
        let total_count: i64 = count.build_query_scalar().fetch_one(pool).await?;

        let member_filter = match visibility {
            Visibility::Published => " AND p.status = 'published'",
            Visibility::OwnedBy(_) => "",
        };
        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT g.id, g.artist_id, g.status, g.created_at, g.updated_at, \
             (SELECT COUNT(*) FROM gallery_prints gp JOIN prints p ON p.id = gp.print_id \
              WHERE gp.gallery_id = g.id{member_filter}) AS print_count"
        ));
        push_gallery_scope(&mut select, visibility);
        select.push(" ORDER BY ").push(sort.order_clause("g"));
        select
            .push(" LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());
        let rows: Vec<GalleryRow> = select.build_query_as().fetch_all(pool).await?;

        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let mut texts = TranslationRepo::resolve_for_entities(
            pool,
            EntityType::Gallery,
            &ids,
            &TextField::DISPLAY,
            language,
        )
        .await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let text = DisplayText::from_resolved(&texts.remove(&row.id).unwrap_or_default());
                GallerySummary {
                    id: row.id,
                    artist_id: row.artist_id,
                    status: row.status,
                    title: text.title,
                    description: text.description,
                    print_count: row.print_count,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                }
            })
            .collect();

        Ok(Page::new(items, total_count, request))
    }

    /// One page of prints matching `filter`.
    ///
    /// Gallery-scoped listings are ordered by membership order and carry
    /// each print's `order`; unscoped listings use `sort`.
    pub async fn list_prints(
        pool: &PgPool,
        filter: &PrintFilter,
        visibility: Visibility,
        sort: CatalogSort,
        request: PageRequest,
        language: &LanguageCode,
    ) -> Result<Page<PrintCard>, sqlx::Error> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        push_print_scope(&mut count, filter, visibility);
        let total_count: i64 = count.build_query_scalar().fetch_one(pool).await?;

        let order_column = if filter.is_gallery_scoped() {
            "gp.sort_order"
        } else {
            "NULL::INT"
        };
        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT p.id, p.artist_id, p.status, p.created_at, p.updated_at, \
             {order_column} AS sort_order"
        ));
        push_print_scope(&mut select, filter, visibility);
        if filter.is_gallery_scoped() {
            select.push(" ORDER BY gp.sort_order ASC");
        } else {
            select.push(" ORDER BY ").push(sort.order_clause("p"));
        }
        select
            .push(" LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());
        let rows: Vec<PrintRow> = select.build_query_as().fetch_all(pool).await?;

        let items = Self::print_cards(pool, rows, language).await?;
        Ok(Page::new(items, total_count, request))
    }

    /// A gallery with all of its visible members in gallery order.
    ///
    /// Returns `None` if the gallery is missing or not visible.
    pub async fn gallery_detail(
        pool: &PgPool,
        gallery_id: DbId,
        visibility: Visibility,
        language: &LanguageCode,
    ) -> Result<Option<GalleryDetail>, sqlx::Error> {
        let Some(gallery) = GalleryRepo::find_by_id(pool, gallery_id).await? else {
            return Ok(None);
        };
        if !visibility.allows(gallery.artist_id, &gallery.status) {
            return Ok(None);
        }

        let mut members = QueryBuilder::<Postgres>::new(
            "SELECT p.id, p.artist_id, p.status, p.created_at, p.updated_at, gp.sort_order \
             FROM gallery_prints gp JOIN prints p ON p.id = gp.print_id \
             WHERE gp.gallery_id = ",
        );
        members.push_bind(gallery_id);
        if visibility == Visibility::Published {
            members.push(" AND p.status = ").push_bind(PUBLISHED);
        }
        members.push(" ORDER BY gp.sort_order ASC");
        let rows: Vec<PrintRow> = members.build_query_as().fetch_all(pool).await?;

        let resolved = TranslationRepo::resolve_all(
            pool,
            EntityRef::gallery(gallery.id),
            &TextField::DISPLAY,
            language,
        )
        .await?;
        let text = DisplayText::from_resolved(&resolved);
        let prints = Self::print_cards(pool, rows, language).await?;

        Ok(Some(GalleryDetail {
            gallery: GallerySummary {
                id: gallery.id,
                artist_id: gallery.artist_id,
                status: gallery.status,
                title: text.title,
                description: text.description,
                print_count: prints.len() as i64,
                created_at: gallery.created_at,
                updated_at: gallery.updated_at,
            },
            prints,
        }))
    }

    /// A print with metadata, resolved text and its image variants.
    ///
    /// `image_version` restricts the image map to that one version; the
    /// map is empty if the print has no such variant. Returns `None` if the
    /// print is missing or not visible.
    pub async fn print_detail(
        pool: &PgPool,
        print_id: DbId,
        visibility: Visibility,
        language: &LanguageCode,
        image_version: Option<&str>,
    ) -> Result<Option<PrintDetail>, sqlx::Error> {
        let Some(print) = PrintRepo::find_by_id(pool, print_id).await? else {
            return Ok(None);
        };
        if !visibility.allows(print.artist_id, &print.status) {
            return Ok(None);
        }

        let metadata = PrintRepo::find_metadata(pool, print.id)
            .await?
            .unwrap_or_else(|| PrintMetadata {
                print_id: print.id,
                ..Default::default()
            });
        let resolved = TranslationRepo::resolve_all(
            pool,
            EntityRef::print(print.id),
            &TextField::DISPLAY,
            language,
        )
        .await?;
        let text = DisplayText::from_resolved(&resolved);

        let images: BTreeMap<String, ImageInfo> = ImageRepo::list_for_print(pool, print.id)
            .await?
            .iter()
            .filter(|image| image_version.is_none_or(|v| image.version == v))
            .map(|image| (image.version.clone(), ImageInfo::from(image)))
            .collect();

        Ok(Some(PrintDetail {
            id: print.id,
            artist_id: print.artist_id,
            status: print.status,
            title: text.title,
            description: text.description,
            metadata,
            images,
            created_at: print.created_at,
            updated_at: print.updated_at,
        }))
    }

    /// Attach text and thumbnails to a page of print rows, keeping row order.
    async fn print_cards(
        pool: &PgPool,
        rows: Vec<PrintRow>,
        language: &LanguageCode,
    ) -> Result<Vec<PrintCard>, sqlx::Error> {
        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let mut texts = TranslationRepo::resolve_for_entities(
            pool,
            EntityType::Print,
            &ids,
            &TextField::DISPLAY,
            language,
        )
        .await?;
        let mut thumbnails: HashMap<DbId, String> =
            ImageRepo::urls_for_version(pool, &ids, IMAGE_VERSION_THUMBNAIL).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let text = DisplayText::from_resolved(&texts.remove(&row.id).unwrap_or_default());
                PrintCard {
                    id: row.id,
                    artist_id: row.artist_id,
                    status: row.status,
                    title: text.title,
                    description: text.description,
                    thumbnail_url: thumbnails.remove(&row.id),
                    order: row.sort_order,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                }
            })
            .collect())
    }
}
