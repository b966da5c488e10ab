//! Artist surface: identity, ownership, membership ordering and the
//! transactional write workflow.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use atelier_cloud::{ProcessingRequest, ProcessingTrigger, TriggerError};
use axum::http::StatusCode;
use common::{
    artist_token, body_json, delete_auth, gallery_order, get, get_auth, post_auth,
    post_json_auth, post_print_multipart, put_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

/// A processing pipeline that is always down.
struct FailingTrigger;

#[async_trait]
impl ProcessingTrigger for FailingTrigger {
    async fn notify(&self, _request: &ProcessingRequest) -> Result<(), TriggerError> {
        Err(TriggerError::HttpStatus(503))
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_is_unauthorized(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/artist/galleries").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unregistered_subject_is_not_found(pool: PgPool) {
    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/artist/galleries",
        &artist_token("kc-nobody"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Galleries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_gallery_returns_resolved_detail(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/artist/galleries",
        &artist_token("kc-ana"),
        json!({ "title": "Etchings", "description": "Early work" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Etchings");
    assert_eq!(json["data"]["description"], "Early work");
    assert_eq!(json["data"]["status"], "draft");
    assert_eq!(json["data"]["print_count"], 0);
    assert_eq!(json["data"]["prints"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gallery_without_title_is_rejected_before_any_write(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/artist/galleries",
        &artist_token("kc-ana"),
        json!({ "description": "No title" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count(&pool, "galleries").await, 0);
    assert_eq!(count(&pool, "translations").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_translation_write_leaves_no_gallery(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    sqlx::query("ALTER TABLE translations RENAME TO translations_offline")
        .execute(&pool)
        .await
        .unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/artist/galleries",
        &artist_token("kc-ana"),
        json!({ "title": "Lost" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "An internal error occurred");
    assert_eq!(count(&pool, "galleries").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_writes_text_in_requested_language(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let id = common::create_gallery(common::build_test_app(pool.clone()), &token, "Prints").await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{id}"),
        &token,
        json!({ "title": "Gravures", "language": "fr", "status": "published" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Gravures");
    assert_eq!(json["data"]["status"], "published");

    // The default-language title is untouched.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{id}"),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["title"], "Prints");

    // A language with no text gets the defaults, never another language.
    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/artist/galleries/{id}?language=de"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Untitled");
    assert_eq!(json["data"]["description"], "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_artists_gallery_looks_missing(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    common::seed_artist(&pool, "kc-bo").await;
    let owner = artist_token("kc-ana");
    let stranger = artist_token("kc-bo");
    let id = common::create_gallery(common::build_test_app(pool.clone()), &owner, "Mine").await;

    let foreign = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{id}"),
        &stranger,
    )
    .await;
    let missing = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/artist/galleries/999999",
        &stranger,
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let foreign = body_json(foreign).await;
    let missing = body_json(missing).await;
    assert_eq!(foreign["code"], missing["code"]);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{id}"),
        &stranger,
        json!({ "title": "Stolen" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{id}"),
        &stranger,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/artist/galleries/{id}"),
        &owner,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["title"], "Mine");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn artist_listing_includes_drafts_and_paginates(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    for n in 0..3 {
        common::create_gallery(common::build_test_app(pool.clone()), &token, &format!("G{n}"))
            .await;
    }

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/artist/galleries?limit=2&page=2",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_count"], 3);
    assert_eq!(json["data"]["total_pages"], 2);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// A gallery holding prints `[A, B, C]`, returned with the print ids.
async fn gallery_with_three(pool: &PgPool, token: &str) -> (i64, [i64; 3]) {
    let gallery = common::create_gallery(common::build_test_app(pool.clone()), token, "Set").await;
    let mut ids = [0; 3];
    for (slot, title) in ids.iter_mut().zip(["A", "B", "C"]) {
        *slot = common::create_print(common::build_test_app(pool.clone()), token, title).await;
        let response = post_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/artist/galleries/{gallery}/prints/{slot}"),
            token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    (gallery, ids)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_at_position_shifts_later_members(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let (gallery, [a, b, c]) = gallery_with_three(&pool, &token).await;
    let x = common::create_print(common::build_test_app(pool.clone()), &token, "X").await;

    let response = post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{gallery}/prints/{x}?position=2"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["sort_order"], 2);

    assert_eq!(gallery_order(&pool, &token, gallery).await, vec![a, x, b, c]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn remove_closes_the_gap(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let (gallery, [a, b, c]) = gallery_with_three(&pool, &token).await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{gallery}/prints/{b}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(gallery_order(&pool, &token, gallery).await, vec![a, c]);

    // The print itself survives.
    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/artist/prints/{b}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_member_is_a_conflict(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let (gallery, [a, _, _]) = gallery_with_three(&pool, &token).await;

    let response = post_auth(
        common::build_test_app(pool),
        &format!("/api/v1/artist/galleries/{gallery}/prints/{a}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DUPLICATE_MEMBER");
    assert_eq!(json["print_id"], a);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_applies_requested_positions(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let (gallery, [a, b, c]) = gallery_with_three(&pool, &token).await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{gallery}/prints"),
        &token,
        json!({ "prints": [
            { "print_id": c, "sort_order": 1 },
            { "print_id": a, "sort_order": 2 },
            { "print_id": b, "sort_order": 3 }
        ] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["print_id"], c);
    assert_eq!(json["data"][2]["sort_order"], 3);

    assert_eq!(gallery_order(&pool, &token, gallery).await, vec![c, a, b]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_naming_a_non_member_changes_nothing(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let (gallery, [a, b, c]) = gallery_with_three(&pool, &token).await;
    let outsider = common::create_print(common::build_test_app(pool.clone()), &token, "Z").await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{gallery}/prints"),
        &token,
        json!({ "prints": [
            { "print_id": c, "sort_order": 1 },
            { "print_id": outsider, "sort_order": 2 }
        ] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "MEMBER_NOT_IN_PARENT");
    assert_eq!(json["print_id"], outsider);

    assert_eq!(gallery_order(&pool, &token, gallery).await, vec![a, b, c]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn another_artists_print_cannot_be_added(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    common::seed_artist(&pool, "kc-bo").await;
    let token = artist_token("kc-ana");
    let gallery = common::create_gallery(common::build_test_app(pool.clone()), &token, "G").await;
    let foreign =
        common::create_print(common::build_test_app(pool.clone()), &artist_token("kc-bo"), "B")
            .await;

    let response = post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{gallery}/prints/{foreign}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(count(&pool, "gallery_prints").await, 0);
}

// ---------------------------------------------------------------------------
// Prints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_print_with_image_records_original(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let response = post_print_multipart(
        common::build_test_app(pool.clone()),
        &artist_token("kc-ana"),
        json!({
            "title": "Heron",
            "technique": "etching",
            "year_created": 1998,
            "edition_size": 20
        }),
        Some(("image/png", common::png_bytes(10, 6))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["title"], "Heron");
    assert_eq!(data["technique"], "etching");
    assert_eq!(data["year_created"], 1998);
    assert_eq!(data["processing"], "confirmed");
    assert_eq!(data["images"]["original"]["width"], 10);
    assert_eq!(data["images"]["original"]["height"], 6);
    assert!(data["images"]["original"]["url"]
        .as_str()
        .unwrap()
        .starts_with("/media/artists/"));

    let checksum: Option<String> = sqlx::query_scalar("SELECT checksum_sha256 FROM images")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(checksum.map(|c| c.len()), Some(64));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn print_without_image_needs_no_processing(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let response = post_print_multipart(
        common::build_test_app(pool),
        &artist_token("kc-ana"),
        json!({ "title": "Sketch" }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["processing"], "not_requested");
    assert_eq!(json["data"]["images"], json!({}));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_notification_still_creates_print(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let app = common::build_test_app_with(pool.clone(), Arc::new(FailingTrigger));
    let response = post_print_multipart(
        app,
        &artist_token("kc-ana"),
        json!({ "title": "Storm" }),
        Some(("image/png", common::png_bytes(4, 4))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["processing"], "unconfirmed");
    assert_eq!(count(&pool, "prints").await, 1);
    assert_eq!(count(&pool, "images").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsupported_image_type_is_rejected_before_any_write(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let response = post_print_multipart(
        common::build_test_app(pool.clone()),
        &artist_token("kc-ana"),
        json!({ "title": "Animated" }),
        Some(("image/gif", b"GIF89a".to_vec())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count(&pool, "prints").await, 0);
    assert_eq!(count(&pool, "translations").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_print_patches_metadata(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let response = post_print_multipart(
        common::build_test_app(pool.clone()),
        &token,
        json!({ "title": "Dock", "technique": "aquatint", "paper_type": "Hahnemühle" }),
        None,
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/artist/prints/{id}"),
        &token,
        json!({ "technique": "drypoint", "year_created": 2001 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["technique"], "drypoint");
    assert_eq!(json["data"]["year_created"], 2001);
    assert_eq!(json["data"]["paper_type"], "Hahnemühle");
    assert_eq!(json["data"]["title"], "Dock");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn future_year_is_rejected(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let response = post_print_multipart(
        common::build_test_app(pool.clone()),
        &artist_token("kc-ana"),
        json!({ "title": "Later", "year_created": 3000 }),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count(&pool, "prints").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_print_keeps_every_gallery_dense(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let (first, [a, b, c]) = gallery_with_three(&pool, &token).await;
    let second = common::create_gallery(common::build_test_app(pool.clone()), &token, "Other").await;
    for print in [b, a] {
        post_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/artist/galleries/{second}/prints/{print}"),
            &token,
        )
        .await;
    }

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/prints/{b}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(gallery_order(&pool, &token, first).await, vec![a, c]);
    assert_eq!(gallery_order(&pool, &token, second).await, vec![a]);

    let leftover: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM translations WHERE entity_type = 'print' AND entity_id = $1",
    )
    .bind(b)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(leftover, 0);
}
