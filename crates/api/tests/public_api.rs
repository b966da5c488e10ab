//! Public catalogue: visibility, pagination, language defaults and filters.

mod common;

use axum::http::StatusCode;
use common::{artist_token, body_json, get, post_auth, post_print_multipart, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

async fn published_print(pool: &PgPool, token: &str, data: serde_json::Value) -> i64 {
    let response =
        post_print_multipart(common::build_test_app(pool.clone()), token, data, None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn publish_gallery(pool: &PgPool, token: &str, gallery_id: i64) {
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{gallery_id}"),
        token,
        json!({ "status": "published" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn add(pool: &PgPool, token: &str, gallery_id: i64, print_id: i64) {
    let response = post_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/artist/galleries/{gallery_id}/prints/{print_id}"),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn drafts_are_invisible(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let gallery = common::create_gallery(common::build_test_app(pool.clone()), &token, "WIP").await;
    let print = common::create_print(common::build_test_app(pool.clone()), &token, "WIP").await;

    let json = body_json(get(common::build_test_app(pool.clone()), "/api/v1/galleries").await).await;
    assert_eq!(json["data"]["total_count"], 0);
    let json = body_json(get(common::build_test_app(pool.clone()), "/api/v1/prints").await).await;
    assert_eq!(json["data"]["total_count"], 0);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/galleries/{gallery}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(common::build_test_app(pool), &format!("/api/v1/prints/{print}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_gallery_is_not_found(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/galleries/424242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn print_listing_paginates(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    for n in 0..15 {
        published_print(
            &pool,
            &token,
            json!({ "title": format!("Plate {n}"), "status": "published" }),
        )
        .await;
    }

    let first = body_json(
        get(common::build_test_app(pool.clone()), "/api/v1/prints?limit=10&page=1").await,
    )
    .await;
    assert_eq!(first["data"]["items"].as_array().unwrap().len(), 10);
    assert_eq!(first["data"]["total_count"], 15);
    assert_eq!(first["data"]["total_pages"], 2);

    let second =
        body_json(get(common::build_test_app(pool), "/api/v1/prints?limit=10&page=2").await).await;
    assert_eq!(second["data"]["items"].as_array().unwrap().len(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gallery_detail_shows_published_members_in_order(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let gallery =
        common::create_gallery(common::build_test_app(pool.clone()), &token, "Harbour").await;
    let first =
        published_print(&pool, &token, json!({ "title": "Dawn", "status": "published" })).await;
    let hidden = common::create_print(common::build_test_app(pool.clone()), &token, "Draft").await;
    let last =
        published_print(&pool, &token, json!({ "title": "Dusk", "status": "published" })).await;
    for print in [last, hidden, first] {
        add(&pool, &token, gallery, print).await;
    }
    publish_gallery(&pool, &token, gallery).await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/galleries/{gallery}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Harbour");
    assert_eq!(json["data"]["print_count"], 2);
    let prints = json["data"]["prints"].as_array().unwrap();
    let ids: Vec<i64> = prints.iter().map(|p| p["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![last, first]);
    assert_eq!(prints[0]["title"], "Dusk");

    // Listing counts agree with the detail.
    let json = body_json(get(common::build_test_app(pool.clone()), "/api/v1/galleries").await).await;
    assert_eq!(json["data"]["items"][0]["print_count"], 2);

    // No French text exists: defaults, never the English title.
    let json = body_json(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/galleries/{gallery}?language=fr"),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["title"], "Untitled");
    assert_eq!(json["data"]["prints"][0]["title"], "Untitled");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_language_is_rejected(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/galleries?language=123").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn print_detail_filters_image_versions(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let response = post_print_multipart(
        common::build_test_app(pool.clone()),
        &artist_token("kc-ana"),
        json!({ "title": "Gull", "status": "published" }),
        Some(("image/png", common::png_bytes(8, 8))),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let json = body_json(
        get(common::build_test_app(pool.clone()), &format!("/api/v1/prints/{id}")).await,
    )
    .await;
    assert_eq!(json["data"]["images"]["original"]["width"], 8);

    let json = body_json(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/prints/{id}?image_version=thumbnail"),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["images"], json!({}));

    let json = body_json(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/prints/{id}?image_version=original"),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["images"].as_object().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn print_listing_filters_by_metadata(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let etching = published_print(
        &pool,
        &token,
        json!({
            "title": "Heron",
            "status": "published",
            "technique": "etching",
            "plate_material": "copper",
            "year_created": 2004
        }),
    )
    .await;
    published_print(
        &pool,
        &token,
        json!({
            "title": "Pines",
            "status": "published",
            "technique": "woodcut",
            "year_created": 2004
        }),
    )
    .await;

    let json = body_json(
        get(common::build_test_app(pool.clone()), "/api/v1/prints?technique=etching").await,
    )
    .await;
    assert_eq!(json["data"]["total_count"], 1);
    assert_eq!(json["data"]["items"][0]["id"], etching);

    let json = body_json(
        get(common::build_test_app(pool.clone()), "/api/v1/prints?plate_type=copper").await,
    )
    .await;
    assert_eq!(json["data"]["total_count"], 1);

    let json =
        body_json(get(common::build_test_app(pool), "/api/v1/prints?year=2004").await).await;
    assert_eq!(json["data"]["total_count"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gallery_scoped_listing_hides_draft_gallery(pool: PgPool) {
    common::seed_artist(&pool, "kc-ana").await;
    let token = artist_token("kc-ana");
    let gallery = common::create_gallery(common::build_test_app(pool.clone()), &token, "G").await;
    let print =
        published_print(&pool, &token, json!({ "title": "P", "status": "published" })).await;
    add(&pool, &token, gallery, print).await;

    let uri = format!("/api/v1/prints?gallery_id={gallery}");
    let json = body_json(get(common::build_test_app(pool.clone()), &uri).await).await;
    assert_eq!(json["data"]["total_count"], 0);

    publish_gallery(&pool, &token, gallery).await;
    let json = body_json(get(common::build_test_app(pool), &uri).await).await;
    assert_eq!(json["data"]["total_count"], 1);
    assert_eq!(json["data"]["items"][0]["order"], 1);
}
