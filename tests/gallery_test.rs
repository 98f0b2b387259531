//! Integration tests for the gallery pages and image serving.

mod common;

use chrono::{Duration, Utc};
use common::{client, png, TestHarness, ALICE, BOB};
use gallery_common::{ImageId, UserIdentity, PAGE_SIZE};
use gallery_db::models::NewImage;
use gallery_db::store::ImageStore;

#[tokio::test]
async fn home_anonymous_has_page_values() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["page_title"], "Gallery - Home");
    assert_eq!(json["logged_in"], false);
    assert_eq!(json["loginout_url_linktext"], "Login");
    assert_eq!(json["loginout_url"], "/auth/login?continue=/");
    assert!(json["public_images"].as_array().unwrap().is_empty());
    assert!(json["private_images"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn home_signed_in_shows_logout_link() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = client()
        .get(format!("http://{addr}/"))
        .header("cookie", h.session_cookie(ALICE))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["logged_in"], true);
    assert_eq!(json["loginout_url_linktext"], format!("Logout ({ALICE})"));
    assert_eq!(json["loginout_url"], "/auth/logout?continue=/");
}

#[tokio::test]
async fn home_splits_public_and_private() {
    let (h, addr) = TestHarness::with_server().await;
    let store = h.store();
    let alice = UserIdentity::new(ALICE);
    let bob = UserIdentity::new(BOB);

    let sunset = store
        .create(NewImage::new(alice.clone(), png(8, 8), true).with_description("sunset"))
        .unwrap();
    let diary = store
        .create(NewImage::new(alice.clone(), png(8, 8), false).with_description("diary"))
        .unwrap();
    store
        .create(NewImage::new(bob.clone(), png(8, 8), false).with_description("bob's"))
        .unwrap();

    // Bob sees only the public image and his own private one
    let resp = client()
        .get(format!("http://{addr}/"))
        .header("cookie", h.session_cookie(BOB))
        .send()
        .await
        .unwrap();
    let json: serde_json::Value = resp.json().await.unwrap();
    let public = json["public_images"].as_array().unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0]["id"], sunset.token());
    assert_eq!(public[0]["description"], "sunset");
    assert_eq!(public[0]["owner"], ALICE);
    assert_eq!(public[0]["is_public"], true);
    assert_eq!(public[0]["url"], format!("/img?img_id={}", sunset.token()));
    let private = json["private_images"].as_array().unwrap();
    assert_eq!(private.len(), 1);
    assert_eq!(private[0]["owner"], BOB);

    // Alice sees her diary in the private list
    let resp = client()
        .get(format!("http://{addr}/"))
        .header("cookie", h.session_cookie(ALICE))
        .send()
        .await
        .unwrap();
    let json: serde_json::Value = resp.json().await.unwrap();
    let private = json["private_images"].as_array().unwrap();
    assert_eq!(private.len(), 1);
    assert_eq!(private[0]["id"], diary.token());
    assert_eq!(private[0]["is_public"], false);

    // Anonymous visitors see no private images at all
    let json: serde_json::Value = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["public_images"].as_array().unwrap().len(), 1);
    assert!(json["private_images"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn home_public_list_capped() {
    let (h, addr) = TestHarness::with_server().await;
    let store = h.store();
    for _ in 0..(PAGE_SIZE + 3) {
        store
            .create(NewImage::new(UserIdentity::new(BOB), vec![1, 2, 3], true))
            .unwrap();
    }

    let json: serde_json::Value = reqwest::get(format!("http://{addr}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["public_images"].as_array().unwrap().len(), PAGE_SIZE);
}

#[tokio::test]
async fn manage_requires_login() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/manage")).await.unwrap();
    assert_eq!(resp.status(), 401);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "You must be logged in");
}

#[tokio::test]
async fn manage_lists_own_images_newest_first() {
    let (h, addr) = TestHarness::with_server().await;
    let store = h.store();
    let alice = UserIdentity::new(ALICE);
    let now = Utc::now();

    let old = store
        .create(
            NewImage::new(alice.clone(), vec![1], true)
                .with_created_at(now - Duration::hours(2)),
        )
        .unwrap();
    let new = store
        .create(
            NewImage::new(alice.clone(), vec![2], false)
                .with_created_at(now - Duration::minutes(1)),
        )
        .unwrap();
    store
        .create(NewImage::new(UserIdentity::new(BOB), vec![3], true))
        .unwrap();

    let resp = client()
        .get(format!("http://{addr}/manage"))
        .header("cookie", h.session_cookie(ALICE))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["page_title"], "Gallery - Manage Images");
    let images = json["user_images"].as_array().unwrap();
    let ids: Vec<&str> = images.iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![new.token(), old.token()]);
}

#[tokio::test]
async fn about_page() {
    let (_h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/about")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["page_title"], "Gallery - About");
    assert!(json["about"]
        .as_str()
        .unwrap()
        .starts_with("Gallery is a simple web application"));
}

#[tokio::test]
async fn img_serves_png_bytes() {
    let (h, addr) = TestHarness::with_server().await;
    let bytes = png(16, 16);
    let id = h
        .store()
        .create(NewImage::new(UserIdentity::new(ALICE), bytes.clone(), true))
        .unwrap();

    let resp = reqwest::get(format!("http://{addr}/img?img_id={}", id.token()))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "image/png"
    );
    assert_eq!(resp.bytes().await.unwrap().to_vec(), bytes);
}

#[tokio::test]
async fn img_token_grants_access_to_private_image() {
    let (h, addr) = TestHarness::with_server().await;
    let id = h
        .store()
        .create(NewImage::new(UserIdentity::new(ALICE), vec![9, 9, 9], false))
        .unwrap();

    // Anonymous, not the owner, yet the token is enough
    let resp = reqwest::get(format!("http://{addr}/img?img_id={}", id.token()))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.unwrap().to_vec(), vec![9, 9, 9]);
}

#[tokio::test]
async fn img_unknown_malformed_and_missing_are_404() {
    let (_h, addr) = TestHarness::with_server().await;

    for url in [
        format!("http://{addr}/img?img_id={}", ImageId::new().token()),
        format!("http://{addr}/img?img_id=not-a-token"),
        format!("http://{addr}/img"),
    ] {
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), 404, "{url}");
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["error"], "Not found");
    }
}

#[tokio::test]
async fn health_check() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
}
