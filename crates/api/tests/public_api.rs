//! HTTP-level tests for the public pages.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, location, spawn_app};
use nimba_db::models::advertisement::CreateAdvertisement;
use serde_json::json;

fn article(title: &str, category_id: i64, published: bool, featured: bool) -> serde_json::Value {
    json!({
        "title": title,
        "body": format!("Corps de {title}"),
        "category_id": category_id,
        "is_published": published,
        "is_featured": featured,
    })
}

#[tokio::test]
async fn health_reports_ok_without_database() {
    let app = spawn_app().await;
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}

#[tokio::test]
async fn empty_home_has_categories_but_no_sections() {
    let app = spawn_app().await;
    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert!(data["featured"].is_null());
    assert_eq!(data["recent"].as_array().unwrap().len(), 0);
    assert_eq!(data["sections"].as_array().unwrap().len(), 0);
    assert_eq!(data["categories"].as_array().unwrap().len(), 7);
    assert_eq!(data["categories"][0]["key"], "politique");
}

#[tokio::test]
async fn featured_article_falls_back_to_latest() {
    let app = spawn_app().await;
    let (_, token) = app.staff("redaction").await;
    let politique = app.category_id("politique").await;

    let first = app.create_article(&token, article("Premier", politique, true, false)).await;
    let second = app.create_article(&token, article("Second", politique, true, false)).await;

    let data = body_json(app.get("/").await).await["data"].clone();
    assert_eq!(data["featured"]["id"], second["article"]["id"]);
    let recent: Vec<_> = data["recent"].as_array().unwrap().iter().map(|a| a["id"].clone()).collect();
    assert_eq!(recent, vec![first["article"]["id"].clone()]);

    // An explicitly featured article wins over a newer one.
    let featured = app.create_article(&token, article("À la une", politique, true, true)).await;
    app.create_article(&token, article("Plus récent", politique, true, false)).await;
    let data = body_json(app.get("/").await).await["data"].clone();
    assert_eq!(data["featured"]["id"], featured["article"]["id"]);
    assert_eq!(data["featured"]["category"]["label"], "Politique");
    assert!(data["recent"]
        .as_array()
        .unwrap()
        .iter()
        .all(|a| a["id"] != featured["article"]["id"]));
}

#[tokio::test]
async fn unpublished_articles_never_appear_publicly() {
    let app = spawn_app().await;
    let (_, token) = app.staff("redaction").await;
    let sport = app.category_id("sport").await;

    let draft = app.create_article(&token, article("Brouillon", sport, false, true)).await;
    let draft_id = draft["article"]["id"].as_i64().unwrap();

    let home = body_json(app.get("/").await).await["data"].clone();
    assert!(home["featured"].is_null());
    assert!(home["sections"].as_array().unwrap().is_empty());

    let listing = body_json(app.get("/categorie/sport").await).await["data"].clone();
    assert!(listing["articles"].as_array().unwrap().is_empty());

    let response = app.get(&format!("/article/{draft_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn home_sections_skip_empty_categories_and_cap_previews() {
    let app = spawn_app().await;
    let (_, token) = app.staff("redaction").await;
    let culture = app.category_id("culture").await;
    for i in 0..4 {
        app.create_article(&token, article(&format!("Culture {i}"), culture, true, false)).await;
    }

    let data = body_json(app.get("/").await).await["data"].clone();
    let sections = data["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["category"]["key"], "culture");
    assert_eq!(sections[0]["articles"].as_array().unwrap().len(), 3);
    assert_eq!(sections[0]["articles"][0]["title"], "Culture 3");
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let app = spawn_app().await;
    let response = app.get("/categorie/meteo").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn each_visit_counts_a_view() {
    let app = spawn_app().await;
    let (_, token) = app.staff("redaction").await;
    let economie = app.category_id("economie").await;
    let created = app.create_article(&token, article("Marché", economie, true, false)).await;
    let id = created["article"]["id"].as_i64().unwrap();

    for visit in 1..=4 {
        let response = app.get(&format!("/article/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let data = body_json(response).await["data"].clone();
        assert_eq!(data["article"]["view_count"], visit);
    }
}

#[tokio::test]
async fn article_page_lists_similar_from_same_category() {
    let app = spawn_app().await;
    let (_, token) = app.staff("redaction").await;
    let diaspora = app.category_id("diaspora").await;
    let sport = app.category_id("sport").await;

    let main = app.create_article(&token, article("Principal", diaspora, true, false)).await;
    for i in 0..4 {
        app.create_article(&token, article(&format!("Voisin {i}"), diaspora, true, false)).await;
    }
    app.create_article(&token, article("Ailleurs", sport, true, false)).await;

    let id = main["article"]["id"].as_i64().unwrap();
    let data = body_json(app.get(&format!("/article/{id}")).await).await["data"].clone();
    let similar = data["similar"].as_array().unwrap();
    assert_eq!(similar.len(), 3);
    assert!(similar.iter().all(|a| a["category_id"] == diaspora && a["id"] != id));
}

#[tokio::test]
async fn only_valid_ads_are_shown_by_position() {
    let app = spawn_app().await;
    let author = app.create_user("regie", true).await;
    let now = Utc::now();
    let ad = |title: &str, position: &str, starts: i64, ends: i64| CreateAdvertisement {
        title: title.into(),
        description: None,
        image_path: format!("publicites/{title}.png"),
        link: None,
        position: position.into(),
        author_id: author.id,
        starts_at: now + Duration::hours(starts),
        ends_at: now + Duration::hours(ends),
    };

    app.repos.advertisements.create(&ad("bandeau", "header", -1, 24)).await.unwrap();
    app.repos.advertisements.create(&ad("futur", "header", 2, 24)).await.unwrap();
    app.repos.advertisements.create(&ad("expire", "sidebar", -48, -24)).await.unwrap();
    for i in 0..4 {
        app.repos
            .advertisements
            .create(&ad(&format!("cote{i}"), "sidebar", -1, 24))
            .await
            .unwrap();
    }
    let inactive = app.repos.advertisements.create(&ad("eteint", "sidebar", -1, 24)).await.unwrap();
    app.repos
        .advertisements
        .update(
            inactive.id,
            &nimba_db::models::advertisement::UpdateAdvertisement {
                title: inactive.title.clone(),
                description: None,
                image_path: None,
                link: None,
                position: "sidebar".into(),
                starts_at: inactive.starts_at,
                ends_at: inactive.ends_at,
                is_active: false,
            },
        )
        .await
        .unwrap();

    let data = body_json(app.get("/").await).await["data"].clone();
    assert_eq!(data["header_ad"]["title"], "bandeau");
    let sidebar = data["sidebar_ads"].as_array().unwrap();
    assert_eq!(sidebar.len(), 3);
    assert!(sidebar.iter().all(|a| a["position"] == "sidebar" && a["is_active"] == true));
    assert!(sidebar.iter().all(|a| a["title"] != "expire"));
}

#[tokio::test]
async fn ad_click_counts_and_redirects() {
    let app = spawn_app().await;
    let author = app.create_user("regie", true).await;
    let now = Utc::now();
    let make = |link: Option<&str>| CreateAdvertisement {
        title: "Banque".into(),
        description: None,
        image_path: "publicites/banque.png".into(),
        link: link.map(str::to_string),
        position: "footer".into(),
        author_id: author.id,
        starts_at: now - Duration::days(30),
        ends_at: now - Duration::days(1),
    };
    // Clicks are counted even outside the display window.
    let linked = app.repos.advertisements.create(&make(Some("https://banque.example"))).await.unwrap();
    let bare = app.repos.advertisements.create(&make(None)).await.unwrap();

    let response = app.get(&format!("/publicite/{}/clic", linked.id)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "https://banque.example");

    let response = app.get(&format!("/publicite/{}/clic", bare.id)).await;
    assert_eq!(location(&response), "/");

    app.get(&format!("/publicite/{}/clic", linked.id)).await;
    let stored = app.repos.advertisements.find_by_id(linked.id).await.unwrap().unwrap();
    assert_eq!(stored.click_count, 2);

    let response = app.get("/publicite/999999/clic").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stored_link_unusable_as_header_redirects_home() {
    let app = spawn_app().await;
    let author = app.create_user("regie", true).await;
    let now = Utc::now();
    let ad = app
        .repos
        .advertisements
        .create(&CreateAdvertisement {
            title: "Ancienne".into(),
            description: None,
            image_path: "publicites/ancienne.png".into(),
            link: Some("https://exemple.gn/a\u{1}b".into()),
            position: "footer".into(),
            author_id: author.id,
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
        })
        .await
        .unwrap();

    let response = app.get(&format!("/publicite/{}/clic", ad.id)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let stored = app.repos.advertisements.find_by_id(ad.id).await.unwrap().unwrap();
    assert_eq!(stored.click_count, 1);
}

#[tokio::test]
async fn home_caps_recent_articles_at_ten() {
    let app = spawn_app().await;
    let (_, token) = app.staff("redaction").await;
    let culture = app.category_id("culture").await;

    let featured = app
        .create_article(&token, article("À la une", culture, true, true))
        .await;
    for n in 1..=12 {
        app.create_article(&token, article(&format!("Brève {n}"), culture, true, false))
            .await;
    }

    let data = body_json(app.get("/").await).await["data"].clone();
    assert_eq!(data["featured"]["id"], featured["article"]["id"]);
    let recent = data["recent"].as_array().unwrap();
    assert_eq!(recent.len(), 10);
    assert!(recent.iter().all(|a| a["id"] != featured["article"]["id"]));
    assert_eq!(recent[0]["title"], "Brève 12");
    assert_eq!(recent[9]["title"], "Brève 3");
}
