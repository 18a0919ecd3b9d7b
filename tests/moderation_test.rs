#[macro_use]
mod helpers;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use helpers::*;
use melody::models::album_models::NewAlbum;
use melody::models::song_models::NewSong;
use melody::store::CatalogStore;

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[actix_web::test]
async fn artist_upload_is_hidden_until_an_admin_approves_it() {
    let h = Harness::new();
    let app = test_app!(h);

    // Artist uploads a song.
    let (content_type, body) = multipart(
        &[("title", "First Light"), ("artist", "The Testers"), ("duration", "215")],
        &[("audioFile", "first-light.mp3", b"ID3-audio"), ("imageFile", "cover.png", b"PNG-image")],
    );
    let req = test::TestRequest::post()
        .uri("/api/artist/songs")
        .insert_header(bearer(ARTIST))
        .insert_header(content_type)
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let song: Value = test::read_body_json(resp).await;
    let song_id = song["id"].as_str().unwrap().to_string();
    assert_eq!(song["isApproved"], false);
    assert_eq!(song["duration"], 215);
    assert_eq!(song["audioUrl"], "https://media.test/audio/0");
    assert_eq!(song["imageUrl"], "https://media.test/images/1");
    assert_eq!(h.media.upload_count(), 2);

    // Staged files are gone once the request is done.
    assert_eq!(std::fs::read_dir(h.upload_dir.path()).unwrap().count(), 0);

    // A fan can neither see nor favorite it.
    let req = test::TestRequest::get().uri("/api/songs").insert_header(bearer(FAN)).to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert!(!ids(&listed).contains(&song_id));

    let req = test::TestRequest::post()
        .uri("/api/favorites")
        .insert_header(bearer(FAN))
        .set_json(json!({ "songId": song_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Cannot favorite unapproved song");

    // The admin sees it as pending and approves it.
    let req = test::TestRequest::get().uri("/api/admin/songs/pending").insert_header(bearer(ADMIN)).to_request();
    let pending: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&pending), vec![song_id.clone()]);

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/songs/{song_id}/approve"))
        .insert_header(bearer(ADMIN))
        .to_request();
    let approved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(approved["isApproved"], true);

    // Now it is public and favoritable.
    let req = test::TestRequest::get().uri("/api/songs").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert!(ids(&listed).contains(&song_id));

    let req = test::TestRequest::post()
        .uri("/api/favorites")
        .insert_header(bearer(FAN))
        .set_json(json!({ "songId": song_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let favorite: Value = test::read_body_json(resp).await;
    assert_eq!(favorite["song"]["id"], song_id.as_str());

    // The artist sees their upload.
    let req = test::TestRequest::get().uri("/api/artist/uploads").insert_header(bearer(ARTIST)).to_request();
    let uploads: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&uploads["songs"]), vec![song_id]);
    assert_eq!(uploads["albums"], json!([]));
}

#[actix_web::test]
async fn uploads_without_both_files_are_rejected() {
    let h = Harness::new();
    let app = test_app!(h);

    let (content_type, body) = multipart(
        &[("title", "Half"), ("artist", "Band"), ("duration", "10")],
        &[("audioFile", "half.mp3", b"audio")],
    );
    let req = test::TestRequest::post()
        .uri("/api/artist/songs")
        .insert_header(bearer(ARTIST))
        .insert_header(content_type)
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Please upload all files");
    assert_eq!(h.media.upload_count(), 0);
}

#[actix_web::test]
async fn oversized_files_are_rejected() {
    let h = Harness::new();
    let app = test_app!(h);

    let big = vec![7u8; 4096];
    let (content_type, body) = multipart(
        &[("title", "Big"), ("artist", "Band"), ("releaseYear", "2024")],
        &[("imageFile", "huge.png", big.as_slice())],
    );
    let req = test::TestRequest::post()
        .uri("/api/artist/albums")
        .insert_header(bearer(ARTIST))
        .insert_header(content_type)
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(h.media.upload_count(), 0);
}

#[actix_web::test]
async fn admin_uploads_are_published_immediately() {
    let h = Harness::new();
    let app = test_app!(h);

    let (content_type, body) = multipart(
        &[("title", "Anthology"), ("artist", "Band"), ("releaseYear", "1999")],
        &[("imageFile", "cover.jpg", b"jpeg")],
    );
    let req = test::TestRequest::post()
        .uri("/api/admin/albums")
        .insert_header(bearer(ADMIN))
        .insert_header(content_type)
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let album: Value = test::read_body_json(resp).await;
    assert_eq!(album["isApproved"], true);
    assert_eq!(album["releaseYear"], 1999);
    let album_id = album["id"].as_str().unwrap();

    let (content_type, body) = multipart(
        &[("title", "Track 1"), ("artist", "Band"), ("duration", "180"), ("albumId", album_id)],
        &[("audioFile", "t1.mp3", b"a"), ("imageFile", "t1.png", b"i")],
    );
    let req = test::TestRequest::post()
        .uri("/api/admin/songs")
        .insert_header(bearer(ADMIN))
        .insert_header(content_type)
        .set_payload(body)
        .to_request();
    let song: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(song["isApproved"], true);
    assert_eq!(song["albumId"], album_id);

    let req = test::TestRequest::get().uri(&format!("/api/albums/{album_id}")).to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["title"], "Anthology");
    assert_eq!(ids(&detail["songs"]), vec![song["id"].as_str().unwrap().to_string()]);
}

#[actix_web::test]
async fn admin_updates_song_fields_and_detaches_album() {
    let h = Harness::new();
    let album = h
        .store
        .insert_album(NewAlbum::new("LP".into(), "Band".into(), 2001, "cover".into()))
        .unwrap();
    let mut song = NewSong::new("Old".into(), "Band".into(), 100, "a".into(), "i".into());
    song.album_id = Some(album.id.clone());
    let song = h.store.insert_song(song).unwrap();
    let app = test_app!(h);

    let (content_type, body) = multipart(&[("title", "New"), ("albumId", "")], &[("imageFile", "new.png", b"img")]);
    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/songs/{}", song.id))
        .insert_header(bearer(ADMIN))
        .insert_header(content_type)
        .set_payload(body)
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(updated["title"], "New");
    assert_eq!(updated["artist"], "Band");
    assert_eq!(updated["albumId"], Value::Null);
    assert_eq!(updated["imageUrl"], "https://media.test/images/0");

    let (content_type, body) = multipart(&[("title", "Ghost")], &[]);
    let req = test::TestRequest::put()
        .uri("/api/admin/songs/missing")
        .insert_header(bearer(ADMIN))
        .insert_header(content_type)
        .set_payload(body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn album_approval_cascades_to_songs_but_rejection_does_not() {
    let h = Harness::new();
    let album = h
        .store
        .insert_album(NewAlbum::new("Pending LP".into(), "Band".into(), 2024, "cover".into()))
        .unwrap();
    let mut track_ids = Vec::new();
    for title in ["one", "two"] {
        let mut song = NewSong::new(title.into(), "Band".into(), 100, "a".into(), "i".into());
        song.album_id = Some(album.id.clone());
        track_ids.push(h.store.insert_song(song).unwrap().id);
    }
    let app = test_app!(h);

    // Hidden album looks missing to the public.
    let req = test::TestRequest::get().uri(&format!("/api/albums/{}", album.id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/albums/{}/approve", album.id))
        .insert_header(bearer(ADMIN))
        .to_request();
    let approved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(approved["isApproved"], true);
    for id in &track_ids {
        assert_eq!(h.store.find_song(id).unwrap().unwrap().is_approved, Some(true));
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/albums/{}/reject", album.id))
        .insert_header(bearer(ADMIN))
        .to_request();
    let rejected: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rejected["isApproved"], false);
    for id in &track_ids {
        assert_eq!(h.store.find_song(id).unwrap().unwrap().is_approved, Some(true));
    }

    // Rejected album disappears from the public list but stays pending for admins.
    let req = test::TestRequest::get().uri("/api/albums").to_request();
    let public: Value = test::call_and_read_body_json(&app, req).await;
    assert!(ids(&public).is_empty());

    let req = test::TestRequest::get().uri("/api/admin/albums/pending").insert_header(bearer(ADMIN)).to_request();
    let pending: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&pending), vec![album.id.clone()]);

    let req = test::TestRequest::get().uri("/api/albums").insert_header(bearer(ADMIN)).to_request();
    let everything: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&everything), vec![album.id]);
}

#[actix_web::test]
async fn deleting_an_album_removes_its_songs() {
    let h = Harness::new();
    let mut album = NewAlbum::new("Doomed".into(), "Band".into(), 2010, "cover".into());
    album.is_approved = Some(true);
    let album = h.store.insert_album(album).unwrap();
    let mut member = NewSong::new("member".into(), "Band".into(), 100, "a".into(), "i".into());
    member.album_id = Some(album.id.clone());
    member.is_approved = Some(true);
    let member = h.store.insert_song(member).unwrap();
    let app = test_app!(h);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/albums/{}", album.id))
        .insert_header(bearer(ADMIN))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Album deleted successfully");

    let req = test::TestRequest::get().uri(&format!("/api/albums/{}", album.id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    assert!(h.store.find_song(&member.id).unwrap().is_none());

    let req = test::TestRequest::post().uri(&format!("/api/songs/{}/play", member.id)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/albums/{}", album.id))
        .insert_header(bearer(ADMIN))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn legacy_songs_stay_visible_and_can_be_bulk_approved() {
    let h = Harness::new();
    let mut legacy = NewSong::new("legacy".into(), "Old Band".into(), 100, "a".into(), "i".into());
    legacy.is_approved = None;
    let legacy = h.store.insert_song(legacy).unwrap();
    let rejected = h
        .store
        .insert_song(NewSong::new("rejected".into(), "Band".into(), 100, "a".into(), "i".into()))
        .unwrap();
    let app = test_app!(h);

    let req = test::TestRequest::get().uri("/api/songs").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&listed), vec![legacy.id.clone()]);

    let req = test::TestRequest::post()
        .uri("/api/admin/songs/approve-all-existing")
        .insert_header(bearer(ADMIN))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["modifiedCount"], 2);
    assert_eq!(body["message"], "Approved 2 existing songs");

    let req = test::TestRequest::get().uri("/api/songs").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&listed), vec![rejected.id, legacy.id]);
}

#[actix_web::test]
async fn song_moderation_never_touches_its_album() {
    let h = Harness::new();
    let album = h
        .store
        .insert_album(NewAlbum::new("Unreviewed LP".into(), "Band".into(), 2022, "cover".into()))
        .unwrap();
    let mut track = NewSong::new("single".into(), "Band".into(), 200, "a".into(), "i".into());
    track.album_id = Some(album.id.clone());
    let track = h.store.insert_song(track).unwrap();
    let app = test_app!(h);

    for (action, expected) in [("approve", true), ("reject", false)] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/admin/songs/{}/{action}", track.id))
            .insert_header(bearer(ADMIN))
            .to_request();
        let song: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(song["isApproved"], expected, "{action}");

        assert_eq!(h.store.find_song(&track.id).unwrap().unwrap().is_approved, Some(expected));
        assert_eq!(h.store.find_album(&album.id).unwrap().unwrap().is_approved, Some(false), "{action}");

        let req = test::TestRequest::get().uri("/api/songs").insert_header(bearer(FAN)).to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids(&listed).contains(&track.id), expected, "{action}");
    }

    let req = test::TestRequest::post()
        .uri("/api/admin/songs/missing/reject")
        .insert_header(bearer(ADMIN))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
