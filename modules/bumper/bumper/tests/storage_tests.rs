#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Domain services against the sea-orm repositories on in-memory SQLite.

mod common;

use bumper::domain::error::DomainError;
use bumper::{Bumper, IncidentStatus, NewPhoto, UserPatch};
use bumper_sdk::{NearbyQuery, SessionStatus};
use common::{
    inmem_db, module, module_with, new_incident, seed_incident_at, seed_user, test_config,
};
use sea_orm::ConnectionTrait;
use time::macros::datetime;

#[tokio::test]
async fn register_and_look_up_users() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;

    assert!(ana.id > 0);
    assert_eq!(ana.incident_count, 0);
    assert_eq!(ana.session_status, SessionStatus::Inactive);

    let by_email = svc.users.find_by_email("ana@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(ana.id));
    assert!(svc.users.find_by_id(ana.id + 100).await.unwrap().is_none());

    let dup = svc
        .users
        .register_user(bumper::NewUser {
            first_name: "Otra".to_owned(),
            last_name: "Persona".to_owned(),
            email: "ana@example.com".to_owned(),
            password: "x".to_owned(),
        })
        .await;
    assert!(matches!(dup, Err(DomainError::EmailAlreadyExists { .. })));
}

#[tokio::test]
async fn batch_lookup_skips_unknown_ids() {
    let svc = module().await.services();
    let a = seed_user(&svc, "a@example.com").await;
    let b = seed_user(&svc, "b@example.com").await;

    let found = svc.users.find_by_ids(&[b.id, 999, a.id]).await.unwrap();
    let ids: Vec<i64> = found.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
}

#[tokio::test]
async fn login_marks_user_active_and_logout_inactive() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;

    let outcome = svc
        .users
        .validate_credentials("ana@example.com", "secreto")
        .await
        .unwrap();
    assert_eq!(outcome.user.session_status, SessionStatus::Active);
    let verified = svc.users.authenticate(&outcome.session.token).unwrap();
    assert_eq!(verified.user_id, ana.id);

    let wrong = svc
        .users
        .validate_credentials("ana@example.com", "otro")
        .await;
    assert!(matches!(wrong, Err(DomainError::InvalidCredentials)));

    svc.users.logout(ana.id).await.unwrap();
    let after = svc.users.get_user(ana.id).await.unwrap();
    assert_eq!(after.session_status, SessionStatus::Inactive);
}

#[tokio::test]
async fn profile_update_rejects_taken_email() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;
    seed_user(&svc, "luis@example.com").await;

    let taken = svc
        .users
        .update_user(
            ana.id,
            UserPatch {
                email: Some("luis@example.com".to_owned()),
                ..UserPatch::default()
            },
        )
        .await;
    assert!(matches!(taken, Err(DomainError::EmailAlreadyExists { .. })));

    let renamed = svc
        .users
        .update_user(
            ana.id,
            UserPatch {
                first_name: Some("Ana Maria".to_owned()),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.first_name, "Ana Maria");
    assert_eq!(renamed.email, "ana@example.com");

    svc.users.update_password(ana.id, "nuevo").await.unwrap();
    assert!(
        svc.users
            .validate_credentials("ana@example.com", "nuevo")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn creating_incidents_bumps_the_owner_counter() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;

    let incident = svc
        .incidents
        .create_incident(new_incident(ana.id, 19.43, -99.13))
        .await
        .unwrap();
    assert_eq!(incident.status, IncidentStatus::Pending);
    assert!(incident.photos.is_empty());
    svc.incidents
        .create_incident(new_incident(ana.id, 19.44, -99.14))
        .await
        .unwrap();

    let ana = svc.users.get_user(ana.id).await.unwrap();
    assert_eq!(ana.incident_count, 2);

    let missing_owner = svc
        .incidents
        .create_incident(new_incident(ana.id + 50, 19.43, -99.13))
        .await;
    assert!(matches!(
        missing_owner,
        Err(DomainError::UserNotFound { .. })
    ));
}

#[tokio::test]
async fn listings_are_newest_first_and_filter_by_state() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;
    let old = seed_incident_at(&svc, ana.id, 19.4, -99.1, datetime!(2024-01-01 08:00 UTC)).await;
    let new = seed_incident_at(&svc, ana.id, 19.5, -99.2, datetime!(2024-03-01 08:00 UTC)).await;

    let all = svc.incidents.list_incidents().await.unwrap();
    let ids: Vec<i64> = all.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![new.id, old.id]);

    svc.incidents
        .update_status(old.id, "RESUELTO")
        .await
        .unwrap()
        .unwrap();
    let resolved = svc.incidents.list_by_status("RESUELTO").await.unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, old.id);
    assert!(svc.incidents.list_by_status("CERRADO").await.unwrap().is_empty());

    let unknown = svc.incidents.update_status(old.id + 100, "RESUELTO").await;
    assert!(matches!(unknown, Ok(None)));
}

#[tokio::test]
async fn proximity_search_orders_by_distance() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;
    let when = datetime!(2024-05-01 12:00 UTC);
    // Zocalo, Mexico City
    let center = seed_incident_at(&svc, ana.id, 19.4326, -99.1332, when).await;
    // ~3 km north
    let near = seed_incident_at(&svc, ana.id, 19.4596, -99.1332, when).await;
    // Guadalajara, ~460 km away
    seed_incident_at(&svc, ana.id, 20.6597, -103.3496, when).await;

    let found = svc
        .incidents
        .nearby(NearbyQuery {
            latitude: 19.4326,
            longitude: -99.1332,
            radius_km: 10.0,
        })
        .await
        .unwrap();
    let ids: Vec<i64> = found.iter().map(|n| n.incident.id).collect();
    assert_eq!(ids, vec![center.id, near.id]);
    assert!(found[0].distance_km < 1e-6);
    assert!((found[1].distance_km - 3.0).abs() < 0.1);

    let nothing = svc
        .incidents
        .nearby(NearbyQuery {
            latitude: 120.0,
            longitude: 0.0,
            radius_km: 10.0,
        })
        .await
        .unwrap();
    assert!(nothing.is_empty());
}

#[tokio::test]
async fn photos_are_capped_and_removed_with_their_incident() {
    let mut cfg = test_config();
    cfg.max_photos_per_incident = 2;
    let svc = module_with(&cfg).await.services();
    let ana = seed_user(&svc, "ana@example.com").await;
    let incident = svc
        .incidents
        .create_incident(new_incident(ana.id, 19.43, -99.13))
        .await
        .unwrap();

    for n in 0..2 {
        svc.photos
            .add_photo(NewPhoto {
                incident_id: incident.id,
                url: format!("https://img.example.com/{n}.jpg"),
                description: None,
            })
            .await
            .unwrap();
    }
    let third = svc
        .photos
        .add_photo(NewPhoto {
            incident_id: incident.id,
            url: "https://img.example.com/2.jpg".to_owned(),
            description: None,
        })
        .await;
    assert!(matches!(
        third,
        Err(DomainError::PhotoLimitReached { max: 2 })
    ));

    let loaded = svc.incidents.get_incident(incident.id).await.unwrap();
    assert_eq!(loaded.photos.len(), 2);
    assert_eq!(loaded.photos[0].url, "https://img.example.com/0.jpg");

    svc.incidents.delete_incident(incident.id).await.unwrap();
    let gone = svc.photos.list_photos(incident.id).await;
    assert!(matches!(gone, Err(DomainError::IncidentNotFound { .. })));
    let orphan = svc.photos.delete_photo(loaded.photos[0].id, ana.id).await;
    assert!(matches!(orphan, Err(DomainError::PhotoNotFound { .. })));
}

#[tokio::test]
async fn only_the_owner_can_touch_photos() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;
    let luis = seed_user(&svc, "luis@example.com").await;
    let incident = svc
        .incidents
        .create_incident(new_incident(ana.id, 19.43, -99.13))
        .await
        .unwrap();
    let photo = svc
        .photos
        .add_photo(NewPhoto {
            incident_id: incident.id,
            url: "https://img.example.com/a.jpg".to_owned(),
            description: Some("frente".to_owned()),
        })
        .await
        .unwrap();

    let denied = svc
        .photos
        .update_description(photo.id, luis.id, Some("otra".to_owned()))
        .await;
    assert!(matches!(denied, Err(DomainError::Forbidden { .. })));

    let cleared = svc
        .photos
        .update_description(photo.id, ana.id, None)
        .await
        .unwrap();
    assert_eq!(cleared.description, None);

    svc.photos.delete_photo(photo.id, ana.id).await.unwrap();
    assert!(svc.photos.list_photos(incident.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn batch_lookup_handles_more_ids_than_one_query_can_bind() {
    let svc = module().await.services();
    let a = seed_user(&svc, "a@example.com").await;
    let b = seed_user(&svc, "b@example.com").await;

    let mut ids: Vec<i64> = (1..=40_000).rev().collect();
    ids.push(a.id);
    let found = svc.users.find_by_ids(&ids).await.unwrap();
    let found: Vec<i64> = found.iter().map(|u| u.id).collect();
    assert_eq!(found, vec![a.id, b.id]);
}

#[tokio::test]
async fn large_listings_load_photos_in_chunks() {
    let db = inmem_db().await;
    let svc = Bumper::init(db.clone(), &test_config()).unwrap().services();
    let ana = seed_user(&svc, "ana@example.com").await;

    db.execute_unprepared(&format!(
        "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 40000) \
         INSERT INTO incidentes \
         (usuario_id, tipo_incidente, ubicacion, latitud, longitud, hora_incidente, tipo_vialidad, estado) \
         SELECT {}, 'BACHE', 'Av. Reforma', 19.4, -99.1, 1700000000000000 + n, 'AVENIDA', 'PENDIENTE' \
         FROM seq",
        ana.id
    ))
    .await
    .unwrap();

    let all = svc.incidents.list_incidents().await.unwrap();
    assert_eq!(all.len(), 40_000);
    let newest = all[0].id;
    let oldest = all[all.len() - 1].id;
    for (incident_id, url) in [
        (newest, "https://img.example.com/new.jpg"),
        (oldest, "https://img.example.com/old.jpg"),
    ] {
        svc.photos
            .add_photo(NewPhoto {
                incident_id,
                url: url.to_owned(),
                description: None,
            })
            .await
            .unwrap();
    }

    let all = svc.incidents.list_incidents().await.unwrap();
    assert_eq!(all[0].photos.len(), 1);
    assert_eq!(all[0].photos[0].url, "https://img.example.com/new.jpg");
    assert_eq!(all[all.len() - 1].photos[0].url, "https://img.example.com/old.jpg");
    assert_eq!(all.iter().map(|i| i.photos.len()).sum::<usize>(), 2);

    let pending = svc.incidents.list_by_status("PENDIENTE").await.unwrap();
    assert_eq!(pending.len(), 40_000);
}

#[tokio::test]
async fn sub_second_times_sort_newest_first() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;
    let whole =
        seed_incident_at(&svc, ana.id, 19.4, -99.1, datetime!(2024-05-01 10:00:00 UTC)).await;
    let later =
        seed_incident_at(&svc, ana.id, 19.4, -99.1, datetime!(2024-05-01 10:00:00.5 UTC)).await;

    let ids: Vec<i64> = svc
        .incidents
        .list_user_incidents(ana.id)
        .await
        .unwrap()
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec![later.id, whole.id]);

    let stored = svc.incidents.get_incident(later.id).await.unwrap();
    assert_eq!(stored.occurred_at, datetime!(2024-05-01 10:00:00.5 UTC));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_photo_uploads_respect_the_cap() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;
    let incident = svc
        .incidents
        .create_incident(new_incident(ana.id, 19.43, -99.13))
        .await
        .unwrap();
    let incident_id = incident.id;

    let uploads: Vec<_> = (0..10)
        .map(|n| {
            let svc = svc.clone();
            tokio::spawn(async move {
                svc.photos
                    .add_photo(NewPhoto {
                        incident_id,
                        url: format!("https://img.example.com/{n}.jpg"),
                        description: None,
                    })
                    .await
            })
        })
        .collect();

    let mut stored = 0;
    for upload in uploads {
        match upload.await.unwrap() {
            Ok(_) => stored += 1,
            Err(err) => assert!(
                matches!(err, DomainError::PhotoLimitReached { max: 5 }),
                "unexpected error: {err}"
            ),
        }
    }
    assert_eq!(stored, 5);
    assert_eq!(svc.photos.list_photos(incident_id).await.unwrap().len(), 5);
}

#[tokio::test]
async fn proximity_ties_are_broken_by_recency() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;
    let older =
        seed_incident_at(&svc, ana.id, 19.4326, -99.1332, datetime!(2024-01-01 08:00 UTC)).await;
    let newer =
        seed_incident_at(&svc, ana.id, 19.4326, -99.1332, datetime!(2024-06-01 08:00 UTC)).await;
    let farther =
        seed_incident_at(&svc, ana.id, 19.4426, -99.1332, datetime!(2024-12-01 08:00 UTC)).await;

    let found = svc
        .incidents
        .nearby(NearbyQuery {
            latitude: 19.4326,
            longitude: -99.1332,
            radius_km: 5.0,
        })
        .await
        .unwrap();
    let ids: Vec<i64> = found.iter().map(|n| n.incident.id).collect();
    assert_eq!(ids, vec![newer.id, older.id, farther.id]);
}

#[tokio::test]
async fn proximity_search_crosses_the_antimeridian() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;
    let when = datetime!(2024-05-01 12:00 UTC);
    // ~2.2 km east of the query point, on the other side of 180
    let across = seed_incident_at(&svc, ana.id, 0.0, -179.99, when).await;
    // ~1100 km west
    seed_incident_at(&svc, ana.id, 0.0, 170.0, when).await;

    let found = svc
        .incidents
        .nearby(NearbyQuery {
            latitude: 0.0,
            longitude: 179.99,
            radius_km: 10.0,
        })
        .await
        .unwrap();
    let ids: Vec<i64> = found.iter().map(|n| n.incident.id).collect();
    assert_eq!(ids, vec![across.id]);
    assert!((found[0].distance_km - 2.22).abs() < 0.05, "got {}", found[0].distance_km);
}

#[tokio::test]
async fn proximity_search_near_a_pole_spans_every_meridian() {
    let svc = module().await.services();
    let ana = seed_user(&svc, "ana@example.com").await;
    let when = datetime!(2024-05-01 12:00 UTC);
    // opposite side of the pole, ~2.2 km away
    let over_the_pole = seed_incident_at(&svc, ana.id, 89.99, -170.0, when).await;
    seed_incident_at(&svc, ana.id, 89.0, 10.0, when).await;

    let found = svc
        .incidents
        .nearby(NearbyQuery {
            latitude: 89.99,
            longitude: 10.0,
            radius_km: 5.0,
        })
        .await
        .unwrap();
    let ids: Vec<i64> = found.iter().map(|n| n.incident.id).collect();
    assert_eq!(ids, vec![over_the_pole.id]);
}
