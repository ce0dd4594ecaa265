//! Tests for the validated CRUD layer in `db::services`.

mod support;

use airnav::db::repository::LocationRepository;
use airnav::db::services;
use airnav::db::LocalRepository;
use airnav::models::{
    LocationId, LocationUpdate, NewLocation, NewPath, NewWall, PathId, PathUpdate, WallId,
};

#[tokio::test]
async fn test_create_location_rejects_bad_names() {
    let repo = LocalRepository::new();

    let empty = services::create_location(&repo, NewLocation::new("   ", "gate", 0.0, 0.0)).await;
    assert!(empty.unwrap_err().is_validation());

    let long_name = "x".repeat(services::MAX_NAME_LEN + 1);
    let long = services::create_location(&repo, NewLocation::new(long_name, "gate", 0.0, 0.0)).await;
    assert!(long.unwrap_err().is_validation());

    let exact = "y".repeat(services::MAX_NAME_LEN);
    assert!(
        services::create_location(&repo, NewLocation::new(exact, "gate", 0.0, 0.0))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_create_location_rejects_non_finite_coordinates() {
    let repo = LocalRepository::new();
    for (x, y) in [(f64::NAN, 0.0), (0.0, f64::INFINITY)] {
        let err = services::create_location(&repo, NewLocation::new("Gate", "gate", x, y))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
    assert_eq!(repo.location_count(), 0);
}

#[tokio::test]
async fn test_create_path_rejects_bad_distance_and_congestion() {
    let repo = support::triangle_repo().await;

    for distance in [0.0, -3.0, f64::NAN] {
        let err = services::create_path(&repo, NewPath::new(1, 2, distance))
            .await
            .unwrap_err();
        assert!(err.is_validation(), "distance {} accepted", distance);
    }

    for congestion in [0, 11] {
        let err = services::create_path(&repo, NewPath::new(1, 2, 5.0).with_congestion(congestion))
            .await
            .unwrap_err();
        assert!(err.is_validation(), "congestion {} accepted", congestion);
    }

    assert_eq!(repo.path_count(), 3);
}

#[tokio::test]
async fn test_create_path_requires_existing_endpoints() {
    let repo = support::triangle_repo().await;
    let err = services::create_path(&repo, NewPath::new(1, 77, 5.0))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.message().contains("Destination location 77"));
}

#[tokio::test]
async fn test_update_path_validates_changed_fields() {
    let repo = support::triangle_repo().await;

    let err = services::update_path(
        &repo,
        PathId(1),
        PathUpdate {
            congestion: Some(42),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_validation());

    let err = services::update_path(
        &repo,
        PathId(1),
        PathUpdate {
            source_id: Some(LocationId(500)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_validation());

    let missing = services::update_path(&repo, PathId(99), PathUpdate::default())
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn test_update_location_validates_name() {
    let repo = support::triangle_repo().await;
    let err = services::update_location(
        &repo,
        LocationId(1),
        LocationUpdate {
            name: Some(String::new()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_validation());

    let renamed = services::update_location(
        &repo,
        LocationId(1),
        LocationUpdate {
            name: Some("Gate C1".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.name, "Gate C1");
}

#[tokio::test]
async fn test_delete_referenced_location_is_rejected() {
    let repo = support::triangle_repo().await;

    let err = services::delete_location(&repo, LocationId(3))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.message().contains("referenced by 2 path(s)"));

    services::delete_path(&repo, PathId(2)).await.unwrap();
    services::delete_path(&repo, PathId(3)).await.unwrap();
    let deleted = services::delete_location(&repo, LocationId(3)).await.unwrap();
    assert_eq!(deleted.name, "Node 3");
    assert!(repo.get_location(LocationId(3)).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_missing_location_is_not_found() {
    let repo = support::triangle_repo().await;
    let err = services::delete_location(&repo, LocationId(404))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_walls_accept_zero_length_but_not_nan() {
    let repo = LocalRepository::new();
    let point = services::create_wall(&repo, NewWall::new(3.0, 3.0, 3.0, 3.0))
        .await
        .unwrap();
    assert_eq!(point.id, WallId(1));

    let err = services::create_wall(&repo, NewWall::new(0.0, f64::NAN, 1.0, 1.0))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert!(services::delete_wall(&repo, WallId(9)).await.unwrap_err().is_not_found());
    services::delete_wall(&repo, point.id).await.unwrap();
    assert_eq!(repo.wall_count(), 0);
}
