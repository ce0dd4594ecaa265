//! Tests for LocalRepository.
//!
//! These cover concurrent access, shared clones and the batch congestion
//! update for the in-memory repository.

mod support;

use std::sync::Arc;

use airnav::db::repository::{LocationRepository, MapRepository, PathRepository, WallRepository};
use airnav::db::LocalRepository;
use airnav::models::{LocationId, LocationUpdate, NewLocation, NewPath, PathId, PathUpdate};

#[tokio::test]
async fn test_concurrent_location_creates_get_unique_ids() {
    let repo = Arc::new(LocalRepository::new());

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                repo.create_location(NewLocation::new(
                    format!("Gate {}", i),
                    "gate",
                    i as f64,
                    0.0,
                ))
                .await
                .unwrap()
                .id
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
    assert_eq!(repo.location_count(), 20);
}

#[tokio::test]
async fn test_concurrent_reads_during_congestion_updates() {
    let repo = support::triangle_repo().await;

    let writer = {
        let repo = repo.clone();
        tokio::spawn(async move {
            for level in 1..=10 {
                let updates: Vec<(PathId, i32)> =
                    (1..=3).map(|id| (PathId(id), level)).collect();
                repo.update_path_congestion(&updates).await.unwrap();
            }
        })
    };

    let reader = {
        let repo = repo.clone();
        tokio::spawn(async move {
            for _ in 0..10 {
                let paths = repo.list_paths().await.unwrap();
                // Batches land atomically: every snapshot is uniform.
                let first = paths[0].congestion;
                assert!(paths.iter().all(|p| p.congestion == first));
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
    assert!(repo
        .list_paths()
        .await
        .unwrap()
        .iter()
        .all(|p| p.congestion == 10));
}

#[tokio::test]
async fn test_clones_share_state() {
    let repo = LocalRepository::new();
    let other = repo.clone();
    repo.create_location(NewLocation::new("Lounge", "lounge", 1.0, 1.0))
        .await
        .unwrap();
    assert_eq!(other.list_locations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_usable_as_trait_object() {
    let repo: Arc<dyn MapRepository> = Arc::new(support::triangle_repo().await);
    assert!(repo.health_check().await.unwrap());
    assert_eq!(repo.list_locations().await.unwrap().len(), 3);
    assert_eq!(repo.list_paths().await.unwrap().len(), 3);
    assert!(repo.list_walls().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_updates_keep_other_fields() {
    let repo = support::triangle_repo().await;

    let location = repo
        .update_location(
            LocationId(3),
            LocationUpdate {
                description: Some("Between the gates".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(location.name, "Node 3");
    assert_eq!(location.description.as_deref(), Some("Between the gates"));

    let path = repo
        .update_path(
            PathId(1),
            PathUpdate {
                distance: Some(12.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(path.distance, 12.5);
    assert_eq!(path.source_id, LocationId(1));
    assert_eq!(path.destination_id, LocationId(2));
}

#[tokio::test]
async fn test_deletes_return_removed_entity() {
    let repo = support::triangle_repo().await;
    let path = repo.delete_path(PathId(2)).await.unwrap();
    assert_eq!(path.distance, 7.0);
    assert!(repo.get_path(PathId(2)).await.unwrap_err().is_not_found());

    let created = repo
        .create_path(NewPath::new(2, 3, 4.0).with_congestion(5))
        .await
        .unwrap();
    assert_eq!(created.id, PathId(4));
    assert_eq!(created.congestion, 5);
}
