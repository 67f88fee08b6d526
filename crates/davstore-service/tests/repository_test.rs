//! Repository behaviour against a live database.

mod helpers;

use uuid::Uuid;

use davstore_core::error::ErrorKind;
use davstore_database::connection::commit;
use davstore_database::repositories::CollectionRepository;
use davstore_entity::collection::{CollectionTag, NewCollection};
use davstore_entity::node::Depth;
use davstore_entity::time::now_ms;

use helpers::TestStore;

fn child(parent_id: Uuid, name: &str) -> NewCollection {
    NewCollection {
        id: Uuid::new_v4(),
        parent_id: Some(parent_id),
        domain_id: 1,
        name: Some(name.to_string()),
        tag: CollectionTag::None,
    }
}

#[tokio::test]
async fn test_duplicate_name_is_conflict_and_rolls_back() {
    let Some(ctx) = TestStore::new().await else {
        return;
    };
    let parent = ctx.scratch().await;

    let mut tx = ctx.db.begin().await.unwrap();
    CollectionRepository::create(&mut tx, &child(parent.id(), "dup"), now_ms())
        .await
        .unwrap();
    commit(tx).await.unwrap();

    let mut tx = ctx.db.begin().await.unwrap();
    CollectionRepository::create(&mut tx, &child(parent.id(), "other"), now_ms())
        .await
        .unwrap();
    let err = CollectionRepository::create(&mut tx, &child(parent.id(), "dup"), now_ms())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(err.message.contains("collection_parent_id_name_key"));
    drop(tx);

    let nodes = ctx
        .store
        .discover(&format!("/{}/", parent.path()), Depth::One)
        .await
        .unwrap();
    let children: Vec<String> = nodes
        .iter()
        .skip(1)
        .filter_map(|node| node.as_collection().map(|c| c.path().to_string()))
        .collect();
    assert_eq!(children, vec![format!("{}/dup", parent.path())]);

    parent.delete(None).await.unwrap();
}

#[tokio::test]
async fn test_create_if_absent_skips_existing_name() {
    let Some(ctx) = TestStore::new().await else {
        return;
    };
    let parent = ctx.scratch().await;

    let mut tx = ctx.db.begin().await.unwrap();
    let first = child(parent.id(), "shared");
    assert!(CollectionRepository::create_if_absent(&mut tx, &first, now_ms()).await.unwrap());
    assert!(
        !CollectionRepository::create_if_absent(&mut tx, &child(parent.id(), "shared"), now_ms())
            .await
            .unwrap()
    );
    let found = CollectionRepository::find_child(&mut tx, parent.id(), "shared")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first.id);
    commit(tx).await.unwrap();

    parent.delete(None).await.unwrap();
}
