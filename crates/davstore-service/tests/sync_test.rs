//! Change-sync integration tests.

mod helpers;

use davstore_core::error::ErrorKind;
use davstore_entity::sync::token::SYNC_TOKEN_PREFIX;

use helpers::{TestStore, vcard, vcard_href};

#[tokio::test]
async fn test_repeated_sync_is_stable() {
    let Some(ctx) = TestStore::new().await else {
        return;
    };
    let collection = ctx.scratch().await;
    collection.upload(&vcard_href(), &vcard("a", "Ada")).await.unwrap();

    let first = collection.sync("").await.unwrap();
    assert_eq!(first.changes.len(), 1);
    let second = collection.sync("").await.unwrap();
    assert_eq!(first.token, second.token);

    let third = collection.sync(&first.token).await.unwrap();
    assert_eq!(third.token, first.token);
    assert!(third.changes.is_empty());

    collection.delete(None).await.unwrap();
}

#[tokio::test]
async fn test_empty_collection_sync() {
    let Some(ctx) = TestStore::new().await else {
        return;
    };
    let a = ctx.scratch().await;
    let b = ctx.scratch().await;

    let outcome = a.sync("").await.unwrap();
    assert!(outcome.changes.is_empty());
    assert!(outcome.token.starts_with(SYNC_TOKEN_PREFIX));
    assert_eq!(b.sync("").await.unwrap().token, outcome.token);

    a.delete(None).await.unwrap();
    b.delete(None).await.unwrap();
}

#[tokio::test]
async fn test_sync_reports_exactly_the_uploaded_href() {
    let Some(ctx) = TestStore::new().await else {
        return;
    };
    let collection = ctx.scratch().await;
    let untouched = vcard_href();
    collection.upload(&untouched, &vcard("a", "Untouched")).await.unwrap();
    let base = collection.sync("").await.unwrap();

    let href = vcard_href();
    collection.upload(&href, &vcard("b", "New")).await.unwrap();

    let changed = collection.sync(&base.token).await.unwrap();
    assert_ne!(changed.token, base.token);
    assert_eq!(changed.changes, vec![href.clone()]);

    // Asking again from the old token gives the same answer.
    let again = collection.sync(&base.token).await.unwrap();
    assert_eq!(again.token, changed.token);
    assert_eq!(again.changes, vec![href]);

    let settled = collection.sync(&changed.token).await.unwrap();
    assert!(settled.changes.is_empty());

    collection.delete(None).await.unwrap();
}

#[tokio::test]
async fn test_unknown_token_reports_everything() {
    let Some(ctx) = TestStore::new().await else {
        return;
    };
    let collection = ctx.scratch().await;
    let href = vcard_href();
    collection.upload(&href, &vcard("a", "Ada")).await.unwrap();

    let unknown = format!("{SYNC_TOKEN_PREFIX}{}", "0".repeat(64));
    let outcome = collection.sync(&unknown).await.unwrap();
    assert_eq!(outcome.changes, vec![href]);

    collection.delete(None).await.unwrap();
}

#[tokio::test]
async fn test_malformed_tokens_are_rejected() {
    let Some(ctx) = TestStore::new().await else {
        return;
    };
    let collection = ctx.scratch().await;
    let digest = "a".repeat(64);

    let malformed = [
        format!("{SYNC_TOKEN_PREFIX}{}", &digest[..63]),
        format!("{SYNC_TOKEN_PREFIX}{}", "g".repeat(64)),
        format!("http://example.com/sync/{digest}"),
        digest.clone(),
    ];
    for token in &malformed {
        let err = collection.sync(token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "token {token}");
    }

    collection.delete(None).await.unwrap();
}

#[tokio::test]
async fn test_move_between_collections() {
    let Some(ctx) = TestStore::new().await else {
        return;
    };
    let x = ctx.scratch().await;
    let y = ctx.scratch().await;
    let href = vcard_href();
    let to_href = vcard_href();
    x.upload(&href, &vcard("m", "Moved")).await.unwrap();

    let x_before = x.sync("").await.unwrap();
    let y_before = y.sync("").await.unwrap();

    ctx.store.move_item(&x, &href, &y, &to_href).await.unwrap();

    let x_after = x.sync(&x_before.token).await.unwrap();
    assert_eq!(x_after.changes, vec![href.clone()]);
    let y_after = y.sync(&y_before.token).await.unwrap();
    assert_eq!(y_after.changes, vec![to_href.clone()]);

    let in_x = x.get_multi(&[href.clone()]).await.unwrap();
    assert!(in_x[0].1.is_none());
    let in_y = y.get_multi(&[to_href.clone()]).await.unwrap();
    assert!(in_y[0].1.as_ref().is_some_and(|item| item.full_name.as_deref() == Some("Moved")));

    x.delete(None).await.unwrap();
    y.delete(None).await.unwrap();
}

#[tokio::test]
async fn test_move_overwrites_destination_and_missing_source_fails() {
    let Some(ctx) = TestStore::new().await else {
        return;
    };
    let x = ctx.scratch().await;
    let y = ctx.scratch().await;
    let href = vcard_href();
    let taken = vcard_href();
    x.upload(&href, &vcard("m", "Incoming")).await.unwrap();
    y.upload(&taken, &vcard("t", "Existing")).await.unwrap();

    ctx.store.move_item(&x, &href, &y, &taken).await.unwrap();
    let items = y.get_all().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].full_name.as_deref(), Some("Incoming"));

    let err = ctx
        .store
        .move_item(&x, &href, &y, &vcard_href())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    x.delete(None).await.unwrap();
    y.delete(None).await.unwrap();
}

#[tokio::test]
async fn test_alice_delete_scenario() {
    let Some(ctx) = TestStore::new().await else {
        return;
    };
    if let Some(stale) = ctx.store.collection_at("/alice/").await.unwrap() {
        stale.delete(None).await.unwrap();
    }
    let alice = ctx.store.create_collection("/alice/", None, None).await.unwrap();
    let href = "11111111-1111-1111-1111-111111111111.vcf";
    let card = "BEGIN:VCARD\r\nVERSION:3.0\r\nUID:alice\r\nFN:Alice\r\nEND:VCARD\r\n";
    alice.upload(href, card).await.unwrap();

    let t1 = alice.sync("").await.unwrap();
    assert_eq!(t1.changes, vec![href.to_string()]);

    alice.delete(Some(href)).await.unwrap();
    let t2 = alice.sync(&t1.token).await.unwrap();
    assert_ne!(t2.token, t1.token);
    assert_eq!(t2.changes, vec![href.to_string()]);

    let t3 = alice.sync(&t2.token).await.unwrap();
    assert!(t3.changes.is_empty());

    alice.delete(None).await.unwrap();
}
