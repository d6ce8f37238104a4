//! Security document persistence tests.

use gatehouse_core::{Action, BotMode};
use gatehouse_security::{Gatekeeper, SecurityDocument};

#[tokio::test]
async fn missing_document_initializes_defaults_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config").join("security.json");

    let document = SecurityDocument::load(&path).await.unwrap();
    assert_eq!(document, SecurityDocument::default());
    assert_eq!(*document.settings.mode(), BotMode::Private);
    // The defaults were persisted, parents included.
    assert!(path.exists());

    let reloaded = SecurityDocument::load(&path).await.unwrap();
    assert_eq!(document, reloaded);
}

#[tokio::test]
async fn snapshot_save_and_reload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("security.json");

    let gate = Gatekeeper::from_document(SecurityDocument::default());
    gate.authorize_principal("5551230001");
    gate.add_admin("5551230002");
    gate.block("5551230003");
    gate.snapshot().save(&path).await.unwrap();

    let restored = Gatekeeper::from_document(SecurityDocument::load(&path).await.unwrap());
    assert!(restored.is_authorized("5551230001", Action::Message, 0));
    assert!(restored.is_admin("5551230002"));
    assert!(restored.is_blocked("5551230003"));
}

#[tokio::test]
async fn malformed_document_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("security.json");
    tokio::fs::write(&path, b"{ not json").await.unwrap();

    let err = SecurityDocument::load(&path).await.unwrap_err();
    assert!(format!("{}", err).contains("Configuration Error"));
}

#[tokio::test]
async fn save_overwrites_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("security.json");

    let gate = Gatekeeper::from_document(SecurityDocument::default());
    gate.authorize_principal("5551230001");
    gate.snapshot().save(&path).await.unwrap();

    gate.revoke_principal("5551230001");
    gate.block("5551230004");
    gate.snapshot().save(&path).await.unwrap();

    let restored = Gatekeeper::from_document(SecurityDocument::load(&path).await.unwrap());
    assert!(!restored.is_authorized("5551230001", Action::Message, 0));
    assert!(restored.is_blocked("5551230004"));
}
