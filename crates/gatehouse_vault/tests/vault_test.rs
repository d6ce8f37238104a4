//! Secret vault persistence tests.

use gatehouse_vault::{Provider, SecretVault};

const KEY: &[u8] = b"test vault key material";

#[tokio::test]
async fn missing_vault_initializes_empty_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets").join("vault.enc");

    let vault = SecretVault::open(&path, KEY).await.unwrap();
    assert!(path.exists());
    assert_eq!(vault.api_key(Provider::OpenAi).await, "");
    assert_eq!(vault.webhook_secret().await, "");

    // An unset passcode admits nobody.
    assert!(!vault.verify_admin_passcode("").await);
    assert!(!vault.verify_admin_passcode("guess").await);
}

#[tokio::test]
async fn vault_file_is_not_plaintext() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.enc");

    let vault = SecretVault::open(&path, KEY).await.unwrap();
    vault.set_api_key(Provider::Anthropic, "sk-ant-secret").await.unwrap();

    let raw = tokio::fs::read(&path).await.unwrap();
    let haystack = String::from_utf8_lossy(&raw);
    assert!(!haystack.contains("sk-ant-secret"));
}

#[tokio::test]
async fn mutations_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.enc");

    let vault = SecretVault::open(&path, KEY).await.unwrap();
    vault.set_api_key(Provider::Gemini, "sk-gem").await.unwrap();
    vault.set_webhook_secret("whsec").await.unwrap();
    vault.set_admin_passcode("4242").await.unwrap();
    vault.set_extra("features.beta", "true").await.unwrap();
    drop(vault);

    let reopened = SecretVault::open(&path, KEY).await.unwrap();
    assert_eq!(reopened.api_key(Provider::Gemini).await, "sk-gem");
    assert_eq!(reopened.api_key(Provider::Mistral).await, "");
    assert_eq!(reopened.webhook_secret().await, "whsec");
    assert!(reopened.verify_admin_passcode("4242").await);
    assert!(!reopened.verify_admin_passcode("4243").await);
    assert_eq!(reopened.extra("features.beta").await, Some("true".to_string()));
}

#[tokio::test]
async fn wrong_key_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.enc");

    let vault = SecretVault::open(&path, KEY).await.unwrap();
    vault.set_webhook_secret("whsec").await.unwrap();
    drop(vault);

    let err = SecretVault::open(&path, b"wrong key").await.unwrap_err();
    assert!(format!("{}", err).contains("Crypto Error"));
}

#[tokio::test]
async fn open_or_default_leaves_unreadable_file_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.enc");

    let vault = SecretVault::open(&path, KEY).await.unwrap();
    vault.set_webhook_secret("whsec").await.unwrap();
    drop(vault);
    let original = tokio::fs::read(&path).await.unwrap();

    // Wrong key: empty fallback, file untouched until a write happens.
    let fallback = SecretVault::open_or_default(&path, b"wrong key").await.unwrap();
    assert_eq!(fallback.webhook_secret().await, "");
    assert_eq!(tokio::fs::read(&path).await.unwrap(), original);

    // The right key still recovers the original contents.
    let recovered = SecretVault::open_or_default(&path, KEY).await.unwrap();
    assert_eq!(recovered.webhook_secret().await, "whsec");
}

#[tokio::test]
async fn open_or_default_propagates_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    // The vault path is a directory: reading it is an I/O error, not a
    // corrupt document, so no fallback applies.
    let err = SecretVault::open_or_default(dir.path(), KEY).await.unwrap_err();
    assert!(format!("{}", err).contains("Storage Error"));
}

#[tokio::test]
async fn debug_output_redacts_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.enc");

    let vault = SecretVault::open(&path, KEY).await.unwrap();
    vault.set_webhook_secret("whsec-hidden").await.unwrap();

    let debug = format!("{:?}", vault);
    assert!(debug.contains("SecretVault"));
    assert!(!debug.contains("whsec-hidden"));
}

#[tokio::test]
async fn merge_legacy_persists_mapped_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.enc");

    let vault = SecretVault::open(&path, KEY).await.unwrap();
    vault
        .merge_legacy(&serde_json::json!({
            "apiKeys": { "openai": "sk-abc", "cohere": "sk-co" },
            "adminPasscode": "1234",
        }))
        .await
        .unwrap();
    drop(vault);

    let reopened = SecretVault::open(&path, KEY).await.unwrap();
    assert_eq!(reopened.api_key(Provider::OpenAi).await, "sk-abc");
    assert!(reopened.verify_admin_passcode("1234").await);
    assert_eq!(reopened.extra("apiKeys.cohere").await, Some("sk-co".to_string()));
}
