//! Integration tests for the load phase

use ecologistics::core::registry::ShardedRegistry;
use ecologistics::core::snapshot::{write_snapshot, BootstrapLoader};
use ecologistics::domain::{EcoError, Envio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[tokio::test]
async fn test_bootstrap_without_snapshot_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("envios.json");

    let ready = BootstrapLoader::new(&path, Duration::from_millis(100))
        .load(Arc::new(ShardedRegistry::new()))
        .await
        .unwrap();

    assert!(!ready.report().found);
    assert!(ready.registry().is_empty());
}

#[tokio::test]
async fn test_bootstrap_wait_is_bounded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("envios.json");

    let start = Instant::now();
    BootstrapLoader::new(&path, Duration::from_millis(200))
        .load(Arc::new(ShardedRegistry::new()))
        .await
        .unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_bootstrap_loads_snapshot_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("envios.json");
    std::fs::write(
        &path,
        r#"[{"id":"S1","cliente":"Ana","direccion":"Calle 1","estado":"enviado"}]"#,
    )
    .unwrap();

    let ready = BootstrapLoader::new(&path, Duration::ZERO)
        .load(Arc::new(ShardedRegistry::new()))
        .await
        .unwrap();

    assert!(ready.report().found);
    assert_eq!(ready.report().loaded, 1);
    assert_eq!(
        ready.registry().find_by_id("S1"),
        Some(Envio::new("S1", "Ana", "Calle 1", "enviado"))
    );
}

#[tokio::test]
async fn test_bootstrap_skips_blank_ids_in_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("envios.json");
    std::fs::write(
        &path,
        r#"[
            {"id":"S1","cliente":"Ana","direccion":"Calle 1","estado":"enviado"},
            {"id":"  ","cliente":"Eve","direccion":"Calle 3","estado":"pendiente"}
        ]"#,
    )
    .unwrap();

    let ready = BootstrapLoader::new(&path, Duration::ZERO)
        .load(Arc::new(ShardedRegistry::new()))
        .await
        .unwrap();

    assert_eq!(ready.report().loaded, 1);
    assert_eq!(ready.report().skipped.len(), 1);
    assert_eq!(ready.registry().len(), 1);
}

#[tokio::test]
async fn test_bootstrap_corrupt_snapshot_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("envios.json");
    std::fs::write(&path, r#"{"id":"S1"}"#).unwrap();

    let result = BootstrapLoader::new(&path, Duration::ZERO)
        .load(Arc::new(ShardedRegistry::new()))
        .await;

    assert!(matches!(result, Err(EcoError::MalformedSnapshot(_))));
}

#[tokio::test]
async fn test_bootstrap_reads_what_the_writer_wrote() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("envios.json");
    let envios = vec![
        Envio::new("S1", "Ana", "Calle 1", "enviado"),
        Envio::new("S2", "Bob", "Calle 2", "pendiente"),
    ];
    write_snapshot(&path, &envios).await.unwrap();

    let ready = BootstrapLoader::new(&path, Duration::ZERO)
        .load(Arc::new(ShardedRegistry::new()))
        .await
        .unwrap();

    let mut loaded = ready.registry().find_all();
    loaded.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(loaded, envios);
}
