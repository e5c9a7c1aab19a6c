//! Status command implementation
//!
//! Reads the persisted snapshot without starting the service and prints
//! the shipments it holds.

use super::load_or_default;
use crate::core::registry::ShardedRegistry;
use crate::core::snapshot::BootstrapLoader;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show a single shipment
    #[arg(long)]
    pub id: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking snapshot status");

        println!("📊 Shipment Status");
        println!();

        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {}", e);
                return Ok(2);
            }
        };

        let path = config.paths.snapshot_path();
        let ready = match BootstrapLoader::new(&path, Duration::ZERO)
            .load(Arc::new(ShardedRegistry::new()))
            .await
        {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Failed to load snapshot {}", path.display());
                println!("   Error: {}", e);
                return Ok(3);
            }
        };

        let report = ready.report();
        if !report.found {
            println!("No snapshot found at {}", path.display());
            println!("Run 'ecologistics watch' or 'ecologistics ingest <FILE>' first.");
            return Ok(0);
        }

        let registry = ready.registry();

        if let Some(ref id) = self.id {
            return match registry.find_by_id(id) {
                Some(envio) => {
                    println!("  ID: {}", envio.id);
                    println!("  Cliente: {}", envio.customer);
                    println!("  Direccion: {}", envio.address);
                    println!("  Estado: {}", envio.status);
                    println!();
                    Ok(0)
                }
                None => {
                    println!("❌ Envio no encontrado: {id}");
                    Ok(1)
                }
            };
        }

        let mut envios = registry.find_all();
        envios.sort_by(|a, b| a.id.cmp(&b.id));

        println!("Snapshot: {}", path.display());
        println!("Shipments: {}", envios.len());
        if !report.skipped.is_empty() {
            println!("Invalid records skipped: {}", report.skipped.len());
        }
        println!();

        if envios.is_empty() {
            return Ok(0);
        }

        println!(
            "{:<12} {:<20} {:<30} {:<12}",
            "ID", "Cliente", "Direccion", "Estado"
        );
        println!("{}", "-".repeat(77));
        for envio in &envios {
            println!(
                "{:<12} {:<20} {:<30} {:<12}",
                envio.id, envio.customer, envio.address, envio.status
            );
        }
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::snapshot::write_snapshot;
    use crate::domain::Envio;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir) -> String {
        let root = dir.path().to_string_lossy().replace('\\', "/");
        let path = dir.path().join("ecologistics.toml");
        std::fs::write(
            &path,
            format!("[paths]\noutput_dir = \"{root}/output\"\n"),
        )
        .unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_status_without_snapshot() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir);

        let args = StatusArgs { id: None };
        assert_eq!(args.execute(&config_path).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_status_lookup_by_id() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir);
        write_snapshot(
            &dir.path().join("output").join("envios.json"),
            &[Envio::new("S1", "Ana", "Calle 1", "enviado")],
        )
        .await
        .unwrap();

        let found = StatusArgs {
            id: Some("S1".to_string()),
        };
        assert_eq!(found.execute(&config_path).await.unwrap(), 0);

        let missing = StatusArgs {
            id: Some("S9".to_string()),
        };
        assert_eq!(missing.execute(&config_path).await.unwrap(), 1);
    }
}
