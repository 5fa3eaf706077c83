//! `calmwing doctor` — Diagnose configuration and collaborator health.

use calmwing_config::AppConfig;

pub async fn run() -> anyhow::Result<()> {
    println!("🩺 Calmwing Doctor — System Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  ⚠️  No config file at {} — using defaults", config_path.display());
        AppConfig::load().ok()
    };

    if let Some(config) = config {
        // Check API key
        if config.generator == "anthropic" && !config.has_api_key() {
            println!("  ⚠️  No API key — set api_key or CALMWING_API_KEY");
            issues += 1;
        } else {
            println!("  ✅ Generator '{}' configured", config.generator);
        }

        // Check flight source
        match calmwing_flight::build_flight_source(&config) {
            Ok(source) => match source.health_check().await {
                Ok(true) => println!("  ✅ Flight source '{}' reachable", source.name()),
                Ok(false) => {
                    println!("  ⚠️  Flight source '{}' unhealthy", source.name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Flight source check failed: {e}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ Flight source misconfigured: {e}");
                issues += 1;
            }
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
