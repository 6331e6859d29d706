//! Config command - Show resolved paths and scan defaults

use recentfiles_logging::{logs_dir, recentfiles_home};
use recentfiles_scout::RecentConfig;
use std::path::Path;

/// Arguments for the config command
#[derive(Debug)]
pub struct ConfigArgs {
    pub json: bool,
}

pub fn run(args: ConfigArgs, config_file: &Path, config: &RecentConfig) -> anyhow::Result<()> {
    let home = recentfiles_home();
    let logs = logs_dir();

    if args.json {
        let value = serde_json::json!({
            "home": home.to_string_lossy(),
            "config_file": {
                "path": config_file.to_string_lossy(),
                "exists": config_file.exists(),
            },
            "logs": {
                "path": logs.to_string_lossy(),
                "exists": logs.exists(),
            },
            "settings": serde_json::to_value(config)?,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("RECENTFILES CONFIGURATION");
    println!("=========================");
    println!();
    println!("Home:     {}", home.display());
    println!(
        "Config:   {} ({})",
        config_file.display(),
        if config_file.exists() { "exists" } else { "defaults" }
    );
    println!("Logs:     {}", logs.display());
    println!();
    println!("Scan defaults:");
    println!("  Root:               {}", config.root.display());
    println!("  Pattern:            {}", config.pattern);
    println!(
        "  Skip system folder: {} ({})",
        config.skip_system_folder, config.system_folder
    );
    if config.days_back == 0 {
        println!("  Modified within:    any time");
    } else {
        println!("  Modified within:    {} day(s)", config.days_back);
    }
    println!("  Flush interval:     {} ms", config.flush_interval_ms);
    println!("  Follow symlinks:    {}", config.follow_symlinks);

    Ok(())
}
