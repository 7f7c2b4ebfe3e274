//! `scenepilot config` — show active configuration or a default file.

use scenepilot_config::AppConfig;

pub fn run(default: bool) -> anyhow::Result<()> {
    if default {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let config = AppConfig::load()?;
    println!("{config:#?}");
    println!(
        "\nConfig file: {}",
        AppConfig::config_dir().join("config.toml").display()
    );
    Ok(())
}
