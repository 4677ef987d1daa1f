use anyhow::Result;
use qsa_config::QwenConfig;
use qsa_core::OutputFormat;

/// Replace a configured API key with a fixed mask.
pub(crate) fn redacted(config: &QwenConfig) -> QwenConfig {
    let mut shown = config.clone();
    if let Some(key) = shown.api_key.as_mut().filter(|k| !k.is_empty()) {
        *key = "***".to_string();
    }
    shown
}

pub(crate) fn handle_config_show(format: OutputFormat) -> Result<()> {
    let path = qsa_config::paths::config_path();
    let config = redacted(&QwenConfig::load()?);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => {
            match &path {
                Some(p) if p.exists() => eprintln!("# {}", p.display()),
                Some(p) => eprintln!("# {} (not found, showing defaults)", p.display()),
                None => eprintln!("# home directory unknown, showing defaults"),
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

pub(crate) fn handle_config_init(force: bool) -> Result<()> {
    let path = QwenConfig::save_default_template(force)?;
    eprintln!("Wrote default Qwen config to: {}", path.display());
    Ok(())
}
