use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# FoodOil IQ Configuration

[limits]
# fssai, eu, china or codex; explicit values below override the preset
standard = "fssai"
# ffa = 0.3
# tpc = 25.0
# pv = 10.0

[report]
# company_name = "Your Company Name"
# company_address = "123 Food Street, City, State"
# operator_name = "Quality Lead"

[recommendations]
ffa = 0.2
tpc = 20.0
pv = 8.0
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_and_validate_config, RegulatoryStandard};
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses() {
        let config = parse_and_validate_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.limits.standard, Some(RegulatoryStandard::Fssai));
        assert_eq!(config.recommendations.tpc, 20.0);
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        init_config_in(dir.path(), false).unwrap();

        let err = init_config_in(dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(init_config_in(dir.path(), true).is_ok());
    }
}
