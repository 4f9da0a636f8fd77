//! CLI command implementations

pub mod apply;
pub mod batch;
pub mod histogram;
pub mod info;

use anyhow::{Context, Result, bail};
use rasterlab_core::PixelBuffer;
use rasterlab_ops::Operation;
use std::collections::HashMap;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    rasterlab_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &PixelBuffer) -> Result<()> {
    rasterlab_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Parses `key=value` strings into a map; later keys win.
pub fn parse_params<S: AsRef<str>>(pairs: &[S]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Expected key=value, got '{}'", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Empty parameter name in '{}'", pair);
        }
        map.insert(key.to_string(), value.trim().to_string());
    }
    Ok(map)
}

/// Parses `name` or `name:key=value,key=value` into an operation.
pub fn parse_step(step: &str) -> Result<Operation> {
    let (name, rest) = step.split_once(':').unwrap_or((step, ""));
    let pairs: Vec<&str> = rest.split(',').filter(|s| !s.trim().is_empty()).collect();
    let params = parse_params(&pairs)?;
    Operation::from_name(name, &params).with_context(|| format!("Invalid operation '{}'", step))
}
