use anyhow::{Context, Result};

use meshview_engine::device::GpuInit;
use meshview_engine::logging::{init_logging, LoggingConfig};
use meshview_engine::mesh::UnitSquareMesher;
use meshview_engine::render::ShaderAsset;
use meshview_engine::window::{Runtime, RuntimeConfig};

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mesher = match std::env::var("MESHVIEW_MAXH") {
        Ok(raw) => {
            let maxh: f32 = raw
                .parse()
                .with_context(|| format!("MESHVIEW_MAXH is not a number: {raw:?}"))?;
            UnitSquareMesher::new(maxh)
        }
        Err(_) => UnitSquareMesher::default(),
    };

    let shader = match std::env::var_os("MESHVIEW_SHADER") {
        Some(path) => ShaderAsset::File(path.into()),
        None => ShaderAsset::Embedded,
    };

    log::info!("meshing unit square with maxh = {}", mesher.maxh());

    let config = RuntimeConfig {
        shader,
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), mesher)
}
