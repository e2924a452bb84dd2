use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use engine::{Engine, EngineConfig, EvictionPolicy, Resource, ResourceId};

use crate::export::export_png;

#[derive(Parser, Debug)]
#[command(name = "app", about = "Load asset records by id and summarize them")]
pub struct Cli {
    /// Directory of the base blob store.
    #[arg(long)]
    pub base: PathBuf,
    /// Directory whose blobs override the base store.
    #[arg(long = "override")]
    pub override_dir: Option<PathBuf>,
    /// Write every loaded texture as `<id>.png` into this directory.
    #[arg(long)]
    pub export: Option<PathBuf>,
    /// Keep at most this many resources cached (least recently used go first).
    #[arg(long)]
    pub lru: Option<usize>,
    /// Resource ids in hex, with or without a `0x` prefix.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

pub struct App {
    cli: Cli,
    engine: Engine,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        let mut config = EngineConfig::default().with_base_dir(cli.base.clone());
        if let Some(dir) = &cli.override_dir {
            config = config.with_override_dir(dir.clone());
        }
        if let Some(capacity) = cli.lru {
            config = config.with_eviction(EvictionPolicy::LeastRecentlyUsed { capacity });
        }
        App {
            engine: Engine::new(config),
            cli,
        }
    }

    pub fn init(&mut self) -> Result<()> {
        if let Some(dir) = &self.cli.export {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create export directory {:?}", dir))?;
        }

        let mut failures = 0;
        for raw in &self.cli.ids {
            let id = parse_id(raw)?;
            match self.load(id) {
                Ok(()) => {}
                Err(e) => {
                    log::error!("{id}: {e:#}");
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            bail!("{failures} of {} resources failed to load", self.cli.ids.len());
        }
        Ok(())
    }

    fn load(&self, id: ResourceId) -> Result<()> {
        let resource = self
            .engine
            .get(id)
            .with_context(|| format!("failed to load resource {id}"))?;
        log::info!("{id}: {}", summarize(&resource));

        if let (Some(dir), Resource::Texture(texture)) = (&self.cli.export, resource.as_ref()) {
            let path = dir.join(format!("{:08X}.png", id.0));
            export_png(&texture.image, &path)?;
            log::info!("{id}: wrote {:?}", path);
        }
        Ok(())
    }
}

fn parse_id(raw: &str) -> Result<ResourceId> {
    let digits = raw.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16)
        .map(ResourceId)
        .with_context(|| format!("invalid resource id {raw:?}"))
}

fn summarize(resource: &Resource) -> String {
    match resource {
        Resource::Texture(texture) => format!(
            "texture {}x{} {:?}",
            texture.width(),
            texture.height(),
            texture.image.format()
        ),
        Resource::Region(region) => format!(
            "region with {} scene types, {} terrain types, {} terrain textures",
            region.scene_types.len(),
            region.terrain_types.len(),
            region.terrain_textures.len()
        ),
        Resource::Scene(scene) => format!("scene with {} objects", scene.objects.len()),
        Resource::Animation(animation) => format!(
            "animation with {} frames of {} parts",
            animation.frames.len(),
            animation.num_parts
        ),
    }
}
