use anyhow::Context;
use clap::Parser;
use scene_texture::{
    atlas::{AtlasPacker, AtlasTarget, SpriteTile},
    codec::{ImageCodec, PngCodec},
};
use std::{fs, path::PathBuf};

/// Pack a directory of bordered PNG tiles into one RGBA atlas
#[derive(clap::Parser)]
struct Cli {
    #[clap(short, long)]
    destination: PathBuf,
    #[clap(short, long)]
    source: PathBuf,

    #[clap(long, default_value_t = 512)]
    width: u32,
    #[clap(long, default_value_t = 512)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    //
    // CLI
    //

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let target = AtlasTarget::new(cli.width, cli.height);
    let mut atlas_path = cli.destination;

    //
    // load tiles in file name order
    //

    let mut paths = Vec::new();
    for entry in fs::read_dir(&cli.source)
        .with_context(|| format!("could not read dir {:?}", cli.source))?
    {
        let path = entry.context("could not open dir entry")?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("png") {
            log::warn!("ignoring non PNG file {:?}", path);
            continue;
        }
        paths.push(path);
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let codec = PngCodec;
    let mut tiles = Vec::with_capacity(paths.len());
    for path in paths.iter() {
        let bytes = fs::read(path).with_context(|| format!("could not read {:?}", path))?;
        let image = codec
            .decode(&bytes)
            .with_context(|| format!("could not decode {:?}", path))?;
        log::info!("loaded tile {:?} {}x{}", path, image.width(), image.height());
        tiles.push(SpriteTile::new(image));
    }

    //
    // packing
    //

    let mut packer = AtlasPacker::new(target).context("invalid atlas size")?;
    for (path, tile) in paths.iter().zip(tiles.iter()) {
        let cursor = packer.cursor();
        if cursor.row >= target.height {
            log::warn!("{:?} falls outside the atlas", path);
        }
        packer.place(tile);
        log::info!("{:?}: origin {}, {}", path, cursor.column, cursor.row);
    }

    //
    // write atlas
    //

    let atlas = image::RgbaImage::from_raw(target.width, target.height, packer.finish())
        .context("atlas buffer does not match its dimensions")?;

    atlas_path.set_extension("png");
    atlas
        .save(&atlas_path)
        .with_context(|| format!("could not save {:?}", atlas_path))?;
    log::info!("wrote {}x{} atlas to {:?}", target.width, target.height, atlas_path);

    Ok(())
}
