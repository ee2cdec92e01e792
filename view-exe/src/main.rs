//! Headless viewer for the software renderer. Builds the demo level, renders
//! one frame from the west room and writes it out as an image.

mod cli;
mod config;
mod scene;

use std::error::Error;
use std::path::PathBuf;

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use log::info;
use math::Angle;
use render_soft::SoftwareRenderer;
use render_trait::{DrawBuffer, PlayViewRenderer};
use simplelog::TermLogger;

use cli::CLIOptions;
use config::UserConfig;

const BASE_DIR: &str = "soft-view/";

fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut user_config = UserConfig::load()?;
    user_config.sync_cli(&mut options);
    user_config.write();

    let config = user_config.render_config();
    let mut renderer = SoftwareRenderer::new(&config)?;
    let mut buffer = DrawBuffer::new(config.width, config.height);
    info!("Renderer {}x{}, {:?} detail", config.width, config.height, config.detail);

    let pics = scene::pic_data()?;
    let map = scene::level()?;
    let things = scene::things();

    let mut view = level::ViewPoint::new(
        scene::VIEW_X,
        scene::VIEW_Y,
        scene::VIEW_Z,
        Angle::from_degrees(options.angle),
    );
    view.psprites[0] = scene::weapon();
    view.shadow = options.shadow;

    let stats = {
        #[cfg(feature = "hprof")]
        profile!("render_player_view");
        renderer.render_player_view(&view, &map, &things, &pics, &mut buffer)?
    };
    info!(
        "Frame: {} drawsegs, {} visplanes, {} sprites",
        stats.drawsegs, stats.visplanes, stats.vissprites
    );

    let output: PathBuf = options
        .output
        .filter(|o| !o.is_empty())
        .unwrap_or_else(|| "frame.pgm".to_owned())
        .into();
    scene::write_image(&buffer, &output, options.ppm)?;
    info!("Wrote {output:?}");

    #[cfg(feature = "hprof")]
    coarse_prof::write(&mut std::io::stdout())?;
    Ok(())
}
