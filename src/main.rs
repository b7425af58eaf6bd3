use clap::Parser;
use log::{error, info};

use caustica::cli::{Args, EXIT_BAD_ARGS, EXIT_FAIL_LOAD, EXIT_FAIL_SAVE};
use caustica::loader;
use caustica::logger::init_logger;
use caustica::photon::PhotonMap;
use caustica::render::render;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // clap renders --help and --version itself; everything else is
            // a usage error
            let _ = err.print();
            if err.use_stderr() {
                std::process::exit(EXIT_BAD_ARGS);
            }
            return;
        }
    };

    init_logger(args.log_level.into());

    if args.scene_help {
        println!("{}", loader::SCENE_HELP);
        return;
    }

    // Log application startup with version information
    info!("caustica - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let scene = match loader::load_scene_from_file(&args.scene) {
        Ok(scene) => scene,
        Err(err) => {
            error!("Failed to load {}: {}", args.scene, err);
            std::process::exit(EXIT_FAIL_LOAD);
        }
    };

    let photon_map = if scene.photon_mapping {
        PhotonMap::build(&scene)
    } else {
        PhotonMap::empty(&scene)
    };

    let mut image = match render(&scene, &photon_map, args.threads, args.progress) {
        Ok(image) => image,
        Err(err) => {
            // the only render-time failure is a resolution too large for
            // the image buffer, which is a scene configuration problem
            error!("Failed to render: {}", err);
            std::process::exit(EXIT_FAIL_LOAD);
        }
    };

    image.clamp_colors();

    if let Err(err) = image.save_as_png(&args.output) {
        error!("Failed to save {}: {}", args.output, err);
        std::process::exit(EXIT_FAIL_SAVE);
    }
}
