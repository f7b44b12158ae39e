use std::fmt;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;
use log::{ error, info, LevelFilter };

use whitted::error::RenderResult;
use whitted::scene::{ Integrator, Scene };

/// Where the scene comes from: a built-in id or a JSON description.
#[derive(Clone, Debug, PartialEq)]
enum SceneSource {
    Builtin(u32),
    File(PathBuf),
}

impl FromStr for SceneSource {
    type Err = String;

    fn from_str(s: &str) -> Result<SceneSource, String> {
        if let Ok(id) = s.parse::<u32>() {
            return Ok(SceneSource::Builtin(id));
        }

        let path = PathBuf::from(s);
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(SceneSource::File(path)),
            _ => Err(format!("{:?} is neither a scene number nor a .json file", s)),
        }
    }
}

impl fmt::Display for SceneSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SceneSource::Builtin(id) => write!(f, "scene {}", id),
            SceneSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Renders one of the built-in scenes (or a JSON scene file) to a square
/// image.
#[derive(Parser, Debug)]
#[clap(name = "render", version, about)]
struct Args {
    /// Built-in scene number, 1 through 9, or a path to a .json scene.
    scene: SceneSource,

    /// Width and height of the output image, in pixels.
    size: u32,

    /// Where to write the image; the extension picks the format.
    output: PathBuf,

    /// Let every light reach every surface.
    #[clap(long)]
    no_shadows: bool,

    /// Shade with the ambient occlusion integrator.
    #[clap(long)]
    ambient_occlusion: bool,

    /// Maximum number of reflection bounces.
    #[clap(long)]
    max_depth: Option<usize>,

    /// Seed for ambient occlusion sampling.
    #[clap(long)]
    seed: Option<u64>,

    /// Directory that built-in scenes load meshes and textures from.
    #[clap(long, default_value = "resources")]
    resources: PathBuf,

    /// Log level; RUST_LOG takes precedence when set.
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

fn run(args: &Args) -> RenderResult<()> {
    let mut scene = match args.scene {
        SceneSource::File(ref path) => Scene::from_file(path, args.size)?,
        SceneSource::Builtin(id) => Scene::builtin(id, args.size, &args.resources)?,
    };

    if args.no_shadows {
        scene.options.shadows = false;
    }
    if args.ambient_occlusion {
        scene.options.integrator = Integrator::AmbientOcclusion;
    }
    if let Some(max_depth) = args.max_depth {
        scene.options.max_depth = max_depth;
    }
    if let Some(seed) = args.seed {
        scene.options.seed = seed;
    }

    let canvas = scene.render();
    canvas.save(&args.output)?;

    info!("rendered {} to {} ({}x{})",
        args.scene, args.output.display(), args.size, args.size);
    Ok(())
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

#[test]
fn scene_argument_takes_an_id_or_a_json_file() {
    let args = Args::try_parse_from(&["render", "3", "64", "out.png"]).unwrap();
    assert_eq!(args.scene, SceneSource::Builtin(3));
    assert_eq!(args.scene.to_string(), "scene 3");

    let args = Args::try_parse_from(&["render", "scenes/room.json", "64", "out.png",
        "--seed", "9"]).unwrap();
    assert_eq!(args.scene, SceneSource::File(PathBuf::from("scenes/room.json")));
    assert_eq!(args.scene.to_string(), "scenes/room.json");
    assert_eq!(args.seed, Some(9));

    assert!(Args::try_parse_from(&["render", "three", "64", "out.png"]).is_err());
    assert!(Args::try_parse_from(&["render", "3", "big", "out.png"]).is_err());
}

#[test]
fn json_scene_renders_through_the_cli() {
    let dir = std::env::temp_dir().join("whitted_cli_scene");
    std::fs::create_dir_all(&dir).unwrap();
    let scene = dir.join("scene.json");
    std::fs::write(&scene, r#"{
        "shapes": [{ "type": "sphere", "center": [0, 0, 0], "radius": 1 }]
    }"#).unwrap();

    let output = dir.join("out.png");
    use std::ffi::OsStr;

    let argv = vec![
        OsStr::new("render"), scene.as_os_str(), OsStr::new("8"), output.as_os_str(),
    ];
    let args = Args::try_parse_from(argv).unwrap();

    run(&args).unwrap();
    assert_eq!(image::open(&output).unwrap().width(), 8);
}
