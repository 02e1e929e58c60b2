use clap::{Parser, Subcommand};
use logo_stamper::config::{self, Overrides};
use logo_stamper::imaging::{HorizontalPosition, VerticalPosition};
use logo_stamper::{output, process, scan};
use std::path::PathBuf;

/// Flags that change how the logo is drawn and where outputs go.
///
/// Unset flags fall back to `stamp.toml`, then to the built-in defaults.
#[derive(clap::Args, Clone)]
struct AppearanceArgs {
    /// Vertical position of the logo: top, bottom [default: bottom]
    #[arg(long)]
    vertical_pos: Option<VerticalPosition>,

    /// Horizontal position of the logo: left, center, right [default: center]
    #[arg(long)]
    horizontal_pos: Option<HorizontalPosition>,

    /// Padding in pixels from the image edges [default: 10]
    #[arg(long)]
    padding: Option<u32>,

    /// Logo width as a fraction of image width, 0.01-1.0 [default: 0.2]
    #[arg(long)]
    logo_scale: Option<f64>,

    /// Logo opacity, 0.0-1.0 [default: 1.0]
    #[arg(long)]
    opacity: Option<f64>,

    /// Only search the folder itself, not its subfolders
    #[arg(long)]
    no_rec: bool,
}

impl AppearanceArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            vertical: self.vertical_pos,
            horizontal: self.horizontal_pos,
            padding: self.padding,
            scale: self.logo_scale,
            opacity: self.opacity,
            recursive: self.no_rec.then_some(false),
            ..Overrides::default()
        }
    }
}

#[derive(clap::Args)]
struct StampArgs {
    /// Folder containing the images
    folder: PathBuf,

    /// Logo image (PNG with transparency works best)
    logo: PathBuf,

    /// Output directory [default: <FOLDER>/output, must not exist]
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Text inserted before the file extension of each output
    #[arg(long)]
    suffix: Option<String>,

    /// JPEG quality, 1-100 [default: 95]
    #[arg(long)]
    quality: Option<u32>,

    #[command(flatten)]
    appearance: AppearanceArgs,
}

impl StampArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            suffix: self.suffix.clone(),
            jpeg_quality: self.quality,
            ..self.appearance.overrides()
        }
    }
}

#[derive(clap::Args)]
struct PreviewArgs {
    /// Folder containing the images
    folder: PathBuf,

    /// Logo image
    logo: PathBuf,

    /// Where to write the preview PNG
    #[arg(long, default_value = "preview.png")]
    output: PathBuf,

    /// Render at up to 1200px instead of 400px
    #[arg(long)]
    full_size: bool,

    #[command(flatten)]
    appearance: AppearanceArgs,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "logo-stamper")]
#[command(about = "Stamp a logo watermark onto a folder of photographs")]
#[command(long_about = "\
Stamp a logo watermark onto a folder of photographs

Every JPEG and PNG in the folder (and its subfolders, unless --no-rec) gets
a copy with the logo blended in. Copies land in one flat output directory
and keep their file names, plus an optional suffix.

  photos/
  ├── stamp.toml          # Optional settings, overridden by flags
  ├── beach.jpg
  ├── 2024/
  │   └── dunes.png
  └── output/             # Created by the run
      ├── beach.jpg
      └── dunes.png

The logo is scaled to a fraction of each image's width, keeps its aspect
ratio, and is placed against the chosen edges with the given padding.

Run 'logo-stamper preview' to check the settings on the first image, and
'logo-stamper gen-config' to generate a documented stamp.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file to use instead of <FOLDER>/stamp.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stamp the logo onto every image in a folder
    Stamp(StampArgs),
    /// Render the first image of a folder with the logo, downscaled
    Preview(PreviewArgs),
    /// List the images a stamp run would process
    Scan {
        /// Folder containing the images
        folder: PathBuf,
        /// Only search the folder itself, not its subfolders
        #[arg(long)]
        no_rec: bool,
    },
    /// Print a stock stamp.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Stamp(args) => {
            let config =
                config::load_config(&args.folder, cli.config.as_deref(), &args.overrides())?;
            init_thread_pool(&config.processing);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process(
                &args.folder,
                &args.logo,
                args.save_dir.as_deref(),
                &config,
                Some(tx),
            );
            printer.join().ok();
            output::print_process_summary(&result?);
        }
        Command::Preview(args) => {
            let config = config::load_config(
                &args.folder,
                cli.config.as_deref(),
                &args.appearance.overrides(),
            )?;
            let source = process::preview(
                &args.folder,
                &args.logo,
                &args.output,
                &config,
                args.full_size,
            )?;
            output::print_preview_output(&source, &args.output);
        }
        Command::Scan { folder, no_rec } => {
            let overrides = Overrides {
                recursive: no_rec.then_some(false),
                ..Overrides::default()
            };
            let config = config::load_config(&folder, cli.config.as_deref(), &overrides)?;
            let images = scan::scan(&folder, config.output.recursive)?;
            output::print_scan_output(&folder, &images);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use logo_stamper::config::StampConfig;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn stamp_args(cli: Cli) -> StampArgs {
        match cli.command {
            Command::Stamp(args) => args,
            _ => panic!("expected stamp command"),
        }
    }

    #[test]
    fn stamp_without_flags_overrides_nothing() {
        let args = stamp_args(parse(&["logo-stamper", "stamp", "photos", "logo.png"]));
        assert_eq!(args.folder, PathBuf::from("photos"));
        assert_eq!(args.logo, PathBuf::from("logo.png"));
        assert_eq!(args.save_dir, None);

        let o = args.overrides();
        assert_eq!(o.vertical, None);
        assert_eq!(o.horizontal, None);
        assert_eq!(o.padding, None);
        assert_eq!(o.scale, None);
        assert_eq!(o.opacity, None);
        assert_eq!(o.suffix, None);
        assert_eq!(o.recursive, None);
        assert_eq!(o.jpeg_quality, None);
    }

    #[test]
    fn stamp_flags_become_overrides() {
        let args = stamp_args(parse(&[
            "logo-stamper",
            "stamp",
            "photos",
            "logo.png",
            "--save-dir",
            "out",
            "--vertical-pos",
            "top",
            "--horizontal-pos",
            "right",
            "--padding",
            "4",
            "--logo-scale",
            "0.5",
            "--opacity",
            "0.25",
            "--suffix",
            "_wm",
            "--quality",
            "80",
            "--no-rec",
        ]));
        assert_eq!(args.save_dir, Some(PathBuf::from("out")));

        let o = args.overrides();
        assert_eq!(o.vertical, Some(VerticalPosition::Top));
        assert_eq!(o.horizontal, Some(HorizontalPosition::Right));
        assert_eq!(o.padding, Some(4));
        assert_eq!(o.scale, Some(0.5));
        assert_eq!(o.opacity, Some(0.25));
        assert_eq!(o.suffix.as_deref(), Some("_wm"));
        assert_eq!(o.jpeg_quality, Some(80));
        assert_eq!(o.recursive, Some(false));
    }

    #[test]
    fn stamp_flags_win_over_config_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(config::CONFIG_FILE_NAME),
            "[output]\nsuffix = \"_file\"\njpeg_quality = 70\n\n[logo]\nopacity = 0.5\n",
        )
        .unwrap();
        let folder = tmp.path().to_str().unwrap();
        let args = stamp_args(parse(&[
            "logo-stamper",
            "stamp",
            folder,
            "logo.png",
            "--suffix",
            "_cli",
            "--no-rec",
        ]));

        let config = config::load_config(&args.folder, None, &args.overrides()).unwrap();
        assert_eq!(config.output.suffix, "_cli");
        assert_eq!(config.output.jpeg_quality, 70);
        assert!(!config.output.recursive);
        assert_eq!(config.logo.opacity, 0.5);
        assert_eq!(config.placement, StampConfig::default().placement);
    }

    #[test]
    fn position_names_parse() {
        for (name, expected) in [
            ("top", VerticalPosition::Top),
            ("bottom", VerticalPosition::Bottom),
        ] {
            let args = stamp_args(parse(&["logo-stamper", "stamp", "p", "l.png", "--vertical-pos", name]));
            assert_eq!(args.overrides().vertical, Some(expected));
        }
        for (name, expected) in [
            ("left", HorizontalPosition::Left),
            ("center", HorizontalPosition::Center),
            ("right", HorizontalPosition::Right),
        ] {
            let args =
                stamp_args(parse(&["logo-stamper", "stamp", "p", "l.png", "--horizontal-pos", name]));
            assert_eq!(args.overrides().horizontal, Some(expected));
        }
    }

    #[test]
    fn unknown_position_is_rejected() {
        let result =
            Cli::try_parse_from(["logo-stamper", "stamp", "p", "l.png", "--vertical-pos", "middle"]);
        assert!(result.is_err());

        let result =
            Cli::try_parse_from(["logo-stamper", "stamp", "p", "l.png", "--horizontal-pos", "top"]);
        assert!(result.is_err());
    }

    #[test]
    fn non_numeric_quality_is_rejected() {
        let result =
            Cli::try_parse_from(["logo-stamper", "stamp", "p", "l.png", "--quality", "high"]);
        assert!(result.is_err());
    }

    #[test]
    fn preview_defaults() {
        let cli = parse(&["logo-stamper", "preview", "photos", "logo.png"]);
        let Command::Preview(args) = cli.command else {
            panic!("expected preview command");
        };
        assert_eq!(args.output, PathBuf::from("preview.png"));
        assert!(!args.full_size);
        assert_eq!(args.appearance.overrides().recursive, None);
    }

    #[test]
    fn preview_takes_appearance_flags() {
        let cli = parse(&[
            "logo-stamper",
            "preview",
            "photos",
            "logo.png",
            "--full-size",
            "--output",
            "p.png",
            "--opacity",
            "0.3",
            "--no-rec",
        ]);
        let Command::Preview(args) = cli.command else {
            panic!("expected preview command");
        };
        assert!(args.full_size);
        assert_eq!(args.output, PathBuf::from("p.png"));
        let o = args.appearance.overrides();
        assert_eq!(o.opacity, Some(0.3));
        assert_eq!(o.recursive, Some(false));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = parse(&["logo-stamper", "scan", "photos", "--config", "my.toml", "--no-rec"]);
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
        let Command::Scan { folder, no_rec } = cli.command else {
            panic!("expected scan command");
        };
        assert_eq!(folder, PathBuf::from("photos"));
        assert!(no_rec);
    }
}
