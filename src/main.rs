use clap::Parser;
use figura::{ComposeError, ComposerConfig, PageComposer, Scene};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about = "Compose a vector page and save it as PDF", long_about = None)]
struct Args {
    /// Scene to draw: canvas or figure8
    #[arg(long)]
    scene: Option<Scene>,

    /// Output file (defaults to canvas_output.pdf or figure8.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Image placed on the canvas scene
    #[arg(long)]
    image: Option<String>,

    /// Straight segments per figure-eight
    #[arg(long)]
    segments: Option<usize>,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leave the page background untouched
    #[arg(long, default_value_t = false)]
    no_background: bool,
}

fn build_config(args: Args) -> Result<ComposerConfig, ComposeError> {
    let mut config = match &args.config {
        Some(path) => ComposerConfig::from_json_file(path)?,
        None => ComposerConfig::default(),
    };
    if let Some(scene) = args.scene {
        config = config.with_scene(scene);
    }
    if let Some(output) = args.output {
        config = config.with_output(output);
    }
    if let Some(image) = args.image {
        config = config.with_image(image);
    }
    if let Some(segments) = args.segments {
        config = config.with_segments(segments);
    }
    if args.no_background {
        config = config.with_background(None);
    }
    Ok(config)
}

fn main() -> ExitCode {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "figura=info");
        }
    }
    env_logger::init();

    let args = Args::parse();
    let result = build_config(args).and_then(|config| {
        let composer = PageComposer::new(config);
        log::info!(
            "Composing {:?} scene into {}",
            composer.config().scene,
            composer.config().output_path().display()
        );
        composer.run()
    });

    match result {
        Ok(report) => {
            println!("PDF created successfully!");
            println!("Saved to {}", report.output.display());
            for skipped in &report.skipped {
                println!("  skipped {}: {}", skipped.uri, skipped.reason);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            // The message already carries every nested cause.
            eprintln!("Error creating PDF: {}", e);
            eprintln!("Details: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
