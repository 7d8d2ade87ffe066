use anyhow::Context;
use clap::Parser;
use relm4::prelude::*;
use ringlayout::RingVariant;
use storytray::config::{ConfigLoader, Overrides};
use storytray::gui::app::AppModel;
use storytray::gui::tray::Tray;
use storytray::sys::runtime;

#[derive(Parser, Debug)]
#[command(version, about = "Animated story tray avatar", long_about = None)]
struct Args {
    /// Number of stories around the avatar
    #[arg(short, long)]
    segments: Option<usize>,

    /// Blank space between two stories, in degrees
    #[arg(short, long)]
    gap: Option<f64>,

    /// Border style: "segmented" or "gradient"
    #[arg(long)]
    variant: Option<RingVariant>,

    /// Start with the loading animation running
    #[arg(long)]
    loading: bool,

    /// Write the default config file, print its path and exit
    #[arg(long)]
    write_config: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            segments: self.segments,
            gap_degrees: self.gap,
            variant: self.variant,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let loader = ConfigLoader::new(args.overrides())?;
    if args.write_config {
        let path = loader
            .write_default()
            .context("Failed to write default config")?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = loader.load_or_default();

    let mut tray = Tray::from_config(&config).context("Invalid tray configuration")?;
    if args.loading {
        tray.state.start_loading();
    }

    let (tx, rx) = async_channel::bounded(32);

    runtime::spawn_services(loader, config, tx)
        .context("Failed to start background services")?;

    // GTK must not see our own flags
    let app = RelmApp::new("org.storytray.storytray").with_args(Vec::new());

    app.run::<AppModel>((tray, rx));
    Ok(())
}
