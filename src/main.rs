//! Bounce Ball entry point
//!
//! Native builds run the game headlessly: the session is driven by autoplay
//! (or idle input) and frames are printed as ASCII.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use bounce_ball::input::KeyboardState;
    use bounce_ball::render::{Renderer, TextRenderer};
    use bounce_ball::share::platform_opener;
    use bounce_ball::{Session, Settings};
    use clap::Parser;

    /// Headless Bounce Ball runner.
    #[derive(Parser, Debug)]
    #[command(version, about)]
    struct Options {
        /// Stage seed (random when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Frames to run before stopping
        #[arg(short, long, default_value_t = 900)]
        frames: u64,

        /// Print every n-th frame (0 = only the last)
        #[arg(short, long, default_value_t = 0)]
        every: u64,

        /// Settings JSON file
        #[arg(short, long)]
        config: Option<String>,

        /// Let the demo pilot chase items
        #[arg(short, long)]
        autoplay: bool,

        /// Open the share link after a clear
        #[arg(long)]
        share: bool,

        /// Print the stage layout as JSON and exit
        #[arg(long)]
        layout: bool,
    }

    fn load_settings(path: Option<&str>) -> Settings {
        match path {
            Some(path) => Settings::load(path).unwrap_or_else(|e| {
                log::warn!("{e}; using default settings");
                Settings::default()
            }),
            None => Settings::default(),
        }
    }

    pub fn run() {
        env_logger::init();

        let options = Options::parse();

        let settings = load_settings(options.config.as_deref());
        let mut session = match options.seed {
            Some(seed) => Session::new(seed, settings),
            None => Session::with_random_seed(settings),
        }
        .with_opener(platform_opener());

        if options.layout {
            match serde_json::to_string_pretty(&session.state().layout()) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to serialize stage {}: {e}", session.seed()),
            }
            return;
        }

        session.autoplay = options.autoplay;
        log::info!("Bounce Ball (native) starting on stage {}", session.seed());

        let mut renderer = TextRenderer::new(std::io::stdout(), 4.0);
        let input = KeyboardState::new();
        for frame in 1..=options.frames {
            let report = session.update(&input);
            if options.every > 0 && frame % options.every == 0 {
                renderer.draw(&session.snapshot());
            }
            if report.cleared {
                break;
            }
        }
        renderer.draw(&session.snapshot());

        if options.share && !session.share() {
            log::info!("Nothing shared");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build is driven from the host page through the library
}
