use alienfeed::cli::Cli;
use alienfeed::color::{Color, Palette};
use alienfeed::config;
use alienfeed::error::FeedError;
use alienfeed::format;
use clap::CommandFactory;

fn main() {
    init_logging();

    let args: Vec<_> = std::env::args_os().collect();
    if args.len() == 1 {
        Cli::command().print_help().ok();
        std::process::exit(1);
    }

    let cli = match Cli::try_parse_args(args) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };
    let cfg = config::load(config::LoadOptions::default());
    let palette = Palette::new(cfg.ui.color);

    if let Err(err) = alienfeed::run(&cli, &cfg) {
        match err.downcast_ref::<FeedError>() {
            Some(feed_err) => {
                eprintln!("{}", format::warning(palette, &feed_err.to_string()));
            }
            None => {
                eprintln!(
                    "{}{}",
                    palette.paint(Color::Fail, "error: "),
                    palette.paint(Color::Warning, &format!("{err:#}"))
                );
            }
        }
        std::process::exit(1);
    }
}

fn init_logging() {
    let env = env_logger::Env::new().filter_or("ALIENFEED_LOG", "warn");
    env_logger::Builder::from_env(env).init();
}
