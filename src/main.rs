use clap::Parser;
use untrack::cli::Cli;
use untrack::config::Config;
use untrack::logging;
use untrack::Untracker;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env();
    let _guard = logging::init_logging(cli.log_level(), &config);

    let untracker = Untracker::new();
    let clean = untracker.untrack(&cli.url);

    let rendered = match clean.render() {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::error!(error = %e, "Failed to render the final URL");
            return Err(e.into());
        }
    };

    println!("{rendered}");
    Ok(())
}
