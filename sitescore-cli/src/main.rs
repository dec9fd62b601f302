//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use env_logger::Env;
use sitescore_cli::CliError;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    match sitescore_cli::run() {
        Ok(()) => {}
        // Clap renders help, version and usage errors itself.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            report(&err);
            std::process::exit(1);
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn report(err: &CliError) {
    eprintln!("sitescore: {err}");
}
