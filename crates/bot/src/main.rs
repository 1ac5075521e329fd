use std::io;
use std::process::ExitCode;

use binance_futures::BinanceClient;
use color_eyre::eyre;
use structopt::StructOpt;

use futures_bot::cli::{self, Opt};
use futures_bot::config;
use futures_bot::logger::{init_logger, LogConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<ExitCode> {
    // init error reporting
    color_eyre::install()?;

    // argument errors exit here, before anything else happens
    let opt = Opt::from_args();

    config::load_dotenv();

    // init logging; the guards flush the writers when main returns
    let (logger, _guards) = init_logger(&LogConfig::new(config::log_dir(config::env_lookup)))?;

    let code = cli::run(
        opt,
        config::env_lookup,
        BinanceClient::new,
        logger,
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await?;

    Ok(ExitCode::from(code))
}
