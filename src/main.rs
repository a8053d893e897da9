use std::io::Write;
use std::process;

use relaunch::{cli, error::Result, run};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RELAUNCH_LOG", "info"))
        .format(|buf, r| writeln!(buf, "*** {}", r.args()))
        .init();

    if let Err(err) = start() {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn start() -> Result<()> {
    let config = cli::get_config()?;
    run(config)
}
