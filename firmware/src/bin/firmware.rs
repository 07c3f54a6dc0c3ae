use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use slip_firmware::system::System;
use slip_firmware::{App, Args, Config, Greeter};

fn main() -> ExitCode {
    let args = Args::parse();
    let config = Config::from_args(&args);

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    log::info!("Starting with queue in '{}'", config.queue_directory.display());

    let system = match System::init(&config) {
        Ok(system) => system,
        Err(err) => {
            log::error!("Failed to initialize: {}", err);
            return ExitCode::FAILURE;
        }
    };

    App::start(system, Box::new(Greeter), config.control).run()
}
