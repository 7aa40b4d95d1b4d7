use colored::Colorize;
use shiprun::ShiprunError;
use std::process;

fn main() {
    if let Err(e) = shiprun::cli::run() {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        let code = e
            .downcast_ref::<ShiprunError>()
            .map_or(1, ShiprunError::exit_code);
        process::exit(code);
    }
}
