use std::process::ExitCode;

use vaultkit::ui::output;

fn main() -> ExitCode {
    match vaultkit::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
