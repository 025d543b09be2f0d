use std::process::ExitCode;

fn main() -> ExitCode {
    covercat_cli::run()
}
