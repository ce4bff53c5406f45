use std::process::ExitCode;

fn main() -> ExitCode {
    match fixture_setup::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
