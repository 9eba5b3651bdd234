use std::process::ExitCode;

fn main() -> ExitCode {
    match csv_filter::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report();
            ExitCode::from(err.exit_code())
        }
    }
}
