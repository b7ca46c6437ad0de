use std::process::ExitCode;

use imfilter_cli::{Args, run};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    match run(&args) {
        Ok(summary) => {
            println!("Time elapsed: {}ms", summary.elapsed.as_millis());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("imfilter: {}", e);
            ExitCode::FAILURE
        }
    }
}
