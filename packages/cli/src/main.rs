use clap::Parser;

use mediafs_cli::Args;

fn main() {
    env_logger::init();
    let args = Args::parse();

    let stdout = std::io::stdout();
    match mediafs_cli::run(&args, &mut stdout.lock()) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
