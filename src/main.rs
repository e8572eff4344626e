//! Binary entrypoint for the Parley chat server.

use std::process::ExitCode;

use parley_chat::start_parley;

fn main() -> ExitCode {
    start_parley::run()
}
