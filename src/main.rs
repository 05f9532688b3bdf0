//! rShift main entrypoint.

use rshift::run;
use rshift::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(e.exit_code());
    }
}
