//! Blocking operator prompts

use std::io::{self, BufRead, Write};

use crate::error::Result;

/// Print `msg` with a `[y/n]` suffix and read lines until the operator
/// answers one or the other.
pub fn yes_no(msg: &str) -> Result<bool> {
    print!("{} [y/n] ", msg);
    io::stdout().flush()?;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed").into());
        }
        match line.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => {
                print!("answer 'y' or 'n': ");
                io::stdout().flush()?;
            }
        }
    }
}
