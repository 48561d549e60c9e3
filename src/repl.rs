use std::io::{self, Read};
use std::io::{BufRead, BufReader, Write};

use crate::Session;

impl Session {
    pub fn repl(&mut self) -> io::Result<()> {
        self.repl_with(io::stdin(), io::stdout())
    }

    /// Runs commands read from `input` as soon as their parentheses balance,
    /// writing messages to `output`. Errors are logged and do not end the
    /// session.
    pub fn repl_with<R, W>(&mut self, input: R, mut output: W) -> io::Result<()>
    where
        R: Read,
        W: Write,
    {
        let mut cmd_buffer = String::new();

        for line in BufReader::new(input).lines() {
            let line_str = line?;
            cmd_buffer.push_str(&line_str);
            cmd_buffer.push('\n');
            // handles multi-line commands
            if should_eval(&cmd_buffer) {
                run_command_in_scripting(self, &cmd_buffer, &mut output)?;
                cmd_buffer = String::new();
            }
        }

        if !cmd_buffer.trim().is_empty() {
            run_command_in_scripting(self, &cmd_buffer, &mut output)?;
        }

        Ok(())
    }
}

/// Whether the buffered text closes every bracket it opens.
fn should_eval(curr_cmd: &str) -> bool {
    let mut depth = 0i32;
    let mut chars = curr_cmd.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth -= 1;
                // report excess closing brackets eagerly
                if depth < 0 {
                    return true;
                }
            }
            ';' => {
                if !chars.any(|ch| ch == '\n') {
                    return false;
                }
            }
            _ => {}
        }
    }

    depth == 0 && !curr_cmd.trim().is_empty()
}

fn run_command_in_scripting<W>(session: &mut Session, command: &str, mut output: W) -> io::Result<()>
where
    W: Write,
{
    match session.parse_and_run_program(None, command) {
        Ok(msgs) => {
            for msg in msgs {
                writeln!(output, "{msg}")?;
            }
        }
        Err(err) => {
            log::error!("{err}");
        }
    }
    Ok(())
}
