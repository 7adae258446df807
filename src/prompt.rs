use std::io::{self, BufRead, Write};

// Interactive questions go through this trait so the auth flow and the
// message picker can run against scripted answers.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    /// Shows `message` and returns one line of input without the line ending.
    fn ask(&mut self, message: &str) -> io::Result<String>;
}

/// Prompt backed by any reader/writer pair; `TerminalPrompt::stdio()` is the
/// real terminal.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn ask(&mut self, message: &str) -> io::Result<String> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was entered",
            ));
        }
        Ok(line.trim().to_string())
    }
}
