use std::io::Write;

/// The process environment a command runs in: its output streams and its exit status.
pub trait Host: Send + Sync {
    /// Stream for the console summary and other normal output.
    fn output(&mut self) -> impl Write;

    /// Stream for diagnostics meant for the user.
    fn error(&mut self) -> impl Write;

    /// End the process with `code`. Test hosts record the code and return.
    fn exit(&mut self, code: i32);
}

/// Host capturing output in memory and recording the requested exit code.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
