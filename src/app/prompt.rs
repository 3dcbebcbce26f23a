use crate::core::session::ConfirmPrompt;
use std::io::{BufRead, Write};

/// 從輸入串流讀取 y/n 回答
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ConfirmPrompt for LinePrompt<R, W> {
    fn confirm_unavailable(&mut self, unavailable: &[String]) -> bool {
        let question = format!(
            "{} not offered this term. Confirm anyway? [y/N] ",
            unavailable.join(", ")
        );
        if self.output.write_all(question.as_bytes()).is_err() || self.output.flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    }
}

/// `--yes` 時一律確認
pub struct AlwaysConfirm;

impl ConfirmPrompt for AlwaysConfirm {
    fn confirm_unavailable(&mut self, unavailable: &[String]) -> bool {
        tracing::info!("Confirming despite unavailable courses: {}", unavailable.join(", "));
        true
    }
}
