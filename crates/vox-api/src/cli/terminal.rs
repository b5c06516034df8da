//! Terminal front end: questions on stdout, answers from stdin.

use console::style;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

use vox_core::interview::ui::InterviewUi;
use vox_types::error::UiError;

pub struct TerminalUi<R, W> {
    input: R,
    output: W,
}

impl TerminalUi<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> TerminalUi<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    async fn write(&mut self, text: &str) -> Result<(), UiError> {
        self.output
            .write_all(text.as_bytes())
            .await
            .map_err(|e| UiError::Io(e.to_string()))?;
        self.output
            .flush()
            .await
            .map_err(|e| UiError::Io(e.to_string()))
    }
}

impl<R, W> InterviewUi for TerminalUi<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn ask(&mut self, question: &str) -> Result<String, UiError> {
        self.write(&format!("\n{}\n{} ", style(question).bold(), style(">").cyan()))
            .await?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .await
            .map_err(|e| UiError::Io(e.to_string()))?;
        if read == 0 {
            return Err(UiError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    async fn display_summary(&mut self, summary: &str) -> Result<(), UiError> {
        if summary.trim().is_empty() {
            return self
                .write(&format!("\n{}\n", style("Interview complete.").green()))
                .await;
        }
        self.write(&format!(
            "\n{}\n{summary}\n{}\n",
            style("--- Interview Summary ---").bold(),
            style("-------------------------").bold()
        ))
        .await
    }
}
