use crate::domain::model::{PromptOutcome, YearPair, DATASET_FIRST_YEAR, DATASET_LAST_YEAR};
use crate::utils::error::{AnalyzerError, Result};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// 逐字元收集兩個比較年份的終端互動
///
/// Generic over the reader/writer pair so tests can drive it with
/// in-memory buffers instead of stdin/stdout.
pub struct YearCollector<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    tokens: VecDeque<String>,
}

impl<R: BufRead, W: Write> YearCollector<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            tokens: VecDeque::new(),
        }
    }

    /// 反覆提示直到取得兩個合法年份，或使用者輸入離開指令
    pub fn collect_years(&mut self) -> Result<PromptOutcome> {
        let year1 = match self.prompt_year(
            "Enter the first year: ",
            DATASET_FIRST_YEAR,
            DATASET_LAST_YEAR - 1,
        )? {
            Some(year) => year,
            None => return Ok(PromptOutcome::Quit),
        };

        // 第二個年份的下限取決於已接受的第一個年份
        let prompt = format!("Enter the second year (must be after {}): ", year1);
        let year2 = match self.prompt_year(&prompt, year1 + 1, DATASET_LAST_YEAR)? {
            Some(year) => year,
            None => return Ok(PromptOutcome::Quit),
        };

        Ok(PromptOutcome::Years(YearPair::new(year1, year2)?))
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Returns `None` when the user typed the quit sentinel. Invalid
    /// tokens re-prompt indefinitely.
    fn prompt_year(&mut self, prompt: &str, min: i32, max: i32) -> Result<Option<i32>> {
        loop {
            write!(self.writer, "{}", prompt)?;
            self.writer.flush()?;

            let token = self.next_token()?;
            if is_quit_token(&token) {
                writeln!(self.writer, "Exiting program...")?;
                return Ok(None);
            }

            match token.parse::<i32>() {
                Ok(year) if year >= min && year <= max => return Ok(Some(year)),
                Ok(_) => writeln!(
                    self.writer,
                    "Invalid input. Enter a year between {} and {}.",
                    min, max
                )?,
                Err(_) => writeln!(self.writer, "Invalid input. Please enter a valid year.")?,
            }
        }
    }

    // One input line may carry several whitespace-separated tokens; they
    // are buffered and consumed one prompt at a time.
    fn next_token(&mut self) -> Result<String> {
        loop {
            if let Some(token) = self.tokens.pop_front() {
                return Ok(token);
            }

            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line)?;
            if bytes_read == 0 {
                return Err(AnalyzerError::IoError(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "input stream closed before two years were collected",
                )));
            }

            self.tokens
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}

fn is_quit_token(token: &str) -> bool {
    token.eq_ignore_ascii_case("q") || token.eq_ignore_ascii_case("quit")
}
