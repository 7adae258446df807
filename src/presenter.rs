//! Terminal output for message listings and single messages, plus writing
//! attachment payloads to disk.

use crate::email_content::{extract_display_body, AttachmentPart};
use crate::error::{ApiError, Error, Result};
use crate::gmail_api::token_store::open_private;
use crate::types::{Message, MessagePart};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const RULE: &str = "*********************************************";

pub struct Presenter<W: Write> {
    out: W,
    output_dir: PathBuf,
}

impl Presenter<io::Stdout> {
    pub fn stdout(output_dir: impl Into<PathBuf>) -> Self {
        Self::new(io::stdout(), output_dir)
    }
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            out,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn print_message_ids(&mut self, ids: &[String]) -> Result<()> {
        self.write_message_ids(ids).map_err(Error::Output)
    }

    fn write_message_ids(&mut self, ids: &[String]) -> io::Result<()> {
        if ids.is_empty() {
            writeln!(self.out, "No messages found.")?;
            return Ok(());
        }
        writeln!(self.out, "Messages:")?;
        for (index, id) in ids.iter().enumerate() {
            writeln!(self.out, "{}. {}", index + 1, id)?;
        }
        Ok(())
    }

    /// Prints metadata, headers, labels, snippet and body. Attachments are
    /// printed separately as they are downloaded.
    pub fn print_message(&mut self, message: &Message) -> Result<()> {
        self.write_message(message).map_err(Error::Output)
    }

    fn write_message(&mut self, message: &Message) -> io::Result<()> {
        let payload = message.payload.clone().unwrap_or_default();

        writeln!(self.out, "Message Metadata and Headers:")?;
        writeln!(self.out, "{}", RULE)?;
        writeln!(self.out, "Message Id: {}", or_empty(&message.id))?;
        writeln!(self.out, "Thread Id: {}", or_empty(&message.thread_id))?;
        writeln!(self.out, "History Id: {}", or_empty(&message.history_id))?;
        writeln!(self.out, "Internal Date: {}", or_empty(&message.internal_date))?;
        writeln!(
            self.out,
            "Size Estimate: {}",
            message.size_estimate.unwrap_or(0)
        )?;
        writeln!(self.out)?;

        self.write_headers(&payload)?;
        writeln!(self.out)?;

        self.write_labels(message.label_ids.as_deref().unwrap_or_default())?;
        writeln!(self.out, "{}", RULE)?;
        writeln!(self.out)?;

        writeln!(self.out, "Message snippet:")?;
        writeln!(self.out, "{}", or_empty(&message.snippet))?;
        writeln!(self.out)?;

        writeln!(self.out, "Body of message")?;
        if let Some(body) = extract_display_body(&payload) {
            writeln!(self.out, "{}", body)?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "Attachments:")?;
        Ok(())
    }

    fn write_headers(&mut self, payload: &MessagePart) -> io::Result<()> {
        for header in payload.headers.iter().flatten() {
            writeln!(
                self.out,
                "{} : {}",
                or_empty(&header.name),
                or_empty(&header.value)
            )?;
        }
        Ok(())
    }

    fn write_labels(&mut self, labels: &[String]) -> io::Result<()> {
        if labels.is_empty() {
            return writeln!(self.out, "No labels found.");
        }
        writeln!(self.out, "Labels:")?;
        for label in labels {
            writeln!(self.out, "- {}", label)?;
        }
        Ok(())
    }

    pub fn print_attachment(&mut self, attachment: &AttachmentPart) -> Result<()> {
        self.write_attachment(attachment).map_err(Error::Output)
    }

    fn write_attachment(&mut self, attachment: &AttachmentPart) -> io::Result<()> {
        writeln!(self.out, "Filename: {}", attachment.filename)?;
        writeln!(
            self.out,
            "Id: {}",
            attachment.attachment_id.as_deref().unwrap_or("(inline)")
        )?;
        writeln!(self.out, "Attachment size: {}", attachment.size)
    }

    pub fn print_attachment_saved(&mut self, path: &Path) -> Result<()> {
        writeln!(self.out, "Attachment downloaded to {}", path.display()).map_err(Error::Output)
    }

    pub fn print_footer(&mut self) -> Result<()> {
        writeln!(self.out, "{}", RULE).map_err(Error::Output)
    }

    /// Writes `bytes` to `<output_dir>/<filename>`, replacing any file of the
    /// same name. Only the last component of `filename` is used, and the file
    /// is readable by the owner only.
    pub fn save_attachment(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = Path::new(filename).file_name().ok_or_else(|| {
            ApiError::Payload(format!("unusable attachment filename {:?}", filename))
        })?;
        let path = self.output_dir.join(name);

        let mut file = open_private(&path).map_err(|e| Error::filesystem(&path, e))?;
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|e| Error::filesystem(&path, e))?;
        Ok(path)
    }

    pub fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::filesystem(&self.output_dir, e))
    }
}

fn or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}
