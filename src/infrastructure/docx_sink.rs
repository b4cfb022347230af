//! Word document export.
//!
//! Each message becomes a bold info line, the message body, and a blank
//! spacer paragraph. The contact's messages are left-aligned in burgundy;
//! everyone else's are right-aligned in navy.

use std::fs::File;
use std::path::{Path, PathBuf};

use docx_rs::{AlignmentType, BreakType, Docx, LineSpacing, Paragraph, Run};

use crate::application::RecordSink;
use crate::domain::{AppError, MessageRecord, Result};

const CONTACT_COLOR: &str = "800020";
const OTHER_COLOR: &str = "000080";

/// Writes records as a formatted `.docx` document.
pub struct DocxSink {
    path: PathBuf,
}

impl DocxSink {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn paragraph() -> Paragraph {
    Paragraph::new().line_spacing(LineSpacing::new().after(0))
}

/// Body run with one line break per newline in the message.
fn body_run(text: &str) -> Run {
    text.split('\n')
        .enumerate()
        .fold(Run::new(), |run, (i, line)| {
            let run = if i == 0 {
                run
            } else {
                run.add_break(BreakType::TextWrapping)
            };
            run.add_text(line)
        })
}

fn append_record(doc: Docx, participant: &str, record: &MessageRecord) -> Docx {
    let from_contact = record.is_from(participant);
    let color = if from_contact { CONTACT_COLOR } else { OTHER_COLOR };

    let mut info = paragraph().add_run(Run::new().add_text(&record.metadata).bold().color(color));
    let mut body = paragraph().add_run(body_run(&record.text));

    if !from_contact {
        info = info.align(AlignmentType::Right);
        body = body.align(AlignmentType::Right);
    }

    doc.add_paragraph(info)
        .add_paragraph(body)
        .add_paragraph(paragraph())
}

impl RecordSink for DocxSink {
    fn write(&mut self, participant: &str, records: &[MessageRecord]) -> Result<usize> {
        let doc = records
            .iter()
            .fold(Docx::new(), |doc, record| append_record(doc, participant, record));

        let file = File::create(&self.path).map_err(|e| {
            AppError::io(format!("Failed to create {}", self.path.display()), e)
        })?;

        doc.build()
            .pack(file)
            .map_err(|e| AppError::export("Failed to write document", e))?;

        tracing::info!(
            path = %self.path.display(),
            messages = records.len(),
            "Document export written"
        );

        Ok(records.len())
    }

    fn destination(&self) -> &Path {
        &self.path
    }
}
