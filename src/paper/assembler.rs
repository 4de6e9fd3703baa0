//! Exam paper layout.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use super::docx::{
    sanitize_omml, Alignment, DocxBuilder, Inline, Paragraph, Table, TableCell,
};
use super::images::{inspect_image, ImageSource};
use crate::constants::PaperPart;
use crate::error::Result;
use crate::logging::log_error;

const HEADER_COLUMN_WIDTHS: [u32; 4] = [2160, 2520, 2160, 2520];
const QUESTION_COLUMN_WIDTHS: [u32; 5] = [900, 6120, 720, 810, 810];
const QUESTION_TABLE_HEADERS: [&str; 5] = ["Q. No.", "Questions", "M", "BT", "CO"];

/// Everything printed in the title and header table
#[derive(Debug, Clone, PartialEq)]
pub struct PaperHeader {
    pub institution_heading: String,
    pub program_level: String,
    pub date: NaiveDate,
    pub course_code: String,
    pub course_title: String,
    pub max_marks: i32,
    pub duration: String,
    pub semester: String,
    pub is_improvement_cie: bool,
    pub faculty_name: String,
}

/// A selected question with the media needed to render it
#[derive(Debug, Clone, PartialEq)]
pub struct PaperQuestion {
    pub q_id: i32,
    pub part: PaperPart,
    pub text: String,
    pub marks: i32,
    pub bt: String,
    pub co: String,
    pub equations: Vec<Value>,
    pub image_paths: Vec<String>,
}

/// Sum of marks across Part A and Part B
pub fn total_marks(questions: &[PaperQuestion]) -> i64 {
    questions
        .iter()
        .filter(|q| q.part != PaperPart::Unassigned)
        .map(|q| i64::from(q.marks))
        .sum()
}

/// Render the paper as `.docx` bytes. Questions keep the order given within each
/// part; Part A is laid out before Part B.
pub fn assemble_paper(
    header: &PaperHeader,
    questions: &[PaperQuestion],
    images: &dyn ImageSource,
) -> Result<Vec<u8>> {
    let mut doc = DocxBuilder::new();

    doc.paragraph(
        Paragraph::text(header.institution_heading.clone())
            .styled("Title")
            .aligned(Alignment::Center),
    );
    doc.table(header_table(header));
    doc.paragraph(Paragraph::new());

    for (index, part) in [PaperPart::A, PaperPart::B].into_iter().enumerate() {
        if index > 0 {
            doc.paragraph(Paragraph::new());
        }
        if let Some(heading) = part.heading() {
            doc.paragraph(
                Paragraph::text(heading)
                    .styled("Heading1")
                    .aligned(Alignment::Center),
            );
        }

        let mut table = Table::new(QUESTION_COLUMN_WIDTHS.to_vec()).row(
            QUESTION_TABLE_HEADERS
                .iter()
                .map(|h| TableCell::text(*h, Some(Alignment::Center)))
                .collect(),
        );

        for (number, question) in questions.iter().filter(|q| q.part == part).enumerate() {
            let content = question_cell(&mut doc, question, images);
            table.push_row(vec![
                TableCell::text((number + 1).to_string(), Some(Alignment::Center)),
                content,
                TableCell::text(question.marks.to_string(), Some(Alignment::Center)),
                TableCell::text(question.bt.clone(), Some(Alignment::Center)),
                TableCell::text(question.co.clone(), Some(Alignment::Center)),
            ]);
        }
        doc.table(table);
    }

    let unassigned = questions
        .iter()
        .filter(|q| q.part == PaperPart::Unassigned)
        .count();
    if unassigned > 0 {
        warn!(unassigned, "Questions without a part were left off the paper");
    }

    let total = total_marks(questions);
    if total != i64::from(header.max_marks) {
        warn!(
            course_code = %header.course_code,
            total_marks = total,
            max_marks = header.max_marks,
            "Selected question marks do not add up to the paper's maximum marks"
        );
    }

    doc.paragraph(Paragraph::new());
    doc.paragraph(Paragraph::text("*********").aligned(Alignment::Center));
    doc.paragraph(Paragraph::text("BT-Blooms Taxonomy, CO-Course Outcomes"));
    doc.paragraph(Paragraph::text(format!("Total Marks: {total}")).aligned(Alignment::Right));

    debug!(
        questions = questions.len(),
        total_marks = total,
        "Paper document assembled"
    );

    doc.build()
}

fn header_table(header: &PaperHeader) -> Table {
    let rows: [[String; 4]; 5] = [
        [
            "Date".into(),
            header.date.format("%d-%m-%Y").to_string(),
            "Maximum Marks".into(),
            header.max_marks.to_string(),
        ],
        [
            "Course Code".into(),
            header.course_code.clone(),
            "Duration".into(),
            header.duration.clone(),
        ],
        [
            "Sem".into(),
            header.semester.clone(),
            "Improvement CIE".into(),
            if header.is_improvement_cie { "Yes" } else { "No" }.into(),
        ],
        [
            "UG/PG".into(),
            header.program_level.clone(),
            "Faculty:".into(),
            header.faculty_name.clone(),
        ],
        [
            "Course Title".into(),
            header.course_title.clone(),
            String::new(),
            String::new(),
        ],
    ];

    rows.into_iter().fold(
        Table::new(HEADER_COLUMN_WIDTHS.to_vec()),
        |table, row| {
            table.row(
                row.into_iter()
                    .map(|text| TableCell::text(text, Some(Alignment::Center)))
                    .collect(),
            )
        },
    )
}

fn question_cell(
    doc: &mut DocxBuilder,
    question: &PaperQuestion,
    images: &dyn ImageSource,
) -> TableCell {
    let mut paragraphs = vec![Paragraph::text(question.text.clone())];

    for equation in &question.equations {
        paragraphs.push(Paragraph::new().push(equation_inline(question.q_id, equation)));
    }

    for path in &question.image_paths {
        paragraphs.push(Paragraph::new().push(image_inline(doc, question.q_id, path, images)));
    }

    TableCell::new(paragraphs)
}

/// Native math when the OMML is well-formed, else the plain-text rendering
fn equation_inline(q_id: i32, equation: &Value) -> Inline {
    let (omml, text) = match equation {
        Value::String(text) => (None, Some(text.as_str())),
        Value::Object(fields) => (
            fields
                .get("omml")
                .or_else(|| fields.get("mathml"))
                .and_then(Value::as_str),
            fields.get("text").and_then(Value::as_str),
        ),
        _ => (None, None),
    };

    if let Some(math) = omml.and_then(sanitize_omml) {
        return Inline::Math(math);
    }
    if omml.is_some() {
        log_error(
            "paper",
            "embed_equation",
            "Equation markup is not well-formed Office Math",
            Some(&format!("q_id={q_id}")),
        );
    }

    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => Inline::Text(text.to_string()),
        None => {
            log_error(
                "paper",
                "embed_equation",
                "Equation has neither usable markup nor text",
                Some(&format!("q_id={q_id}")),
            );
            Inline::Text("Equation Error".to_string())
        }
    }
}

fn image_inline(doc: &mut DocxBuilder, q_id: i32, path: &str, images: &dyn ImageSource) -> Inline {
    let placeholder = || {
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        Inline::Text(format!("[Image: {file_name}]"))
    };

    let bytes = match images.load(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log_error(
                "paper",
                "embed_image",
                &e.to_string(),
                Some(&format!("q_id={q_id} path={path}")),
            );
            return placeholder();
        }
    };

    match inspect_image(&bytes) {
        Some(info) => doc.add_image(bytes, &info),
        None => {
            log_error(
                "paper",
                "embed_image",
                "Unsupported or unreadable image format",
                Some(&format!("q_id={q_id} path={path}")),
            );
            placeholder()
        }
    }
}
