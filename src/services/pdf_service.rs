use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::{
    errors::{AppError, AppResult},
    models::domain::question::Question,
    models::domain::study_session::QUIZ_BANK_SIZE,
};

// US letter, top-down cursor in millimetres.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 6.0;
const CHOICE_INDENT_MM: f32 = 5.0;

const TITLE_FONT_SIZE: f32 = 18.0;
const QUESTION_FONT_SIZE: f32 = 10.0;
const CHOICE_FONT_SIZE: f32 = 9.0;

// Conservative character budget for the printable width at the body sizes.
const WRAP_COLUMNS: usize = 95;

/// Renders a complete quiz bank into a printable PDF. Pure formatting
/// over already-generated text; the same bank always lays out the same
/// way.
pub struct QuizPdfRenderer;

impl QuizPdfRenderer {
    pub fn render(&self, title: &str, quiz_bank: &[Question]) -> AppResult<Vec<u8>> {
        if quiz_bank.len() != QUIZ_BANK_SIZE {
            return Err(AppError::Render(format!(
                "expected {} questions, got {}",
                QUIZ_BANK_SIZE,
                quiz_bank.len()
            )));
        }

        let heading = format!("SenSei AI Quiz: {}", title);
        let (doc, page, layer) = PdfDocument::new(
            heading.clone(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "quiz",
        );

        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::Render(e.to_string()))?;
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::Render(e.to_string()))?;

        let mut layer = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

        layer.use_text(heading, TITLE_FONT_SIZE, Mm(MARGIN_MM), Mm(y), &bold);
        y -= LINE_HEIGHT_MM * 2.0;

        for (number, question) in quiz_bank.iter().enumerate() {
            let prompt_lines =
                wrap_text(&format!("{}. {}", number + 1, question.prompt), WRAP_COLUMNS);

            let mut choice_lines: Vec<String> = Vec::new();
            for (index, choice) in question.choices.iter().enumerate() {
                let label = Question::choice_label(index);
                choice_lines.extend(wrap_text(&format!("{}. {}", label, choice), WRAP_COLUMNS));
            }

            let block_height =
                (prompt_lines.len() + choice_lines.len()) as f32 * LINE_HEIGHT_MM
                    + LINE_HEIGHT_MM / 2.0;

            if y - block_height < MARGIN_MM {
                let (next_page, next_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "quiz");
                layer = doc.get_page(next_page).get_layer(next_layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }

            draw_lines(&layer, &prompt_lines, QUESTION_FONT_SIZE, MARGIN_MM, &mut y, &bold);
            draw_lines(
                &layer,
                &choice_lines,
                CHOICE_FONT_SIZE,
                MARGIN_MM + CHOICE_INDENT_MM,
                &mut y,
                &regular,
            );
            y -= LINE_HEIGHT_MM / 2.0;
        }

        doc.save_to_bytes()
            .map_err(|e| AppError::Render(e.to_string()))
    }
}

fn draw_lines(
    layer: &PdfLayerReference,
    lines: &[String],
    font_size: f32,
    x: f32,
    y: &mut f32,
    font: &IndirectFontRef,
) {
    for line in lines {
        layer.use_text(line.clone(), font_size, Mm(x), Mm(*y), font);
        *y -= LINE_HEIGHT_MM;
    }
}

/// Greedy word wrap at a character budget. A single overlong word gets a
/// line of its own rather than being split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
