//! Exam correction pipeline: rubric extraction, grading, report.
//!
//! The language model is reached through [`StructuredGenerator`]; the
//! shipped [`CommandGenerator`] pipes each prompt to an external program and
//! reads JSON back from its standard output.

use gradedoc_core::{ReportError, Result};
use gradedoc_render::ReportRenderer;
use serde::Serialize;
use serde_json::Value;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Message of the request validation error.
pub const MISSING_INPUT: &str = "Missing exam_text or student_text";

/// A source of structured (JSON) answers to prompts.
pub trait StructuredGenerator {
    /// Answer `prompt` with a JSON value.
    ///
    /// # Errors
    ///
    /// [`ReportError::Generation`] when no JSON answer can be obtained.
    fn generate(&self, prompt: &str) -> Result<Value>;
}

/// Runs an external program per prompt.
///
/// The prompt is written to the program's stdin; its stdout must be JSON,
/// optionally inside a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn error(&self, message: impl std::fmt::Display) -> ReportError {
        ReportError::Generation(format!("{}: {message}", self.program))
    }
}

impl StructuredGenerator for CommandGenerator {
    fn generate(&self, prompt: &str) -> Result<Value> {
        log::debug!("running generator {} {:?}", self.program, self.args);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.error(format!("failed to start: {e}")))?;

        // writer thread, so a chatty child cannot block on a full stdout pipe
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = prompt.to_owned();
            std::thread::spawn(move || match stdin.write_all(prompt.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| self.error(format!("failed to wait: {e}")))?;
        if let Some(writer) = writer {
            writer
                .join()
                .map_err(|_| self.error("prompt writer panicked"))?
                .map_err(|e| self.error(format!("failed to write prompt: {e}")))?;
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.error(format!("{} {}", output.status, stderr.trim())));
        }
        parse_generated(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse generator output as JSON, unwrapping a fenced code block.
///
/// # Errors
///
/// [`ReportError::Generation`] when the text is not JSON.
pub fn parse_generated(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(body.trim())
        .map_err(|e| ReportError::Generation(format!("generator output is not JSON: {e}")))
}

/// Prompt asking for the grading rubric of an exam.
#[must_use]
pub fn rubric_prompt(exam_text: &str) -> String {
    format!(
        "Act as an expert pedagogical engineer. Analyze the following exam paper.\n\
         Extract the grading rubric into a structured JSON format.\n\
         For each question or section, identify:\n\
         - The question ID/Number.\n\
         - The topic.\n\
         - The maximum points assigned.\n\
         - The key elements expected in the answer (keywords, concepts).\n\
         \n\
         Answer with valid JSON only.\n\
         \n\
         EXAM PAPER:\n\
         {exam_text}\n"
    )
}

/// Prompt asking to grade a student copy against a rubric.
#[must_use]
pub fn grading_prompt(rubric: &Value, student_text: &str) -> String {
    format!(
        "Act as a strict but fair academic grader.\n\
         \n\
         INPUT DATA:\n\
         1. RUBRIC (JSON): {rubric}\n\
         2. STUDENT COPY: {student_text}\n\
         \n\
         INSTRUCTIONS:\n\
         - Go through the rubric item by item.\n\
         - Compare the student's answer to the expected elements.\n\
         - Assign a score for each item (do not exceed max points).\n\
         - Provide a justification for the score (mention missing keywords or logic errors).\n\
         - Calculate the final total score.\n\
         \n\
         Output valid JSON.\n"
    )
}

/// Result of a successful correction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionOutcome {
    pub status: String,
    pub rubric_extracted: Value,
    pub grading_result: Value,
    pub pdf_report_url: PathBuf,
}

/// Extract a rubric, grade the student copy and render the report.
///
/// # Errors
///
/// - [`ReportError::InvalidRequest`] when either text is blank
/// - [`ReportError::Generation`] when the generator fails
/// - [`ReportError::InputShape`] when the grading result is null, empty or a
///   scalar
/// - I/O errors when even the fallback report cannot be written
pub fn correct<G: StructuredGenerator + ?Sized>(
    generator: &G,
    exam_text: &str,
    student_text: &str,
    renderer: &ReportRenderer,
    destination: &Path,
) -> Result<CorrectionOutcome> {
    if exam_text.trim().is_empty() || student_text.trim().is_empty() {
        return Err(ReportError::InvalidRequest(MISSING_INPUT.to_string()));
    }

    log::info!("extracting rubric");
    let rubric = generator.generate(&rubric_prompt(exam_text))?;
    log::info!("grading student copy");
    let grading = generator.generate(&grading_prompt(&rubric, student_text))?;

    let outcome = renderer.render_with_fallback(&grading, destination)?;
    if outcome.used_fallback {
        log::warn!("report for {} uses the plain fallback", destination.display());
    }

    Ok(CorrectionOutcome {
        status: "success".to_string(),
        rubric_extracted: rubric,
        grading_result: grading,
        pdf_report_url: outcome.path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// Replays canned answers and records the prompts it saw.
    struct ScriptedGenerator {
        answers: RefCell<Vec<Value>>,
        prompts: RefCell<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(answers: Vec<Value>) -> Self {
            Self {
                answers: RefCell::new(answers),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl StructuredGenerator for ScriptedGenerator {
        fn generate(&self, prompt: &str) -> Result<Value> {
            self.prompts.borrow_mut().push(prompt.to_string());
            let mut answers = self.answers.borrow_mut();
            if answers.is_empty() {
                return Err(ReportError::Generation("no more answers".to_string()));
            }
            Ok(answers.remove(0))
        }
    }

    #[test]
    fn test_parse_generated_plain_and_fenced() {
        assert_eq!(parse_generated(" {\"a\": 1}\n").unwrap(), json!({"a": 1}));
        assert_eq!(
            parse_generated("```json\n[1, 2]\n```\n").unwrap(),
            json!([1, 2])
        );
        assert_eq!(parse_generated("```\n{}\n```").unwrap(), json!({}));
        assert!(matches!(
            parse_generated("Sure! Here is the rubric."),
            Err(ReportError::Generation(_))
        ));
    }

    #[test]
    fn test_prompts_embed_inputs() {
        let rubric = rubric_prompt("Q1. Derive x^2");
        assert!(rubric.contains("Q1. Derive x^2"));
        assert!(rubric.contains("JSON"));

        let grading = grading_prompt(&json!({"q": 1}), "my copy");
        assert!(grading.contains(r#"{"q":1}"#));
        assert!(grading.contains("my copy"));
        assert!(grading.contains("Output valid JSON."));
    }

    #[test]
    fn test_blank_texts_are_rejected() {
        let generator = ScriptedGenerator::new(Vec::new());
        let dir = tempfile::tempdir().unwrap();
        let renderer = ReportRenderer::new();
        for (exam, student) in [("", "copy"), ("exam", "  "), ("", "")] {
            let err = correct(&generator, exam, student, &renderer, &dir.path().join("r.pdf"))
                .unwrap_err();
            assert_eq!(err.to_string(), ReportError::InvalidRequest(MISSING_INPUT.into()).to_string());
        }
        assert!(generator.prompts.borrow().is_empty());
    }

    #[test]
    fn test_correct_renders_grading_result() {
        let rubric = json!([{"question_id": "Q1", "max_points": 4}]);
        let grading = json!([{"question_id": "Q1", "max_points": 4, "student_score": 3}]);
        let generator = ScriptedGenerator::new(vec![rubric.clone(), grading.clone()]);
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("reports/report.pdf");

        let outcome = correct(&generator, "exam", "copy", &ReportRenderer::new(), &destination)
            .unwrap();
        assert_eq!(outcome.status, "success");
        assert_eq!(outcome.rubric_extracted, rubric);
        assert_eq!(outcome.grading_result, grading);
        assert_eq!(outcome.pdf_report_url, destination);
        assert!(destination.exists());

        let prompts = generator.prompts.borrow();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("\"question_id\":\"Q1\""));
    }

    #[test]
    fn test_unusable_grading_still_writes_report() {
        let generator = ScriptedGenerator::new(vec![json!({"rubric": []}), json!([1, 2])]);
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("reports/report.pdf");

        let outcome = correct(&generator, "exam", "copy", &ReportRenderer::new(), &destination)
            .unwrap();
        assert_eq!(outcome.status, "success");
        assert_eq!(outcome.grading_result, json!([1, 2]));
        assert_eq!(outcome.pdf_report_url, destination);
        assert!(destination.exists());
    }

    #[test]
    fn test_generation_error_propagates() {
        let generator = ScriptedGenerator::new(vec![json!({"rubric": []})]);
        let dir = tempfile::tempdir().unwrap();
        let err = correct(
            &generator,
            "exam",
            "copy",
            &ReportRenderer::new(),
            &dir.path().join("r.pdf"),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::Generation(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_reads_stdout() {
        let generator = CommandGenerator::new("sh").with_args(vec![
            "-c".to_string(),
            "cat > /dev/null; printf '```json\\n{\"ok\": true}\\n```\\n'".to_string(),
        ]);
        assert_eq!(generator.generate("prompt").unwrap(), json!({"ok": true}));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_failure() {
        let generator = CommandGenerator::new("sh")
            .with_args(vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()]);
        let err = generator.generate("prompt").unwrap_err();
        assert!(err.to_string().contains("boom"), "{err}");

        let missing = CommandGenerator::new("gradedoc-no-such-program");
        assert!(matches!(missing.generate("p"), Err(ReportError::Generation(_))));
    }
}
