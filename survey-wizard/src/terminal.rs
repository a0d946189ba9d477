//! Line-oriented terminal front-end
//!
//! Renders a [`View`] as text and reads answers line by line. Generic over
//! the reader and writer so a whole session can be scripted.

use chrono::{DateTime, Utc};
use std::io::{self, BufRead, Write};
use survey_common::Submission;
use survey_wizard::draft::DraftStore;
use survey_wizard::view::{FieldView, View};
use survey_wizard::{FieldKind, FormState, SubmitError, Survey, ValidationReport, WizardState};
use tracing::{debug, warn};

/// Parsed reply to a field prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Blank line: leave the field as it is
    Keep,
    /// `-`: forget the input
    Clear,
    Select(String),
    Checked(Vec<String>),
    Text(String),
}

/// Parsed reply to the navigation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Back,
    Submit,
    Quit,
}

/// How a session ended
#[derive(Debug)]
pub enum Outcome {
    Submitted(Submission),
    Quit,
    /// Deadline passed while the session was open
    Closed,
}

fn resolve_option(field: &FieldView, token: &str) -> Result<String, String> {
    if let Ok(n) = token.parse::<usize>() {
        if let Some(option) = n.checked_sub(1).and_then(|i| field.options.get(i)) {
            return Ok(option.value.clone());
        }
    }
    field
        .options
        .iter()
        .find(|o| o.value == token)
        .map(|o| o.value.clone())
        .ok_or_else(|| format!("Enter a number from 1 to {}", field.options.len()))
}

/// Interpret one input line for `field`
pub fn parse_answer(field: &FieldView, line: &str) -> Result<Answer, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Answer::Keep);
    }
    if trimmed == "-" {
        return Ok(Answer::Clear);
    }

    match field.kind {
        FieldKind::FreeText => Ok(Answer::Text(line.trim_end_matches(['\r', '\n']).to_string())),
        FieldKind::SingleSelect => resolve_option(field, trimmed).map(Answer::Select),
        FieldKind::MultiSelect => trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| resolve_option(field, token))
            .collect::<Result<Vec<_>, _>>()
            .map(Answer::Checked),
    }
}

/// Interpret the navigation prompt; only commands the view offers are accepted
pub fn parse_command(view: &View, line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "n" | "next" if view.show_next => Some(Command::Next),
        "b" | "back" if view.show_previous => Some(Command::Back),
        "s" | "submit" if view.show_submit => Some(Command::Submit),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}

fn apply_answer(survey: &Survey, form: &mut FormState, key: &str, answer: Answer) -> survey_wizard::Result<()> {
    match answer {
        Answer::Keep => Ok(()),
        Answer::Clear => {
            form.clear(key);
            Ok(())
        }
        Answer::Select(value) => form.select(survey, key, &value),
        Answer::Checked(values) => form.set_checked_all(survey, key, values),
        Answer::Text(text) => form.set_text(survey, key, &text),
    }
}

/// Interactive session over any reader/writer pair
pub struct Session<'a, R, W> {
    survey: &'a Survey,
    drafts: Option<&'a DraftStore>,
    input: R,
    out: W,
    clock: Box<dyn Fn() -> DateTime<Utc> + 'a>,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(survey: &'a Survey, drafts: Option<&'a DraftStore>, input: R, out: W) -> Self {
        Self {
            survey,
            drafts,
            input,
            out,
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the wall clock used for deadline checks
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'a) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Next input line without its terminator; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn render_header(&mut self, view: &View) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "== {} ==", self.survey.title)?;
        writeln!(
            self.out,
            "{} ({:.0}%)  {}",
            view.progress_text, view.progress_percent, view.title
        )?;
        let errors = view.error_count();
        if errors > 0 {
            writeln!(self.out, "{} question(s) need an answer before you continue.", errors)?;
        }
        Ok(())
    }

    fn render_field(&mut self, field: &FieldView) -> io::Result<()> {
        let marker = if field.required { "*" } else { " " };
        let hint = match field.kind {
            FieldKind::SingleSelect => " (enter a number)",
            FieldKind::MultiSelect => " (numbers, comma-separated)",
            FieldKind::FreeText => "",
        };
        writeln!(self.out)?;
        writeln!(self.out, "{} {}{}", marker, field.label, hint)?;
        for (i, option) in field.options.iter().enumerate() {
            let check = match (field.kind, option.selected) {
                (FieldKind::SingleSelect, true) => "(*)",
                (FieldKind::SingleSelect, false) => "( )",
                (_, true) => "[x]",
                (_, false) => "[ ]",
            };
            writeln!(self.out, "   {} {}. {}", check, i + 1, option.label)?;
        }
        if let Some(text) = field.text.as_deref().filter(|t| !t.is_empty()) {
            writeln!(self.out, "   current: {}", text)?;
        }
        if let Some(error) = field.error {
            writeln!(self.out, "   ! {}", error)?;
        }
        Ok(())
    }

    /// Prompt each visible field of the current section
    ///
    /// Visibility is recomputed before every prompt, so a conditional field
    /// shows up right after the answer that reveals it. Returns `false` at
    /// end of input.
    fn prompt_fields(
        &mut self,
        state: &WizardState,
        form: &mut FormState,
        report: Option<&ValidationReport>,
    ) -> io::Result<bool> {
        let keys: Vec<String> = self
            .survey
            .section(state.current())
            .map(|s| s.fields.iter().map(|f| f.key.clone()).collect())
            .unwrap_or_default();

        for key in keys {
            loop {
                let view = View::project(state, self.survey, form, report);
                let Some(field) = view.fields.into_iter().find(|f| f.key == key) else {
                    break;
                };
                self.render_field(&field)?;
                write!(self.out, "> ")?;
                self.out.flush()?;

                let Some(line) = self.read_line()? else {
                    return Ok(false);
                };
                match parse_answer(&field, &line) {
                    Ok(answer) => {
                        if let Err(e) = apply_answer(self.survey, form, &key, answer) {
                            writeln!(self.out, "   ! {}", e)?;
                            continue;
                        }
                        break;
                    }
                    Err(message) => writeln!(self.out, "   ! {}", message)?,
                }
            }
        }
        Ok(true)
    }

    fn save_draft(&self, form: &FormState) {
        if let Some(drafts) = self.drafts {
            match drafts.save(form) {
                Ok(()) => debug!("Draft saved to {}", drafts.path().display()),
                Err(e) => warn!("Failed to save draft: {}", e),
            }
        }
    }

    /// Run until the respondent submits or quits
    pub fn run(&mut self, mut form: FormState) -> anyhow::Result<Outcome> {
        let mut state = WizardState::for_survey(self.survey)?;
        let mut report: Option<ValidationReport> = None;

        loop {
            // Checked again before every section
            if self.survey.is_closed((self.clock)()) {
                self.save_draft(&form);
                return Ok(Outcome::Closed);
            }

            let view = View::project(&state, self.survey, &form, report.as_ref());
            self.render_header(&view)?;

            if !self.prompt_fields(&state, &mut form, report.as_ref())? {
                self.save_draft(&form);
                return Ok(Outcome::Quit);
            }
            self.save_draft(&form);

            let view = View::project(&state, self.survey, &form, None);
            let command = loop {
                let mut choices = Vec::new();
                if view.show_previous {
                    choices.push("[b]ack");
                }
                if view.show_next {
                    choices.push("[n]ext");
                }
                if view.show_submit {
                    choices.push("[s]ubmit");
                }
                choices.push("[q]uit");
                write!(self.out, "{} > ", choices.join(" "))?;
                self.out.flush()?;

                let Some(line) = self.read_line()? else {
                    return Ok(Outcome::Quit);
                };
                if let Some(command) = parse_command(&view, &line) {
                    break command;
                }
            };

            match command {
                Command::Next => match state.advance(self.survey, &form) {
                    Ok(next) => {
                        state = next;
                        report = None;
                    }
                    Err(blocked) => report = Some(blocked),
                },
                Command::Back => {
                    state = state.retreat();
                    report = None;
                }
                Command::Submit => match state.submit(self.survey, &form, (self.clock)()) {
                    Ok(submission) => return Ok(Outcome::Submitted(submission)),
                    Err(SubmitError::Closed) => return Ok(Outcome::Closed),
                    Err(SubmitError::Invalid(blocked)) => report = Some(blocked),
                    Err(e @ SubmitError::NotAtFinalSection) => writeln!(self.out, "{}", e)?,
                },
                Command::Quit => return Ok(Outcome::Quit),
            }
        }
    }
}
