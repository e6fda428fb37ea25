use chrono::{Days, NaiveDate};

use crate::{dates::weekday_name, task::Task};

/// Builds the full prompt sent to the model for one agenda turn.
///
/// The model sees the system instructions, concrete reference dates so it
/// can turn "mañana" into a real date itself, the current agenda, and the
/// user's message, in that order.
pub fn compose_prompt(
    system_prompt: &str,
    agenda: &[Task],
    today: NaiveDate,
    user_text: &str,
) -> String {
    format!(
        "{}\n\n# Fechas de referencia\n{}\n\n# Agenda actual\n{}\n\n# Mensaje del usuario\n{}",
        system_prompt.trim(),
        reference_dates(today),
        render_agenda(agenda),
        user_text.trim()
    )
}

/// Fills the `{text}` placeholder of the interpretation template.
pub fn compose_interpret_prompt(template: &str, user_text: &str) -> String {
    template.replace("{text}", user_text.trim())
}

fn reference_dates(today: NaiveDate) -> String {
    [("Hoy", 0), ("Mañana", 1), ("Pasado mañana", 2)]
        .iter()
        .filter_map(|(label, offset)| {
            let date = today.checked_add_days(Days::new(*offset))?;
            Some(format!(
                "- {}: {} ({})",
                label,
                date.format("%Y-%m-%d"),
                weekday_name(date)
            ))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_agenda(agenda: &[Task]) -> String {
    if agenda.is_empty() {
        return "(sin tareas)".to_string();
    }
    agenda
        .iter()
        .map(|t| match t.description.as_deref().filter(|d| !d.is_empty()) {
            Some(description) => format!("- {} {}: {} - {}", t.date, t.time, t.title, description),
            None => format!("- {} {}: {}", t.date, t.time, t.title),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
