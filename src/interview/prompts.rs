//! Assistant prompt texts
//!
//! The deployment is Spanish-language; these strings are the wire content,
//! not UI copy, so they live server-side.

use super::state::Step;

pub const ASK_RESPONSIBILITIES: &str = "¿Cuáles son tus 2–5 responsabilidades principales?";

pub const ASK_PENDING_WORK: &str = "¿Qué tareas están pendientes de cierre?";

pub const ASK_KEY_CONTACTS: &str =
    "¿Quiénes son los contactos clave que tu reemplazo debería conocer?";

pub const COMPLETE: &str =
    "Entrevista completada. He registrado responsabilidades, tareas pendientes y contactos clave.";

pub const ALREADY_COMPLETE: &str =
    "La entrevista ya está completa. Un manager revisará la información registrada.";

pub const CLARIFY_RESPONSIBILITIES: &str =
    "No identifiqué responsabilidades. Indica entre 2 y 5, en viñetas o frases cortas \
     (ej.: '- Coordinación de equipo').";

pub const CLARIFY_PENDING_WORK: &str =
    "No pude extraer tareas pendientes. Usa viñetas, una tarea por línea ('- Cerrar …').";

pub const CLARIFY_KEY_CONTACTS: &str =
    "No identifiqué contactos. Indica nombre y rol, uno por línea ('- Ana, responsable de QA').";

/// The prompt that asks for a step's information.
pub fn ask_for(step: Step) -> &'static str {
    match step {
        Step::Responsibilities => ASK_RESPONSIBILITIES,
        Step::PendingWork => ASK_PENDING_WORK,
        Step::KeyContacts => ASK_KEY_CONTACTS,
    }
}

/// The re-prompt used when an answer was insufficient for a step.
pub fn clarify_for(step: Step) -> &'static str {
    match step {
        Step::Responsibilities => CLARIFY_RESPONSIBILITIES,
        Step::PendingWork => CLARIFY_PENDING_WORK,
        Step::KeyContacts => CLARIFY_KEY_CONTACTS,
    }
}
